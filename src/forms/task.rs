use chrono::NaiveDate;

use super::{choice, required, EntityForm, FormMode};
use crate::errors::ServiceError;
use crate::models::{task::TaskPayload, Task, TaskPriority, TaskStatus};
use crate::services::assignment::AssignmentDraft;
use crate::validation::{EntityKind, FormState};

/// Create/edit task form. Assigned workers live in an [`AssignmentDraft`]
/// and are submitted with the rest of the task.
#[derive(Debug, Clone)]
pub struct TaskForm {
    state: FormState,
    mode: FormMode,
    assignment: AssignmentDraft,
}

impl TaskForm {
    pub fn new(today: NaiveDate) -> Self {
        Self::with_assignment(AssignmentDraft::new(), today)
    }

    pub fn with_assignment(assignment: AssignmentDraft, today: NaiveDate) -> Self {
        let mut state = FormState::new(EntityKind::Task);
        let _ = state.prefill("priority", TaskPriority::default().to_string());
        let _ = state.prefill("status", TaskStatus::default().to_string());
        let _ = state.prefill("scheduledDate", today.format("%Y-%m-%d").to_string());
        let _ = state.prefill("estimatedHours", "1");
        Self {
            state,
            mode: FormMode::Create,
            assignment,
        }
    }

    pub fn edit(task: &Task) -> Result<Self, ServiceError> {
        let mut state = FormState::new(EntityKind::Task);
        state.prefill("taskId", task.task_id.clone())?;
        state.prefill("title", task.title.clone())?;
        state.prefill("description", task.description.clone())?;
        state.prefill("priority", task.priority.to_string())?;
        state.prefill("category", task.category.to_string())?;
        state.prefill("status", task.status.to_string())?;
        if let Some(date) = task.scheduled_date {
            state.prefill("scheduledDate", date.format("%Y-%m-%d").to_string())?;
        }
        if let Some(time) = &task.scheduled_time {
            state.prefill("scheduledTime", time.clone())?;
        }
        state.prefill("estimatedHours", task.estimated_hours.to_string())?;
        state.lock("taskId")?;
        Ok(Self {
            state,
            mode: FormMode::Update,
            assignment: task.assigned_workers.iter().collect(),
        })
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn assignment(&self) -> &AssignmentDraft {
        &self.assignment
    }

    /// Adds or removes a worker; returns whether they are now assigned.
    pub fn toggle_worker(&mut self, worker_id: &str) -> bool {
        self.assignment.toggle(worker_id)
    }
}

impl EntityForm for TaskForm {
    type Payload = TaskPayload;

    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    fn build(&self) -> Result<TaskPayload, ServiceError> {
        let s = &self.state;
        Ok(TaskPayload {
            task_id: s.value("taskId").trim().to_string(),
            title: s.value("title").trim().to_string(),
            description: s.value("description").trim().to_string(),
            priority: choice(s, "priority")?,
            category: choice(s, "category")?,
            status: choice(s, "status")?,
            scheduled_date: s.date("scheduledDate"),
            scheduled_time: s.opt_value("scheduledTime"),
            assigned_workers: self.assignment.to_vec(),
            estimated_hours: required(s, "estimatedHours", s.hours("estimatedHours"))?,
        })
    }
}
