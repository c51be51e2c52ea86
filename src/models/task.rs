use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{Display, EnumIter, EnumString};

use super::flexible_date;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum TaskStatus {
    #[serde(rename = "To Do")]
    #[strum(serialize = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    #[strum(serialize = "In Progress")]
    InProgress,
    Completed,
    #[serde(rename = "On Hold")]
    #[strum(serialize = "On Hold")]
    OnHold,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::ToDo
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum TaskCategory {
    Harvesting,
    Planting,
    Fertilizing,
    Irrigation,
    #[serde(rename = "Pest Control")]
    #[strum(serialize = "Pest Control")]
    PestControl,
    Maintenance,
    Processing,
    Packaging,
    Transportation,
    #[serde(rename = "Quality Control")]
    #[strum(serialize = "Quality Control")]
    QualityControl,
    #[serde(other)]
    Other,
}

impl Default for TaskCategory {
    fn default() -> Self {
        TaskCategory::Other
    }
}

macro_rules! label_parser {
    ($($ty:ty),*) => {
        $(
            impl $ty {
                pub fn parse_label(raw: &str) -> Option<Self> {
                    super::normalize_label(raw).parse().ok()
                }
            }
        )*
    };
}

label_parser!(TaskPriority, TaskStatus, TaskCategory);

/// A unit of assignable work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub task_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub category: TaskCategory,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(with = "flexible_date::option", default)]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
    #[serde(default)]
    pub assigned_workers: BTreeSet<String>,
    #[serde(default = "default_estimated_hours")]
    pub estimated_hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Set while the task sits in the trash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

fn default_estimated_hours() -> f64 {
    1.0
}

impl Task {
    pub fn is_assigned_to(&self, worker_id: &str) -> bool {
        self.assigned_workers.contains(worker_id)
    }
}

/// Full-task payload used for create and update; the server only ever sees
/// the final `assignedWorkers` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    pub task_id: String,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub category: TaskCategory,
    pub status: TaskStatus,
    #[serde(with = "flexible_date::option", default)]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
    pub assigned_workers: Vec<String>,
    pub estimated_hours: f64,
}

impl From<&Task> for TaskPayload {
    fn from(task: &Task) -> Self {
        Self {
            task_id: task.task_id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            category: task.category,
            status: task.status,
            scheduled_date: task.scheduled_date,
            scheduled_time: task.scheduled_time.clone(),
            assigned_workers: task.assigned_workers.iter().cloned().collect(),
            estimated_hours: task.estimated_hours,
        }
    }
}

/// Body of `PATCH /api/tasks/:id/status`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: TaskStatus,
}

/// Body of `POST /api/tasks/:id/assign`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub worker_id: String,
}

/// `GET /api/tasks/analytics` and `GET /api/tasks/worker/:id/analytics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAnalytics {
    pub total_tasks: usize,
    pub to_do: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub on_hold: usize,
    /// Percentage of completed tasks, rounded to the nearest whole percent.
    pub completion_rate: u32,
    #[serde(default)]
    pub by_priority: std::collections::BTreeMap<String, usize>,
    #[serde(default)]
    pub by_category: std::collections::BTreeMap<String, usize>,
}

impl TaskAnalytics {
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut analytics = TaskAnalytics::default();
        for task in tasks {
            analytics.total_tasks += 1;
            match task.status {
                TaskStatus::ToDo => analytics.to_do += 1,
                TaskStatus::InProgress => analytics.in_progress += 1,
                TaskStatus::Completed => analytics.completed += 1,
                TaskStatus::OnHold => analytics.on_hold += 1,
            }
            *analytics
                .by_priority
                .entry(task.priority.to_string())
                .or_insert(0) += 1;
            *analytics
                .by_category
                .entry(task.category.to_string())
                .or_insert(0) += 1;
        }
        analytics.completion_rate = percent(analytics.completed, analytics.total_tasks);
        analytics
    }
}

/// `part / whole` as a whole percentage, rounded half away from zero; zero when
/// `whole` is zero.
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_round_trip_through_serde_names() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        assert_eq!(TaskStatus::parse_label("on-hold"), Some(TaskStatus::OnHold));
        assert_eq!(TaskStatus::parse_label("to do"), Some(TaskStatus::ToDo));
    }

    #[test]
    fn unknown_category_maps_to_other() {
        let category: TaskCategory = serde_json::from_str("\"Weeding\"").unwrap();
        assert_eq!(category, TaskCategory::Other);
    }

    #[test]
    fn analytics_counts_statuses() {
        let base = Task {
            task_id: "T1".into(),
            title: "Harvest".into(),
            description: String::new(),
            priority: TaskPriority::High,
            category: TaskCategory::Harvesting,
            status: TaskStatus::Completed,
            scheduled_date: None,
            scheduled_time: None,
            assigned_workers: BTreeSet::new(),
            estimated_hours: 2.0,
            created_at: None,
            deleted_at: None,
        };
        let mut second = base.clone();
        second.status = TaskStatus::ToDo;
        let mut third = base.clone();
        third.status = TaskStatus::ToDo;

        let analytics = TaskAnalytics::from_tasks([&base, &second, &third]);
        assert_eq!(analytics.total_tasks, 3);
        assert_eq!(analytics.completed, 1);
        assert_eq!(analytics.to_do, 2);
        assert_eq!(analytics.completion_rate, 33);
    }

    #[test]
    fn percent_rounds_to_nearest() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(1, 2), 50);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
    }
}
