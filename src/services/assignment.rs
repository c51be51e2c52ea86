//! Worker-to-task assignment.
//!
//! Existing tasks are assigned through the dedicated `assign` endpoint and the
//! directory is refetched afterwards. Everything else goes through the task
//! form: membership is toggled locally and only the final list is submitted.

use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{info, instrument};

use super::directory::DirectoryService;
use crate::errors::ServiceError;
use crate::forms::TaskForm;
use crate::models::Task;

/// Local, unsaved set of assigned worker IDs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentDraft {
    workers: BTreeSet<String>,
}

impl AssignmentDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft holding exactly one worker.
    pub fn seeded(worker_id: impl Into<String>) -> Self {
        let mut draft = Self::new();
        draft.workers.insert(worker_id.into());
        draft
    }

    /// Adds the worker if absent, removes them if present. Returns whether
    /// the worker is assigned afterwards.
    pub fn toggle(&mut self, worker_id: &str) -> bool {
        if self.workers.remove(worker_id) {
            false
        } else {
            self.workers.insert(worker_id.to_string());
            true
        }
    }

    pub fn contains(&self, worker_id: &str) -> bool {
        self.workers.contains(worker_id)
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.workers.iter().map(String::as_str)
    }

    /// The list sent to the backend.
    pub fn to_vec(&self) -> Vec<String> {
        self.workers.iter().cloned().collect()
    }
}

impl<'a> FromIterator<&'a String> for AssignmentDraft {
    fn from_iter<I: IntoIterator<Item = &'a String>>(iter: I) -> Self {
        Self {
            workers: iter.into_iter().cloned().collect(),
        }
    }
}

/// Assigns `worker_id` to an existing task, then refetches the directory.
///
/// On failure nothing is refetched and the error carries the server message
/// (see [`ServiceError::operator_message`]).
#[instrument(skip(directory))]
pub async fn assign_existing(
    directory: &mut DirectoryService,
    task_id: &str,
    worker_id: &str,
) -> Result<Task, ServiceError> {
    let task = directory.api().assign_task(task_id, worker_id).await?;
    info!(task_id, worker_id, "worker assigned to task");
    directory.refresh().await;
    Ok(task)
}

/// New-task form with `worker_id` pre-selected as the only assignee.
pub fn seed_new_task(worker_id: &str, today: NaiveDate) -> TaskForm {
    TaskForm::with_assignment(AssignmentDraft::seeded(worker_id), today)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut draft = AssignmentDraft::new();
        assert!(draft.toggle("W-001"));
        assert!(draft.toggle("W-002"));
        assert!(!draft.toggle("W-001"));
        assert_eq!(draft.to_vec(), vec!["W-002"]);
    }

    #[test]
    fn seed_holds_single_worker() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let form = seed_new_task("W-007", today);
        assert_eq!(form.assignment().to_vec(), vec!["W-007"]);
    }
}
