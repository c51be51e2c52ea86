//! In-memory search, filter and sort over fetched worker and task lists.
//!
//! Every `apply` copies the matching records into a new `Vec`; the source
//! slice is never reordered. Filters combine with AND and an unset filter
//! imposes no constraint.

pub mod sort;

pub use sort::{locale_cmp, SortKey, Sortable};

use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;
use crate::models::{JobRole, Task, TaskCategory, TaskPriority, TaskStatus, Worker};

fn parse_filter<T>(
    name: &str,
    raw: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, ServiceError> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    parse(raw)
        .map(Some)
        .ok_or_else(|| ServiceError::BadRequest(format!("unknown {name} '{raw}'")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Available,
    Unavailable,
}

impl Availability {
    pub fn parse_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "available" | "true" | "yes" => Some(Availability::Available),
            "unavailable" | "false" | "no" | "busy" => Some(Availability::Unavailable),
            _ => None,
        }
    }

    fn matches(self, is_available: bool) -> bool {
        match self {
            Availability::Available => is_available,
            Availability::Unavailable => !is_available,
        }
    }
}

/// Worker list view state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkerFilter {
    pub query: String,
    pub role: Option<JobRole>,
    pub availability: Option<Availability>,
    pub sort: SortKey,
}

impl WorkerFilter {
    /// Builds the filter from raw UI values; blank strings mean "any".
    pub fn from_params(
        query: &str,
        role: &str,
        availability: &str,
        sort: &str,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            query: query.to_string(),
            role: parse_filter("job role", role, JobRole::parse_label)?,
            availability: parse_filter("availability", availability, Availability::parse_label)?,
            sort: SortKey::parse_or_default(sort),
        })
    }

    /// Case-insensitive prefix match on id, name or job role.
    pub fn matches_query(&self, worker: &Worker) -> bool {
        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        let role = worker.job_role.to_string();
        [worker.worker_id.as_str(), worker.name.as_str(), role.as_str()]
            .iter()
            .any(|field| field.to_lowercase().starts_with(&query))
    }

    pub fn matches(&self, worker: &Worker) -> bool {
        self.matches_query(worker)
            && self.role.map_or(true, |role| worker.job_role == role)
            && self
                .availability
                .map_or(true, |a| a.matches(worker.is_available))
    }

    pub fn apply(&self, workers: &[Worker]) -> Vec<Worker> {
        let mut visible: Vec<Worker> = workers.iter().filter(|w| self.matches(w)).cloned().collect();
        sort::sort_by_key(&mut visible, self.sort);
        visible
    }
}

/// Task list view state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub query: String,
    pub status: Option<TaskStatus>,
    pub category: Option<TaskCategory>,
    pub priority: Option<TaskPriority>,
    /// Restricts to tasks assigned to this worker (self-service view).
    pub worker_id: Option<String>,
    pub sort: SortKey,
}

impl TaskFilter {
    pub fn from_params(
        query: &str,
        status: &str,
        category: &str,
        priority: &str,
        sort: &str,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            query: query.to_string(),
            status: parse_filter("status", status, TaskStatus::parse_label)?,
            category: parse_filter("category", category, TaskCategory::parse_label)?,
            priority: parse_filter("priority", priority, TaskPriority::parse_label)?,
            worker_id: None,
            sort: SortKey::parse_or_default(sort),
        })
    }

    /// Only the tasks `worker_id` is assigned to.
    pub fn for_worker(worker_id: impl Into<String>) -> Self {
        Self {
            worker_id: Some(worker_id.into()),
            ..Self::default()
        }
    }

    /// Case-insensitive substring match on id, title or description.
    ///
    /// Unlike the worker search this is not anchored at the start.
    pub fn matches_query(&self, task: &Task) -> bool {
        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        [&task.task_id, &task.title, &task.description]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.matches_query(task)
            && self.status.map_or(true, |s| task.status == s)
            && self.category.map_or(true, |c| task.category == c)
            && self.priority.map_or(true, |p| task.priority == p)
            && self
                .worker_id
                .as_deref()
                .map_or(true, |id| task.is_assigned_to(id))
    }

    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        let mut visible: Vec<Task> = tasks.iter().filter(|t| self.matches(t)).cloned().collect();
        sort::sort_by_key(&mut visible, self.sort);
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeSet;

    fn worker(id: &str, name: &str, role: JobRole, available: bool, created: i64) -> Worker {
        Worker {
            worker_id: id.into(),
            user_email: format!("{}@estate.lk", id.to_lowercase()),
            name: name.into(),
            job_role: role,
            is_available: available,
            date_of_birth: None,
            nic: String::new(),
            created_at: Utc.timestamp_opt(created, 0).single(),
        }
    }

    fn task(id: &str, title: &str, description: &str, status: TaskStatus) -> Task {
        Task {
            task_id: id.into(),
            title: title.into(),
            description: description.into(),
            priority: TaskPriority::Medium,
            category: TaskCategory::Harvesting,
            status,
            scheduled_date: None,
            scheduled_time: None,
            assigned_workers: BTreeSet::new(),
            estimated_hours: 1.0,
            created_at: None,
            deleted_at: None,
        }
    }

    #[test]
    fn worker_search_is_prefix_only() {
        let workers = vec![
            worker("W-001", "Nimal Perera", JobRole::Harvesting, true, 10),
            worker("W-002", "Kamal Silva", JobRole::Packaging, true, 20),
        ];
        let filter = WorkerFilter {
            query: "per".into(),
            ..WorkerFilter::default()
        };
        assert!(filter.apply(&workers).is_empty());

        let filter = WorkerFilter {
            query: "HARV".into(),
            ..WorkerFilter::default()
        };
        let ids: Vec<_> = filter.apply(&workers).into_iter().map(|w| w.worker_id).collect();
        assert_eq!(ids, vec!["W-001"]);
    }

    #[test]
    fn task_search_matches_substrings() {
        let tasks = vec![
            task("T1", "Harvest Field A", "none", TaskStatus::ToDo),
            task("T2", "Packaging", "harvest-adjacent", TaskStatus::ToDo),
            task("T3", "Irrigation", "north block", TaskStatus::ToDo),
        ];
        let filter = TaskFilter {
            query: "arves".into(),
            sort: SortKey::Id,
            ..TaskFilter::default()
        };
        let ids: Vec<_> = filter.apply(&tasks).into_iter().map(|t| t.task_id).collect();
        assert_eq!(ids, vec!["T1", "T2"]);
    }

    #[test]
    fn filters_combine_with_and() {
        let workers = vec![
            worker("W-001", "Nimal", JobRole::Harvesting, true, 10),
            worker("W-002", "Kamal", JobRole::Harvesting, false, 20),
            worker("W-003", "Sunil", JobRole::Planting, true, 30),
        ];
        let filter = WorkerFilter::from_params("", "harvesting", "available", "id").unwrap();
        let ids: Vec<_> = filter.apply(&workers).into_iter().map(|w| w.worker_id).collect();
        assert_eq!(ids, vec!["W-001"]);
    }

    #[test]
    fn recent_sort_puts_missing_timestamps_last() {
        let mut undated = worker("W-000", "Old", JobRole::General, true, 0);
        undated.created_at = None;
        let workers = vec![
            undated,
            worker("W-001", "A", JobRole::General, true, 100),
            worker("W-002", "B", JobRole::General, true, 200),
        ];
        let ids: Vec<_> = WorkerFilter::default()
            .apply(&workers)
            .into_iter()
            .map(|w| w.worker_id)
            .collect();
        assert_eq!(ids, vec!["W-002", "W-001", "W-000"]);
    }

    #[test]
    fn source_slice_is_untouched() {
        let workers = vec![
            worker("W-002", "B", JobRole::General, true, 1),
            worker("W-001", "A", JobRole::General, true, 2),
        ];
        let before = workers.clone();
        let filter = WorkerFilter {
            sort: SortKey::Id,
            ..WorkerFilter::default()
        };
        let sorted = filter.apply(&workers);
        assert_eq!(workers, before);
        assert_eq!(sorted[0].worker_id, "W-001");
    }

    #[test]
    fn for_worker_restricts_to_assignments() {
        let mut assigned = task("T1", "Harvest", "", TaskStatus::InProgress);
        assigned.assigned_workers.insert("W-001".into());
        let other = task("T2", "Plant", "", TaskStatus::InProgress);
        let visible = TaskFilter::for_worker("W-001").apply(&[assigned, other]);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].task_id, "T1");
    }

    #[test]
    fn unknown_filter_values_are_rejected() {
        assert_matches!(
            TaskFilter::from_params("", "finished", "", "", ""),
            Err(ServiceError::BadRequest(_))
        );
        let filter = TaskFilter::from_params("", "all", "pest-control", "", "").unwrap();
        assert_eq!(filter.status, None);
        assert_eq!(filter.category, Some(TaskCategory::PestControl));
    }
}
