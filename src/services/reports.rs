//! Labor Management Report aggregation.
//!
//! Pure data shaping over already fetched workers and tasks; rendering is
//! left to a [`DocumentRenderer`](crate::reports::DocumentRenderer).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::models::task::percent;
use crate::models::{JobRole, Task, TaskPriority, TaskStatus, Worker};

/// Report summary block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_workers: usize,
    pub available_workers: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
}

/// One row of the workforce table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerRow {
    pub worker_id: String,
    pub name: String,
    pub job_role: JobRole,
    pub is_available: bool,
    pub assigned: usize,
    pub completed: usize,
    /// Whole percent; 0 when nothing is assigned.
    pub completion_rate: u32,
}

/// One row of the tasks table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow {
    pub task_id: String,
    pub title: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub scheduled_date: NaiveDate,
    pub workers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaborReport {
    pub report_id: String,
    pub generated_at: DateTime<Utc>,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub summary: ReportSummary,
    pub workers: Vec<WorkerRow>,
    pub tasks: Vec<TaskRow>,
}

/// `LMR-YYYYMMDD-XXXXXX`, the suffix being random uppercase hex.
pub fn report_id(generated_at: DateTime<Utc>) -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .to_uppercase()
        .chars()
        .take(6)
        .collect();
    format!("LMR-{}-{}", generated_at.format("%Y%m%d"), suffix)
}

/// Tasks scheduled inside `[from, to]`; undated tasks never qualify.
pub fn tasks_in_range(tasks: &[Task], from: NaiveDate, to: NaiveDate) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| {
            task.scheduled_date
                .map_or(false, |date| (from..=to).contains(&date))
        })
        .collect()
}

impl LaborReport {
    /// Aggregates workers and tasks into a report for `[from, to]`.
    #[instrument(skip(workers, tasks), fields(workers = workers.len(), tasks = tasks.len()))]
    pub fn build(
        workers: &[Worker],
        tasks: &[Task],
        from: NaiveDate,
        to: NaiveDate,
        generated_at: DateTime<Utc>,
    ) -> Result<Self, ServiceError> {
        if from > to {
            return Err(ServiceError::BadRequest(format!(
                "Report start {from} is after end {to}"
            )));
        }

        let in_range = tasks_in_range(tasks, from, to);
        let is_completed = |task: &Task| task.status == TaskStatus::Completed;

        let summary = ReportSummary {
            total_workers: workers.len(),
            available_workers: workers.iter().filter(|w| w.is_available).count(),
            total_tasks: in_range.len(),
            completed_tasks: in_range.iter().filter(|task| is_completed(task)).count(),
        };

        let worker_rows = workers
            .iter()
            .map(|worker| {
                let assigned: Vec<&&Task> = in_range
                    .iter()
                    .filter(|task| task.is_assigned_to(&worker.worker_id))
                    .collect();
                let completed = assigned.iter().filter(|task| is_completed(task)).count();
                WorkerRow {
                    worker_id: worker.worker_id.clone(),
                    name: worker.name.clone(),
                    job_role: worker.job_role,
                    is_available: worker.is_available,
                    assigned: assigned.len(),
                    completed,
                    completion_rate: percent(completed, assigned.len()),
                }
            })
            .collect();

        let task_rows = in_range
            .iter()
            .filter_map(|task| {
                Some(TaskRow {
                    task_id: task.task_id.clone(),
                    title: task.title.clone(),
                    status: task.status,
                    priority: task.priority,
                    scheduled_date: task.scheduled_date?,
                    workers: task.assigned_workers.iter().cloned().collect(),
                })
            })
            .collect();

        let report = Self {
            report_id: report_id(generated_at),
            generated_at,
            from,
            to,
            summary,
            workers: worker_rows,
            tasks: task_rows,
        };
        info!(report_id = %report.report_id, tasks = report.summary.total_tasks, "labor report built");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskCategory;
    use chrono::TimeZone;
    use std::collections::BTreeSet;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn worker(id: &str, available: bool) -> Worker {
        Worker {
            worker_id: id.into(),
            user_email: format!("{id}@estate.lk"),
            name: id.into(),
            job_role: JobRole::General,
            is_available: available,
            date_of_birth: None,
            nic: String::new(),
            created_at: None,
        }
    }

    fn task(id: &str, day: Option<u32>, status: TaskStatus, workers: &[&str]) -> Task {
        Task {
            task_id: id.into(),
            title: id.into(),
            description: String::new(),
            priority: TaskPriority::Medium,
            category: TaskCategory::Other,
            status,
            scheduled_date: day.map(date),
            scheduled_time: None,
            assigned_workers: workers.iter().map(|w| w.to_string()).collect::<BTreeSet<_>>(),
            estimated_hours: 1.0,
            created_at: None,
            deleted_at: None,
        }
    }

    #[test]
    fn range_is_inclusive_and_skips_undated() {
        let tasks = vec![
            task("T-1", Some(1), TaskStatus::Completed, &[]),
            task("T-2", Some(10), TaskStatus::ToDo, &[]),
            task("T-3", Some(11), TaskStatus::ToDo, &[]),
            task("T-4", None, TaskStatus::Completed, &[]),
        ];
        let ids: Vec<_> = tasks_in_range(&tasks, date(1), date(10))
            .into_iter()
            .map(|t| t.task_id.as_str())
            .collect();
        assert_eq!(ids, vec!["T-1", "T-2"]);
    }

    #[test]
    fn per_worker_rates_round_to_nearest_percent() {
        let workers = vec![worker("W-1", true), worker("W-2", false), worker("W-3", true)];
        let tasks = vec![
            task("T-1", Some(2), TaskStatus::Completed, &["W-1", "W-2"]),
            task("T-2", Some(3), TaskStatus::InProgress, &["W-1"]),
            task("T-3", Some(4), TaskStatus::ToDo, &["W-1"]),
            task("T-4", Some(25), TaskStatus::Completed, &["W-3"]),
        ];
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap();
        let report = LaborReport::build(&workers, &tasks, date(1), date(20), now).unwrap();

        assert_eq!(
            report.summary,
            ReportSummary {
                total_workers: 3,
                available_workers: 2,
                total_tasks: 3,
                completed_tasks: 1,
            }
        );
        let rates: Vec<_> = report
            .workers
            .iter()
            .map(|row| (row.assigned, row.completed, row.completion_rate))
            .collect();
        assert_eq!(rates, vec![(3, 1, 33), (1, 1, 100), (0, 0, 0)]);
        assert!(report.report_id.starts_with("LMR-20261019-"));
        assert_eq!(report.report_id.len(), "LMR-20261019-".len() + 6);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let now = Utc::now();
        assert!(LaborReport::build(&[], &[], date(5), date(4), now).is_err());
    }
}
