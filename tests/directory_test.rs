mod common;

use assert_matches::assert_matches;
use coco_labor::{
    directory::{sort::SortKey, Availability, TaskFilter, WorkerFilter},
    errors::ServiceError,
    models::{JobRole, TaskStatus},
};
use common::{task, worker};

fn crew() -> Vec<coco_labor::models::Worker> {
    vec![
        worker("W-003", "Harsha", JobRole::Planting, true, Some(300)),
        worker("W-001", "Nimal", JobRole::Harvesting, true, Some(100)),
        worker("W-002", "kamal", JobRole::Packaging, false, None),
        worker("W-004", "Amara", JobRole::Harvesting, false, Some(200)),
    ]
}

#[test]
fn worker_search_is_prefix_on_id_name_or_role() {
    let filter = WorkerFilter {
        query: "har".into(),
        ..WorkerFilter::default()
    };
    let ids: Vec<_> = filter
        .apply(&crew())
        .into_iter()
        .map(|w| w.worker_id)
        .collect();
    // "Harsha" by name, Nimal and Amara by the "Harvesting" role.
    assert_eq!(ids, vec!["W-003", "W-004", "W-001"]);

    let inner = WorkerFilter {
        query: "mal".into(),
        ..WorkerFilter::default()
    };
    assert!(inner.apply(&crew()).is_empty(), "worker search must not match mid-word");
}

#[test]
fn empty_worker_query_keeps_input_order_before_sorting() {
    let workers = crew();
    let filter = WorkerFilter::default();
    assert!(workers.iter().all(|w| filter.matches_query(w)));
    let matched: Vec<_> = workers.iter().filter(|w| filter.matches(w)).cloned().collect();
    assert_eq!(matched, workers);
}

#[test]
fn role_and_availability_combine_with_and() {
    let filter = WorkerFilter::from_params("", "harvesting", "unavailable", "name").unwrap();
    assert_eq!(filter.availability, Some(Availability::Unavailable));
    let ids: Vec<_> = filter.apply(&crew()).into_iter().map(|w| w.worker_id).collect();
    assert_eq!(ids, vec!["W-004"]);
}

#[test]
fn unknown_filter_values_are_rejected() {
    assert_matches!(
        WorkerFilter::from_params("", "astronaut", "", ""),
        Err(ServiceError::BadRequest(_))
    );
    assert_matches!(
        TaskFilter::from_params("", "done-ish", "", "", ""),
        Err(ServiceError::BadRequest(_))
    );
    assert!(TaskFilter::from_params("", "all", "ALL", "", "").is_ok());
}

#[test]
fn recent_sort_puts_missing_timestamps_last() {
    let ids: Vec<_> = WorkerFilter::default()
        .apply(&crew())
        .into_iter()
        .map(|w| w.worker_id)
        .collect();
    assert_eq!(ids, vec!["W-003", "W-004", "W-001", "W-002"]);
}

#[test]
fn name_sort_ignores_case() {
    let filter = WorkerFilter {
        sort: SortKey::Name,
        ..WorkerFilter::default()
    };
    let names: Vec<_> = filter.apply(&crew()).into_iter().map(|w| w.name).collect();
    assert_eq!(names, vec!["Amara", "Harsha", "kamal", "Nimal"]);
}

#[test]
fn task_search_harv_matches_title_and_description_substrings() {
    let tasks = vec![
        task("T-001", "Harvest Field A", "", TaskStatus::InProgress, &["W-001"]),
        task("T-002", "Packaging", "harvest-adjacent packing", TaskStatus::ToDo, &["W-002"]),
        task("T-003", "Irrigation", "drip lines", TaskStatus::ToDo, &[]),
        task("T-004", "Field prep", "post-harvest clearing", TaskStatus::Completed, &[]),
    ];
    let filter = TaskFilter {
        query: "harv".into(),
        sort: SortKey::Id,
        ..TaskFilter::default()
    };
    let ids: Vec<_> = filter.apply(&tasks).into_iter().map(|t| t.task_id).collect();
    // T-004 only matches mid-description: task search is a substring match,
    // unlike the prefix-only worker search.
    assert_eq!(ids, vec!["T-001", "T-002", "T-004"]);
}

#[test]
fn status_filter_and_query_intersect() {
    let tasks = vec![
        task("T-001", "Harvest Field A", "", TaskStatus::InProgress, &[]),
        task("T-002", "Harvest Field B", "", TaskStatus::ToDo, &[]),
        task("T-003", "Irrigation", "", TaskStatus::ToDo, &[]),
    ];
    let by_status = TaskFilter::from_params("", "to-do", "", "", "id").unwrap();
    let ids: Vec<_> = by_status.apply(&tasks).into_iter().map(|t| t.task_id).collect();
    assert_eq!(ids, vec!["T-002", "T-003"]);

    let both = TaskFilter::from_params("field", "To Do", "", "", "").unwrap();
    let ids: Vec<_> = both.apply(&tasks).into_iter().map(|t| t.task_id).collect();
    assert_eq!(ids, vec!["T-002"]);
}

#[test]
fn worker_view_only_shows_assigned_tasks() {
    let tasks = vec![
        task("T-001", "Harvest", "", TaskStatus::InProgress, &["W-001", "W-002"]),
        task("T-002", "Packaging", "", TaskStatus::ToDo, &["W-002"]),
    ];
    let ids: Vec<_> = TaskFilter::for_worker("W-001")
        .apply(&tasks)
        .into_iter()
        .map(|t| t.task_id)
        .collect();
    assert_eq!(ids, vec!["T-001"]);
}

#[test]
fn filtering_never_mutates_the_source() {
    let tasks = vec![
        task("T-002", "b", "", TaskStatus::ToDo, &[]),
        task("T-001", "a", "", TaskStatus::ToDo, &[]),
    ];
    let snapshot = tasks.clone();
    let filter = TaskFilter {
        sort: SortKey::Id,
        ..TaskFilter::default()
    };
    let _ = filter.apply(&tasks);
    assert_eq!(tasks, snapshot);
}
