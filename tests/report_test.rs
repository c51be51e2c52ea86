mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, TimeZone, Utc};
use coco_labor::{
    errors::ServiceError,
    reports::{DocumentRenderer, JsonRenderer, TextRenderer},
    services::{DirectoryService, LaborReport},
    theme::Theme,
};
use common::{spawn_backend, today};

async fn seeded_directory() -> DirectoryService {
    let (client, _state) = spawn_backend().await;
    DirectoryService::load(Arc::new(client)).await
}

#[tokio::test]
async fn report_for_seeded_estate() {
    let directory = seeded_directory().await;
    let generated_at = Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap();
    let report = LaborReport::build(
        directory.workers(),
        directory.tasks(),
        today(),
        today(),
        generated_at,
    )
    .unwrap();

    assert!(report.report_id.starts_with("LMR-20261019-"));
    assert_eq!(report.summary.total_tasks, 3);
    assert_eq!(report.summary.completed_tasks, 1);

    let nimal = report.workers.iter().find(|w| w.worker_id == "W-001").unwrap();
    assert_eq!((nimal.assigned, nimal.completed, nimal.completion_rate), (2, 1, 50));

    let text = String::from_utf8(TextRenderer.render(&report, &Theme::default()).unwrap()).unwrap();
    assert!(text.starts_with("COCONUT ESTATE\nLabor Management Report\n"));
    assert!(text.contains("Workers: 2 (1 available)   Tasks: 3 (1 completed, 33%)"));
    assert!(text.contains("Generated: 2026-10-19 09:30 UTC"));
    assert!(text.contains(&format!("Report {}  |  Page 1 of 1", report.report_id)));
}

#[tokio::test]
async fn empty_period_still_lists_workforce() {
    let directory = seeded_directory().await;
    let from = today() + Duration::days(30);
    let report = LaborReport::build(
        directory.workers(),
        directory.tasks(),
        from,
        from + Duration::days(6),
        Utc::now(),
    )
    .unwrap();
    assert_eq!(report.summary.total_tasks, 0);
    assert!(report.workers.iter().all(|w| w.completion_rate == 0));

    let text = String::from_utf8(TextRenderer.render(&report, &Theme::default()).unwrap()).unwrap();
    assert!(text.contains("No tasks scheduled in this period."));
    assert!(text.contains("W-002"));
}

#[tokio::test]
async fn json_document_mirrors_report_rows() {
    let directory = seeded_directory().await;
    let report =
        LaborReport::build(directory.workers(), directory.tasks(), today(), today(), Utc::now())
            .unwrap();
    let bytes = JsonRenderer.render(&report, &Theme::default()).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["summary"]["totalWorkers"], 2);
    assert_eq!(json["tasks"].as_array().unwrap().len(), 3);
    assert_eq!(JsonRenderer.extension(), "json");
}

#[test]
fn reversed_range_is_rejected() {
    assert_matches!(
        LaborReport::build(&[], &[], today(), today() - Duration::days(1), Utc::now()),
        Err(ServiceError::BadRequest(_))
    );
}
