//! REST contract of the in-memory backend, driven through the router.

mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn trash_lifecycle_through_the_api() {
    let app = TestApp::new();

    let (status, _) = app.request(Method::DELETE, "/api/tasks/T-001", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.ids("/api/tasks", "taskId").await, vec!["T-002", "T-003"]);
    assert_eq!(app.ids("/api/tasks/trash", "taskId").await, vec!["T-001"]);

    let (status, restored) = app.request(Method::POST, "/api/tasks/T-001/restore", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(restored["taskId"], "T-001");
    assert!(restored.get("deletedAt").is_none());
    assert!(app.ids("/api/tasks/trash", "taskId").await.is_empty());

    app.request(Method::DELETE, "/api/tasks/T-002", None).await;
    let active_before = app.get("/api/tasks").await.1;
    let (status, _) = app
        .request(Method::DELETE, "/api/tasks/T-002/permanent", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.ids("/api/tasks/trash", "taskId").await.is_empty());
    assert_eq!(app.get("/api/tasks").await.1, active_before);
}

#[tokio::test]
async fn permanent_delete_of_active_task_is_refused() {
    let app = TestApp::new();
    let (status, body) = app
        .request(Method::DELETE, "/api/tasks/T-003/permanent", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Task T-003 is not in the trash");
    assert!(app.ids("/api/tasks", "taskId").await.contains(&"T-003".to_string()));
}

#[tokio::test]
async fn assign_endpoint_adds_worker_once() {
    let app = TestApp::new();
    let (status, task) = app
        .request(
            Method::POST,
            "/api/tasks/T-002/assign",
            Some(json!({ "workerId": "W-001" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["assignedWorkers"], json!(["W-001", "W-002"]));

    let (status, body) = app
        .request(
            Method::POST,
            "/api/tasks/T-002/assign",
            Some(json!({ "workerId": "W-001" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("already assigned"));
}

#[tokio::test]
async fn worker_scoped_task_views() {
    let app = TestApp::new();
    assert_eq!(
        app.ids("/api/tasks/worker/W-001", "taskId").await,
        vec!["T-001", "T-003"]
    );

    let (status, analytics) = app.get("/api/tasks/worker/W-001/analytics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(analytics["totalTasks"], 2);
    assert_eq!(analytics["completed"], 1);
    assert_eq!(analytics["completionRate"], 50);

    let (status, _) = app.get("/api/tasks/worker/W-404/analytics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_patch_changes_only_status() {
    let app = TestApp::new();
    let (status, task) = app
        .request(
            Method::PATCH,
            "/api/tasks/T-002/status",
            Some(json!({ "status": "On Hold" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["status"], "On Hold");
    assert_eq!(task["title"], "Packaging");
}

#[tokio::test]
async fn worker_lookup_endpoints() {
    let app = TestApp::new();
    let (status, worker) = app.get("/api/workers/email/nimal@estate.lk").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(worker["workerId"], "W-001");

    let (_, available) = app.get("/api/workers/available/list").await;
    assert_eq!(available.as_array().unwrap().len(), 1);

    let (_, eligible) = app.get("/api/workers/eligible/users").await;
    assert_eq!(eligible, json!([{ "email": "sunil@estate.lk", "name": "Sunil Bandara", "role": "worker" }]));

    let (status, details) = app.get("/api/workers/W-001/details").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details["tasks"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn uniqueness_checks_answer_exists() {
    let app = TestApp::new();
    let (_, taken) = app.get("/api/cocoProducts/check-pro-id?pro_id=PRO-001").await;
    assert_eq!(taken, json!({ "exists": true }));
    let (_, free) = app.get("/api/stocks/check/stockid?stock_id=STK-900").await;
    assert_eq!(free, json!({ "exists": false }));

    let reorder = json!({
        "order_id": "RO-001",
        "item_id": "ITM-001",
        "unit_cost": 150.5,
        "qty": 12,
        "tot_value": 1806.0,
        "requested_by": "Ruwan"
    });
    let (status, created) = app.request(Method::POST, "/api/rorders", Some(reorder.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["tot_value"], json!(1806.0));

    let (_, taken) = app.get("/api/rorders/check-id?order_id=RO-001").await;
    assert_eq!(taken["exists"], true);

    let (status, body) = app.request(Method::POST, "/api/rorders", Some(reorder)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("RO-001"));
}

#[tokio::test]
async fn invalid_payloads_report_field_errors() {
    let app = TestApp::new();
    let (status, body) = app
        .request(
            Method::POST,
            "/api/rorders",
            Some(json!({
                "order_id": "R!",
                "item_id": "ITM-001",
                "unit_cost": 0,
                "qty": 0,
                "tot_value": 0,
                "requested_by": ""
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = body["fields"].as_object().unwrap();
    for field in ["order_id", "unit_cost", "qty", "requested_by"] {
        assert!(fields.contains_key(field), "missing error for {field}");
    }
}

#[tokio::test]
async fn reserved_above_on_hand_is_rejected_server_side() {
    let app = TestApp::new();
    let (status, _) = app
        .request(
            Method::PUT,
            "/api/cocoProducts/PRO-001",
            Some(json!({
                "pro_id": "PRO-001",
                "pro_name": "Virgin Coconut Oil 500ml",
                "category": "Oil",
                "unit": "bottle",
                "std_cost": 850,
                "sell_price": 1200,
                "qty_on_hand": 10,
                "qty_reserved": 20,
                "reorder_level": 30
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_returns_token_and_user() {
    let app = TestApp::new();
    let (status, body) = app
        .request(
            Method::POST,
            "/api/users/login",
            Some(json!({ "email": "hr@estate.lk", "password": "hr-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["role"], "hr");

    let (status, body) = app
        .request(
            Method::POST,
            "/api/users/login",
            Some(json!({ "email": "hr@estate.lk", "password": "nope" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");
}
