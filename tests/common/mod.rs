#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use coco_labor::{
    backend::{self, BackendState, Store},
    models::{JobRole, Task, TaskCategory, TaskPriority, TaskStatus, Worker},
    ApiClient,
};
use serde_json::Value;
use tower::ServiceExt;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

/// Harness around the in-memory backend router.
pub struct TestApp {
    router: Router,
    pub state: BackendState,
}

impl TestApp {
    pub fn new() -> Self {
        let state = backend::shared(Store::seeded(today()));
        Self {
            router: backend::router(state.clone()),
            state,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn ids(&self, uri: &str, key: &str) -> Vec<String> {
        let (_, json) = self.get(uri).await;
        json.as_array()
            .unwrap()
            .iter()
            .map(|item| item[key].as_str().unwrap().to_string())
            .collect()
    }
}

/// Serves a freshly seeded backend on an ephemeral port and returns a client
/// pointed at it.
pub async fn spawn_backend() -> (ApiClient, BackendState) {
    let state = backend::shared(Store::seeded(today()));
    let app = backend::router(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    let client = ApiClient::new(&format!("http://{addr}")).unwrap();
    (client, state)
}

pub fn worker(id: &str, name: &str, role: JobRole, available: bool, created_secs: Option<i64>) -> Worker {
    Worker {
        worker_id: id.into(),
        user_email: format!("{}@estate.lk", id.to_lowercase()),
        name: name.into(),
        job_role: role,
        is_available: available,
        date_of_birth: NaiveDate::from_ymd_opt(1995, 3, 14),
        nic: String::new(),
        created_at: created_secs.and_then(|s| chrono::DateTime::from_timestamp(s, 0)),
    }
}

pub fn task(id: &str, title: &str, description: &str, status: TaskStatus, workers: &[&str]) -> Task {
    Task {
        task_id: id.into(),
        title: title.into(),
        description: description.into(),
        priority: TaskPriority::Medium,
        category: TaskCategory::Other,
        status,
        scheduled_date: Some(today()),
        scheduled_time: None,
        assigned_workers: workers.iter().map(|w| w.to_string()).collect(),
        estimated_hours: 1.0,
        created_at: None,
        deleted_at: None,
    }
}
