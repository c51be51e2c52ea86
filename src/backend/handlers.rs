use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::BackendState;
use crate::errors::ServiceError;
use crate::models::{
    reorder::ReorderPayload,
    stock::StockPayload,
    task::{AssignRequest, StatusUpdate, TaskPayload},
    worker::{WorkerPayload, WorkerProfileUpdate},
    CocoProduct, ExistsResponse, LoginRequest, PurchasedItem, Supplier,
};

type HandlerResult = Result<Response, ServiceError>;

/// Standard success response
fn success_response<T: Serialize>(data: T) -> HandlerResult {
    Ok((StatusCode::OK, Json(data)).into_response())
}

/// Standard created response
fn created_response<T: Serialize>(data: T) -> HandlerResult {
    Ok((StatusCode::CREATED, Json(data)).into_response())
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

fn message_response(message: impl Into<String>) -> HandlerResult {
    success_response(MessageResponse {
        message: message.into(),
    })
}

fn exists_response(exists: bool) -> HandlerResult {
    success_response(ExistsResponse { exists })
}

#[derive(Debug, Deserialize)]
pub struct ProIdQuery {
    #[serde(default)]
    pro_id: String,
}

#[derive(Debug, Deserialize)]
pub struct StockIdQuery {
    #[serde(default)]
    stock_id: String,
}

#[derive(Debug, Deserialize)]
pub struct OrderIdQuery {
    #[serde(default)]
    order_id: String,
}

// --- users ---------------------------------------------------------------

pub async fn login(State(state): State<BackendState>, Json(request): Json<LoginRequest>) -> HandlerResult {
    let response = state.read().await.login(&request)?;
    info!(email = %response.user.email, role = %response.user.role, "user logged in");
    success_response(response)
}

// --- workers -------------------------------------------------------------

pub async fn list_workers(State(state): State<BackendState>) -> HandlerResult {
    success_response(&state.read().await.workers)
}

pub async fn create_worker(
    State(state): State<BackendState>,
    Json(payload): Json<WorkerPayload>,
) -> HandlerResult {
    let worker = state.write().await.create_worker(payload)?;
    info!(worker_id = %worker.worker_id, "worker created");
    created_response(worker)
}

pub async fn update_worker(
    State(state): State<BackendState>,
    Path(id): Path<String>,
    Json(payload): Json<WorkerPayload>,
) -> HandlerResult {
    success_response(state.write().await.update_worker(&id, payload)?)
}

pub async fn delete_worker(State(state): State<BackendState>, Path(id): Path<String>) -> HandlerResult {
    state.write().await.delete_worker(&id)?;
    info!(worker_id = %id, "worker deleted");
    message_response(format!("Worker {id} deleted"))
}

pub async fn worker_by_email(
    State(state): State<BackendState>,
    Path(email): Path<String>,
) -> HandlerResult {
    success_response(state.read().await.worker_by_email(&email)?)
}

pub async fn eligible_users(State(state): State<BackendState>) -> HandlerResult {
    success_response(state.read().await.eligible_users())
}

pub async fn available_workers(State(state): State<BackendState>) -> HandlerResult {
    success_response(state.read().await.available_workers())
}

pub async fn worker_analytics(State(state): State<BackendState>) -> HandlerResult {
    success_response(state.read().await.worker_analytics())
}

pub async fn worker_details(State(state): State<BackendState>, Path(id): Path<String>) -> HandlerResult {
    success_response(state.read().await.worker_details(&id)?)
}

pub async fn update_worker_profile(
    State(state): State<BackendState>,
    Path(id): Path<String>,
    Json(update): Json<WorkerProfileUpdate>,
) -> HandlerResult {
    success_response(state.write().await.update_worker_profile(&id, update)?)
}

// --- tasks ---------------------------------------------------------------

pub async fn list_tasks(State(state): State<BackendState>) -> HandlerResult {
    success_response(&state.read().await.tasks)
}

pub async fn create_task(
    State(state): State<BackendState>,
    Json(payload): Json<TaskPayload>,
) -> HandlerResult {
    let task = state.write().await.create_task(payload)?;
    info!(task_id = %task.task_id, "task created");
    created_response(task)
}

pub async fn update_task(
    State(state): State<BackendState>,
    Path(id): Path<String>,
    Json(payload): Json<TaskPayload>,
) -> HandlerResult {
    success_response(state.write().await.update_task(&id, payload)?)
}

pub async fn trash_task(State(state): State<BackendState>, Path(id): Path<String>) -> HandlerResult {
    state.write().await.trash_task(&id)?;
    info!(task_id = %id, "task moved to trash");
    message_response(format!("Task {id} moved to trash"))
}

pub async fn list_trash(State(state): State<BackendState>) -> HandlerResult {
    success_response(&state.read().await.trash)
}

pub async fn restore_task(State(state): State<BackendState>, Path(id): Path<String>) -> HandlerResult {
    let task = state.write().await.restore_task(&id)?;
    info!(task_id = %id, "task restored");
    success_response(task)
}

pub async fn purge_task(State(state): State<BackendState>, Path(id): Path<String>) -> HandlerResult {
    state.write().await.purge_task(&id)?;
    info!(task_id = %id, "task permanently deleted");
    message_response(format!("Task {id} permanently deleted"))
}

pub async fn task_analytics(State(state): State<BackendState>) -> HandlerResult {
    success_response(state.read().await.task_analytics())
}

pub async fn tasks_for_worker(
    State(state): State<BackendState>,
    Path(worker_id): Path<String>,
) -> HandlerResult {
    success_response(state.read().await.tasks_for_worker(&worker_id))
}

pub async fn worker_task_analytics(
    State(state): State<BackendState>,
    Path(worker_id): Path<String>,
) -> HandlerResult {
    success_response(state.read().await.worker_task_analytics(&worker_id)?)
}

pub async fn update_task_status(
    State(state): State<BackendState>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> HandlerResult {
    success_response(state.write().await.update_task_status(&id, update.status)?)
}

pub async fn assign_task(
    State(state): State<BackendState>,
    Path(id): Path<String>,
    Json(request): Json<AssignRequest>,
) -> HandlerResult {
    let task = state.write().await.assign_task(&id, &request.worker_id)?;
    info!(task_id = %id, worker_id = %request.worker_id, "worker assigned");
    success_response(task)
}

// --- inventory -----------------------------------------------------------

pub async fn list_products(State(state): State<BackendState>) -> HandlerResult {
    success_response(&state.read().await.products)
}

pub async fn create_product(
    State(state): State<BackendState>,
    Json(product): Json<CocoProduct>,
) -> HandlerResult {
    created_response(state.write().await.create_product(product)?)
}

pub async fn update_product(
    State(state): State<BackendState>,
    Path(id): Path<String>,
    Json(product): Json<CocoProduct>,
) -> HandlerResult {
    success_response(state.write().await.update_product(&id, product)?)
}

pub async fn check_product_id(
    State(state): State<BackendState>,
    Query(query): Query<ProIdQuery>,
) -> HandlerResult {
    exists_response(state.read().await.product_exists(&query.pro_id))
}

pub async fn list_purchased_items(State(state): State<BackendState>) -> HandlerResult {
    success_response(&state.read().await.purchased)
}

pub async fn create_purchased_item(
    State(state): State<BackendState>,
    Json(item): Json<PurchasedItem>,
) -> HandlerResult {
    created_response(state.write().await.create_purchased_item(item)?)
}

pub async fn update_purchased_item(
    State(state): State<BackendState>,
    Path(id): Path<String>,
    Json(item): Json<PurchasedItem>,
) -> HandlerResult {
    success_response(state.write().await.update_purchased_item(&id, item)?)
}

pub async fn list_suppliers(State(state): State<BackendState>) -> HandlerResult {
    success_response(&state.read().await.suppliers)
}

pub async fn create_supplier(
    State(state): State<BackendState>,
    Json(supplier): Json<Supplier>,
) -> HandlerResult {
    created_response(state.write().await.create_supplier(supplier)?)
}

pub async fn update_supplier(
    State(state): State<BackendState>,
    Path(id): Path<String>,
    Json(supplier): Json<Supplier>,
) -> HandlerResult {
    success_response(state.write().await.update_supplier(&id, supplier)?)
}

pub async fn list_stocks(State(state): State<BackendState>) -> HandlerResult {
    success_response(&state.read().await.stocks)
}

pub async fn create_stock(
    State(state): State<BackendState>,
    Json(payload): Json<StockPayload>,
) -> HandlerResult {
    created_response(state.write().await.create_stock(payload)?)
}

pub async fn update_stock(
    State(state): State<BackendState>,
    Path(id): Path<String>,
    Json(payload): Json<StockPayload>,
) -> HandlerResult {
    success_response(state.write().await.update_stock(&id, payload)?)
}

pub async fn check_stock_id(
    State(state): State<BackendState>,
    Query(query): Query<StockIdQuery>,
) -> HandlerResult {
    exists_response(state.read().await.stock_exists(&query.stock_id))
}

pub async fn list_reorders(State(state): State<BackendState>) -> HandlerResult {
    success_response(&state.read().await.reorders)
}

pub async fn create_reorder(
    State(state): State<BackendState>,
    Json(payload): Json<ReorderPayload>,
) -> HandlerResult {
    created_response(state.write().await.create_reorder(payload)?)
}

pub async fn update_reorder(
    State(state): State<BackendState>,
    Path(id): Path<String>,
    Json(payload): Json<ReorderPayload>,
) -> HandlerResult {
    success_response(state.write().await.update_reorder(&id, payload)?)
}

pub async fn check_order_id(
    State(state): State<BackendState>,
    Query(query): Query<OrderIdQuery>,
) -> HandlerResult {
    exists_response(state.read().await.reorder_exists(&query.order_id))
}
