//! In-memory implementation of the labor/inventory REST contract.
//!
//! Used by `labor-mock-server` for local runs and by the integration tests.
//! It reproduces the behaviour the client depends on (trash lifecycle,
//! uniqueness checks, `{ message }` error bodies) and nothing more.

pub mod handlers;
pub mod store;

pub use store::Store;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use handlers::*;

/// Shared backend state.
pub type BackendState = Arc<RwLock<Store>>;

pub fn shared(store: Store) -> BackendState {
    Arc::new(RwLock::new(store))
}

fn worker_routes() -> Router<BackendState> {
    Router::new()
        .route("/", get(list_workers).post(create_worker))
        .route("/analytics", get(worker_analytics))
        .route("/email/:email", get(worker_by_email))
        .route("/eligible/users", get(eligible_users))
        .route("/available/list", get(available_workers))
        .route("/:id", put(update_worker).delete(delete_worker))
        .route("/:id/details", get(worker_details))
        .route("/:id/profile", put(update_worker_profile))
}

fn task_routes() -> Router<BackendState> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/trash", get(list_trash))
        .route("/analytics", get(task_analytics))
        .route("/worker/:worker_id", get(tasks_for_worker))
        .route("/worker/:worker_id/analytics", get(worker_task_analytics))
        .route("/:id", put(update_task).delete(trash_task))
        .route("/:id/restore", post(restore_task))
        .route("/:id/permanent", delete(purge_task))
        .route("/:id/status", patch(update_task_status))
        .route("/:id/assign", post(assign_task))
}

fn inventory_routes() -> Router<BackendState> {
    Router::new()
        .route("/cocoProducts", get(list_products).post(create_product))
        .route("/cocoProducts/check-pro-id", get(check_product_id))
        .route("/cocoProducts/:id", put(update_product))
        .route(
            "/purchasedItems",
            get(list_purchased_items).post(create_purchased_item),
        )
        .route("/purchasedItems/:id", put(update_purchased_item))
        .route("/suppliers", get(list_suppliers).post(create_supplier))
        .route("/suppliers/:id", put(update_supplier))
        .route("/stocks", get(list_stocks).post(create_stock))
        .route("/stocks/check/stockid", get(check_stock_id))
        .route("/stocks/:id", put(update_stock))
        .route("/rorders", get(list_reorders).post(create_reorder))
        .route("/rorders/check-id", get(check_order_id))
        .route("/rorders/:id", put(update_reorder))
}

/// Full `/api` router with request tracing and permissive CORS.
pub fn router(state: BackendState) -> Router {
    let api = Router::new()
        .nest("/workers", worker_routes())
        .nest("/tasks", task_routes())
        .merge(inventory_routes())
        .route("/users/login", post(login));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
