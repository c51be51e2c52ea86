//! HTTP client for the labor/inventory REST backend.
//!
//! [`LaborApi`] is the seam the services depend on; [`ApiClient`] is the
//! reqwest implementation. Non-success responses become
//! [`ServiceError::from_response`], which keeps the server's `message`.

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Method, RequestBuilder,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::errors::ServiceError;
use crate::models::{
    reorder::ReorderPayload,
    stock::StockPayload,
    task::{AssignRequest, StatusUpdate, TaskAnalytics, TaskPayload},
    worker::{WorkerAnalytics, WorkerDetails, WorkerPayload, WorkerProfileUpdate},
    CocoProduct, ExistsResponse, LoginRequest, LoginResponse, PurchasedItem, Reorder,
    StockMovement, Supplier, Task, TaskStatus, User, Worker,
};

/// Every backend call the client makes.
#[async_trait]
pub trait LaborApi: Send + Sync {
    // workers
    async fn list_workers(&self) -> Result<Vec<Worker>, ServiceError>;
    async fn create_worker(&self, worker: &WorkerPayload) -> Result<Worker, ServiceError>;
    async fn update_worker(&self, id: &str, worker: &WorkerPayload) -> Result<Worker, ServiceError>;
    async fn delete_worker(&self, id: &str) -> Result<(), ServiceError>;
    async fn worker_by_email(&self, email: &str) -> Result<Worker, ServiceError>;
    async fn eligible_users(&self) -> Result<Vec<User>, ServiceError>;
    async fn available_workers(&self) -> Result<Vec<Worker>, ServiceError>;
    async fn worker_analytics(&self) -> Result<WorkerAnalytics, ServiceError>;
    async fn worker_details(&self, id: &str) -> Result<WorkerDetails, ServiceError>;
    async fn update_worker_profile(
        &self,
        id: &str,
        update: &WorkerProfileUpdate,
    ) -> Result<Worker, ServiceError>;

    // tasks
    async fn list_tasks(&self) -> Result<Vec<Task>, ServiceError>;
    async fn create_task(&self, task: &TaskPayload) -> Result<Task, ServiceError>;
    async fn update_task(&self, id: &str, task: &TaskPayload) -> Result<Task, ServiceError>;
    /// Moves the task to the trash.
    async fn delete_task(&self, id: &str) -> Result<(), ServiceError>;
    async fn list_trash(&self) -> Result<Vec<Task>, ServiceError>;
    async fn restore_task(&self, id: &str) -> Result<Task, ServiceError>;
    async fn delete_task_permanently(&self, id: &str) -> Result<(), ServiceError>;
    async fn task_analytics(&self) -> Result<TaskAnalytics, ServiceError>;
    async fn tasks_for_worker(&self, worker_id: &str) -> Result<Vec<Task>, ServiceError>;
    async fn worker_task_analytics(&self, worker_id: &str) -> Result<TaskAnalytics, ServiceError>;
    async fn update_task_status(&self, id: &str, status: TaskStatus) -> Result<Task, ServiceError>;
    async fn assign_task(&self, id: &str, worker_id: &str) -> Result<Task, ServiceError>;

    // inventory
    async fn list_products(&self) -> Result<Vec<CocoProduct>, ServiceError>;
    async fn create_product(&self, product: &CocoProduct) -> Result<CocoProduct, ServiceError>;
    async fn update_product(
        &self,
        id: &str,
        product: &CocoProduct,
    ) -> Result<CocoProduct, ServiceError>;
    async fn product_id_exists(&self, pro_id: &str) -> Result<bool, ServiceError>;

    async fn list_purchased_items(&self) -> Result<Vec<PurchasedItem>, ServiceError>;
    async fn create_purchased_item(&self, item: &PurchasedItem)
        -> Result<PurchasedItem, ServiceError>;
    async fn update_purchased_item(
        &self,
        id: &str,
        item: &PurchasedItem,
    ) -> Result<PurchasedItem, ServiceError>;

    async fn list_suppliers(&self) -> Result<Vec<Supplier>, ServiceError>;
    async fn create_supplier(&self, supplier: &Supplier) -> Result<Supplier, ServiceError>;
    async fn update_supplier(&self, id: &str, supplier: &Supplier)
        -> Result<Supplier, ServiceError>;

    async fn list_stocks(&self) -> Result<Vec<StockMovement>, ServiceError>;
    async fn create_stock(&self, stock: &StockPayload) -> Result<StockMovement, ServiceError>;
    async fn update_stock(
        &self,
        id: &str,
        stock: &StockPayload,
    ) -> Result<StockMovement, ServiceError>;
    async fn stock_id_exists(&self, stock_id: &str) -> Result<bool, ServiceError>;

    async fn list_reorders(&self) -> Result<Vec<Reorder>, ServiceError>;
    async fn create_reorder(&self, reorder: &ReorderPayload) -> Result<Reorder, ServiceError>;
    async fn update_reorder(
        &self,
        id: &str,
        reorder: &ReorderPayload,
    ) -> Result<Reorder, ServiceError>;
    async fn order_id_exists(&self, order_id: &str) -> Result<bool, ServiceError>;

    // users
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ServiceError>;
}

/// reqwest-backed [`LaborApi`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ServiceError::ConfigError(format!("invalid API base URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::ConfigError(format!(
                "API base URL '{base_url}' cannot hold a path"
            )));
        }
        let client = reqwest::Client::builder()
            .user_agent(concat!("coco-labor/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Sends `Authorization: Bearer <token>` on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/api/{segments...}`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(err) => {
                    warn!("Invalid session token header value: {}", err);
                }
            }
        }
        headers
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!(%method, %url, "backend request");
        self.client.request(method, url).headers(self.auth_headers())
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ServiceError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::from_response(status, &body));
        }
        Ok(response.json::<T>().await?)
    }

    async fn execute_empty(&self, request: RequestBuilder) -> Result<(), ServiceError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::from_response(status, &body));
        }
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ServiceError> {
        self.execute(self.request(Method::GET, segments)).await
    }

    async fn send<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ServiceError> {
        self.execute(self.request(method, segments).json(body)).await
    }

    async fn exists(&self, segments: &[&str], key: &str, value: &str) -> Result<bool, ServiceError> {
        let response: ExistsResponse = self
            .execute(self.request(Method::GET, segments).query(&[(key, value)]))
            .await?;
        Ok(response.exists)
    }
}

#[async_trait]
impl LaborApi for ApiClient {
    #[instrument(skip(self))]
    async fn list_workers(&self) -> Result<Vec<Worker>, ServiceError> {
        self.get(&["workers"]).await
    }

    #[instrument(skip(self, worker), fields(worker_id = %worker.worker_id))]
    async fn create_worker(&self, worker: &WorkerPayload) -> Result<Worker, ServiceError> {
        self.send(Method::POST, &["workers"], worker).await
    }

    #[instrument(skip(self, worker))]
    async fn update_worker(&self, id: &str, worker: &WorkerPayload) -> Result<Worker, ServiceError> {
        self.send(Method::PUT, &["workers", id], worker).await
    }

    #[instrument(skip(self))]
    async fn delete_worker(&self, id: &str) -> Result<(), ServiceError> {
        self.execute_empty(self.request(Method::DELETE, &["workers", id]))
            .await
    }

    #[instrument(skip(self))]
    async fn worker_by_email(&self, email: &str) -> Result<Worker, ServiceError> {
        self.get(&["workers", "email", email]).await
    }

    #[instrument(skip(self))]
    async fn eligible_users(&self) -> Result<Vec<User>, ServiceError> {
        self.get(&["workers", "eligible", "users"]).await
    }

    #[instrument(skip(self))]
    async fn available_workers(&self) -> Result<Vec<Worker>, ServiceError> {
        self.get(&["workers", "available", "list"]).await
    }

    #[instrument(skip(self))]
    async fn worker_analytics(&self) -> Result<WorkerAnalytics, ServiceError> {
        self.get(&["workers", "analytics"]).await
    }

    #[instrument(skip(self))]
    async fn worker_details(&self, id: &str) -> Result<WorkerDetails, ServiceError> {
        self.get(&["workers", id, "details"]).await
    }

    #[instrument(skip(self, update))]
    async fn update_worker_profile(
        &self,
        id: &str,
        update: &WorkerProfileUpdate,
    ) -> Result<Worker, ServiceError> {
        self.send(Method::PUT, &["workers", id, "profile"], update)
            .await
    }

    #[instrument(skip(self))]
    async fn list_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        self.get(&["tasks"]).await
    }

    #[instrument(skip(self, task), fields(task_id = %task.task_id))]
    async fn create_task(&self, task: &TaskPayload) -> Result<Task, ServiceError> {
        self.send(Method::POST, &["tasks"], task).await
    }

    #[instrument(skip(self, task))]
    async fn update_task(&self, id: &str, task: &TaskPayload) -> Result<Task, ServiceError> {
        self.send(Method::PUT, &["tasks", id], task).await
    }

    #[instrument(skip(self))]
    async fn delete_task(&self, id: &str) -> Result<(), ServiceError> {
        self.execute_empty(self.request(Method::DELETE, &["tasks", id]))
            .await
    }

    #[instrument(skip(self))]
    async fn list_trash(&self) -> Result<Vec<Task>, ServiceError> {
        self.get(&["tasks", "trash"]).await
    }

    #[instrument(skip(self))]
    async fn restore_task(&self, id: &str) -> Result<Task, ServiceError> {
        self.execute(self.request(Method::POST, &["tasks", id, "restore"]))
            .await
    }

    #[instrument(skip(self))]
    async fn delete_task_permanently(&self, id: &str) -> Result<(), ServiceError> {
        self.execute_empty(self.request(Method::DELETE, &["tasks", id, "permanent"]))
            .await
    }

    #[instrument(skip(self))]
    async fn task_analytics(&self) -> Result<TaskAnalytics, ServiceError> {
        self.get(&["tasks", "analytics"]).await
    }

    #[instrument(skip(self))]
    async fn tasks_for_worker(&self, worker_id: &str) -> Result<Vec<Task>, ServiceError> {
        self.get(&["tasks", "worker", worker_id]).await
    }

    #[instrument(skip(self))]
    async fn worker_task_analytics(&self, worker_id: &str) -> Result<TaskAnalytics, ServiceError> {
        self.get(&["tasks", "worker", worker_id, "analytics"]).await
    }

    #[instrument(skip(self))]
    async fn update_task_status(&self, id: &str, status: TaskStatus) -> Result<Task, ServiceError> {
        self.send(Method::PATCH, &["tasks", id, "status"], &StatusUpdate { status })
            .await
    }

    #[instrument(skip(self))]
    async fn assign_task(&self, id: &str, worker_id: &str) -> Result<Task, ServiceError> {
        let body = AssignRequest {
            worker_id: worker_id.to_string(),
        };
        self.send(Method::POST, &["tasks", id, "assign"], &body).await
    }

    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<CocoProduct>, ServiceError> {
        self.get(&["cocoProducts"]).await
    }

    #[instrument(skip(self, product), fields(pro_id = %product.pro_id))]
    async fn create_product(&self, product: &CocoProduct) -> Result<CocoProduct, ServiceError> {
        self.send(Method::POST, &["cocoProducts"], product).await
    }

    #[instrument(skip(self, product))]
    async fn update_product(
        &self,
        id: &str,
        product: &CocoProduct,
    ) -> Result<CocoProduct, ServiceError> {
        self.send(Method::PUT, &["cocoProducts", id], product).await
    }

    #[instrument(skip(self))]
    async fn product_id_exists(&self, pro_id: &str) -> Result<bool, ServiceError> {
        self.exists(&["cocoProducts", "check-pro-id"], "pro_id", pro_id)
            .await
    }

    #[instrument(skip(self))]
    async fn list_purchased_items(&self) -> Result<Vec<PurchasedItem>, ServiceError> {
        self.get(&["purchasedItems"]).await
    }

    #[instrument(skip(self, item), fields(item_id = %item.item_id))]
    async fn create_purchased_item(
        &self,
        item: &PurchasedItem,
    ) -> Result<PurchasedItem, ServiceError> {
        self.send(Method::POST, &["purchasedItems"], item).await
    }

    #[instrument(skip(self, item))]
    async fn update_purchased_item(
        &self,
        id: &str,
        item: &PurchasedItem,
    ) -> Result<PurchasedItem, ServiceError> {
        self.send(Method::PUT, &["purchasedItems", id], item).await
    }

    #[instrument(skip(self))]
    async fn list_suppliers(&self) -> Result<Vec<Supplier>, ServiceError> {
        self.get(&["suppliers"]).await
    }

    #[instrument(skip(self, supplier), fields(sup_id = %supplier.sup_id))]
    async fn create_supplier(&self, supplier: &Supplier) -> Result<Supplier, ServiceError> {
        self.send(Method::POST, &["suppliers"], supplier).await
    }

    #[instrument(skip(self, supplier))]
    async fn update_supplier(
        &self,
        id: &str,
        supplier: &Supplier,
    ) -> Result<Supplier, ServiceError> {
        self.send(Method::PUT, &["suppliers", id], supplier).await
    }

    #[instrument(skip(self))]
    async fn list_stocks(&self) -> Result<Vec<StockMovement>, ServiceError> {
        self.get(&["stocks"]).await
    }

    #[instrument(skip(self, stock), fields(stock_id = %stock.stock_id))]
    async fn create_stock(&self, stock: &StockPayload) -> Result<StockMovement, ServiceError> {
        self.send(Method::POST, &["stocks"], stock).await
    }

    #[instrument(skip(self, stock))]
    async fn update_stock(
        &self,
        id: &str,
        stock: &StockPayload,
    ) -> Result<StockMovement, ServiceError> {
        self.send(Method::PUT, &["stocks", id], stock).await
    }

    #[instrument(skip(self))]
    async fn stock_id_exists(&self, stock_id: &str) -> Result<bool, ServiceError> {
        self.exists(&["stocks", "check", "stockid"], "stock_id", stock_id)
            .await
    }

    #[instrument(skip(self))]
    async fn list_reorders(&self) -> Result<Vec<Reorder>, ServiceError> {
        self.get(&["rorders"]).await
    }

    #[instrument(skip(self, reorder), fields(order_id = %reorder.order_id))]
    async fn create_reorder(&self, reorder: &ReorderPayload) -> Result<Reorder, ServiceError> {
        self.send(Method::POST, &["rorders"], reorder).await
    }

    #[instrument(skip(self, reorder))]
    async fn update_reorder(
        &self,
        id: &str,
        reorder: &ReorderPayload,
    ) -> Result<Reorder, ServiceError> {
        self.send(Method::PUT, &["rorders", id], reorder).await
    }

    #[instrument(skip(self))]
    async fn order_id_exists(&self, order_id: &str) -> Result<bool, ServiceError> {
        self.exists(&["rorders", "check-id"], "order_id", order_id)
            .await
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ServiceError> {
        self.send(Method::POST, &["users", "login"], request).await
    }
}
