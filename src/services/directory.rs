//! Client-side task/worker directory.
//!
//! Holds the last fetched copies of workers, active tasks and trashed tasks.
//! Filtering and sorting are purely in memory; every mutation goes to the
//! backend and is followed by a full refetch.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::client::LaborApi;
use crate::directory::{TaskFilter, WorkerFilter};
use crate::errors::ServiceError;
use crate::forms::{EntityForm, FormMode, TaskForm, WorkerForm};
use crate::models::{Task, TaskStatus, Worker};

/// In-memory directory backed by a [`LaborApi`].
#[derive(Clone)]
pub struct DirectoryService {
    api: Arc<dyn LaborApi>,
    workers: Vec<Worker>,
    tasks: Vec<Task>,
    trash: Vec<Task>,
}

impl std::fmt::Debug for DirectoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryService")
            .field("workers", &self.workers.len())
            .field("tasks", &self.tasks.len())
            .field("trash", &self.trash.len())
            .finish()
    }
}

/// Logs a failed list load and substitutes an empty list.
fn or_empty<T>(what: &str, result: Result<Vec<T>, ServiceError>) -> Vec<T> {
    result.unwrap_or_else(|err| {
        error!(error = %err, "failed to load {what}");
        Vec::new()
    })
}

impl DirectoryService {
    pub fn new(api: Arc<dyn LaborApi>) -> Self {
        Self {
            api,
            workers: Vec::new(),
            tasks: Vec::new(),
            trash: Vec::new(),
        }
    }

    /// Builds the service and performs the initial fetch.
    pub async fn load(api: Arc<dyn LaborApi>) -> Self {
        let mut directory = Self::new(api);
        directory.refresh().await;
        directory
    }

    pub fn api(&self) -> &dyn LaborApi {
        self.api.as_ref()
    }

    /// Refetches workers, tasks and trash. Never fails: a list that cannot
    /// be loaded is logged and replaced by an empty one.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) {
        let (workers, tasks, trash) = tokio::join!(
            self.api.list_workers(),
            self.api.list_tasks(),
            self.api.list_trash()
        );
        self.workers = or_empty("workers", workers);
        self.tasks = or_empty("tasks", tasks);
        self.trash = or_empty("trashed tasks", trash);
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn trash(&self) -> &[Task] {
        &self.trash
    }

    pub fn worker(&self, worker_id: &str) -> Option<&Worker> {
        self.workers.iter().find(|w| w.worker_id == worker_id)
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.task_id == task_id)
    }

    pub fn visible_workers(&self, filter: &WorkerFilter) -> Vec<Worker> {
        filter.apply(&self.workers)
    }

    pub fn visible_tasks(&self, filter: &TaskFilter) -> Vec<Task> {
        filter.apply(&self.tasks)
    }

    pub fn visible_trash(&self, filter: &TaskFilter) -> Vec<Task> {
        filter.apply(&self.trash)
    }

    /// Tasks assigned to one worker, fetched from the worker endpoint.
    #[instrument(skip(self))]
    pub async fn worker_tasks(&self, worker_id: &str) -> Vec<Task> {
        or_empty("worker tasks", self.api.tasks_for_worker(worker_id).await)
    }

    /// Creates or updates the worker described by `form`.
    #[instrument(skip(self, form))]
    pub async fn save_worker(
        &mut self,
        form: &mut WorkerForm,
        today: NaiveDate,
    ) -> Result<Worker, ServiceError> {
        let payload = form.submit(today)?;
        let saved = match form.mode() {
            FormMode::Create => self.api.create_worker(&payload).await?,
            FormMode::Update => self.api.update_worker(&payload.worker_id, &payload).await?,
        };
        info!(worker_id = %saved.worker_id, "worker saved");
        self.refresh().await;
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn delete_worker(&mut self, worker_id: &str) -> Result<(), ServiceError> {
        self.api.delete_worker(worker_id).await?;
        info!(worker_id, "worker deleted");
        self.refresh().await;
        Ok(())
    }

    /// Creates or updates the task described by `form`. The form (and its
    /// assignment draft) is left untouched on failure.
    #[instrument(skip(self, form))]
    pub async fn save_task(&mut self, form: &mut TaskForm, today: NaiveDate) -> Result<Task, ServiceError> {
        let payload = form.submit(today)?;
        let saved = match form.mode() {
            FormMode::Create => self.api.create_task(&payload).await?,
            FormMode::Update => self.api.update_task(&payload.task_id, &payload).await?,
        };
        info!(task_id = %saved.task_id, workers = saved.assigned_workers.len(), "task saved");
        self.refresh().await;
        Ok(saved)
    }

    /// Moves a task to the trash.
    #[instrument(skip(self))]
    pub async fn trash_task(&mut self, task_id: &str) -> Result<(), ServiceError> {
        self.api.delete_task(task_id).await?;
        info!(task_id, "task moved to trash");
        self.refresh().await;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn restore_task(&mut self, task_id: &str) -> Result<Task, ServiceError> {
        let task = self.api.restore_task(task_id).await?;
        info!(task_id, "task restored");
        self.refresh().await;
        Ok(task)
    }

    /// Permanently removes a trashed task.
    #[instrument(skip(self))]
    pub async fn purge_task(&mut self, task_id: &str) -> Result<(), ServiceError> {
        self.api.delete_task_permanently(task_id).await?;
        info!(task_id, "task permanently deleted");
        self.refresh().await;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn set_status(&mut self, task_id: &str, status: TaskStatus) -> Result<Task, ServiceError> {
        let task = self.api.update_task_status(task_id, status).await?;
        info!(task_id, %status, "task status changed");
        self.refresh().await;
        Ok(task)
    }
}
