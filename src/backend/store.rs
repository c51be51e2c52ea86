use chrono::{NaiveDate, Utc};
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use validator::Validate;

use crate::errors::ServiceError;
use crate::models::{
    reorder::ReorderPayload,
    stock::StockPayload,
    task::{TaskAnalytics, TaskPayload},
    worker::{WorkerAnalytics, WorkerDetails, WorkerPayload, WorkerProfileUpdate},
    CocoProduct, JobRole, LoginRequest, LoginResponse, PurchasedItem, Reorder, StockMovement,
    Supplier, Task, TaskCategory, TaskPriority, TaskStatus, User, Worker,
};

/// Registered login; passwords are compared verbatim.
#[derive(Debug, Clone)]
pub struct Account {
    pub user: User,
    pub password: String,
}

/// Everything the mock backend holds. Lists keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct Store {
    pub accounts: Vec<Account>,
    pub workers: Vec<Worker>,
    pub tasks: Vec<Task>,
    pub trash: Vec<Task>,
    pub products: Vec<CocoProduct>,
    pub purchased: Vec<PurchasedItem>,
    pub suppliers: Vec<Supplier>,
    pub stocks: Vec<StockMovement>,
    pub reorders: Vec<Reorder>,
}

fn not_found(kind: &str, id: &str) -> ServiceError {
    ServiceError::NotFound(format!("{kind} {id} not found"))
}

fn conflict(kind: &str, id: &str) -> ServiceError {
    ServiceError::Conflict(format!("{kind} {id} already exists"))
}

/// Identifiers are immutable: the body must name the record in the path.
fn ensure_same_id(kind: &str, path_id: &str, body_id: &str) -> Result<(), ServiceError> {
    if path_id == body_id {
        Ok(())
    } else {
        Err(ServiceError::BadRequest(format!(
            "{kind} ID cannot be changed ({path_id} -> {body_id})"
        )))
    }
}

fn ensure_reserved_within_on_hand(on_hand: u32, reserved: u32) -> Result<(), ServiceError> {
    if reserved > on_hand {
        return Err(ServiceError::BadRequest(
            "Reserved quantity cannot exceed quantity on hand".into(),
        ));
    }
    Ok(())
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // --- users ---------------------------------------------------------

    pub fn register(&mut self, email: &str, name: &str, role: &str, password: &str) {
        self.accounts.push(Account {
            user: User {
                email: email.to_string(),
                name: name.to_string(),
                role: role.to_string(),
            },
            password: password.to_string(),
        });
    }

    pub fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ServiceError> {
        request.validate()?;
        let account = self
            .accounts
            .iter()
            .find(|a| a.user.email.eq_ignore_ascii_case(&request.email) && a.password == request.password)
            .ok_or_else(|| ServiceError::Unauthorized("Invalid email or password".into()))?;
        Ok(LoginResponse {
            token: uuid::Uuid::new_v4().simple().to_string(),
            user: account.user.clone(),
        })
    }

    /// Worker-role accounts not yet linked to a worker record.
    pub fn eligible_users(&self) -> Vec<User> {
        self.accounts
            .iter()
            .filter(|a| a.user.role.eq_ignore_ascii_case("worker"))
            .filter(|a| {
                !self
                    .workers
                    .iter()
                    .any(|w| w.user_email.eq_ignore_ascii_case(&a.user.email))
            })
            .map(|a| a.user.clone())
            .collect()
    }

    // --- workers -------------------------------------------------------

    fn worker_index(&self, id: &str) -> Result<usize, ServiceError> {
        self.workers
            .iter()
            .position(|w| w.worker_id == id)
            .ok_or_else(|| not_found("Worker", id))
    }

    pub fn worker(&self, id: &str) -> Result<&Worker, ServiceError> {
        Ok(&self.workers[self.worker_index(id)?])
    }

    pub fn create_worker(&mut self, payload: WorkerPayload) -> Result<Worker, ServiceError> {
        if self.workers.iter().any(|w| w.worker_id == payload.worker_id) {
            return Err(conflict("Worker", &payload.worker_id));
        }
        if self
            .workers
            .iter()
            .any(|w| w.user_email.eq_ignore_ascii_case(&payload.user_email))
        {
            return Err(ServiceError::Conflict(format!(
                "{} is already linked to a worker",
                payload.user_email
            )));
        }
        let worker = Worker {
            worker_id: payload.worker_id,
            user_email: payload.user_email,
            name: payload.name,
            job_role: payload.job_role,
            is_available: payload.is_available,
            date_of_birth: Some(payload.date_of_birth),
            nic: payload.nic,
            created_at: Some(Utc::now()),
        };
        self.workers.push(worker.clone());
        Ok(worker)
    }

    pub fn update_worker(&mut self, id: &str, payload: WorkerPayload) -> Result<Worker, ServiceError> {
        ensure_same_id("Worker", id, &payload.worker_id)?;
        let index = self.worker_index(id)?;
        let worker = &mut self.workers[index];
        worker.user_email = payload.user_email;
        worker.name = payload.name;
        worker.job_role = payload.job_role;
        worker.is_available = payload.is_available;
        worker.date_of_birth = Some(payload.date_of_birth);
        worker.nic = payload.nic;
        Ok(worker.clone())
    }

    /// Removes the worker and drops them from every task's assignments.
    pub fn delete_worker(&mut self, id: &str) -> Result<(), ServiceError> {
        let index = self.worker_index(id)?;
        self.workers.remove(index);
        for task in self.tasks.iter_mut().chain(self.trash.iter_mut()) {
            task.assigned_workers.remove(id);
        }
        Ok(())
    }

    pub fn worker_by_email(&self, email: &str) -> Result<&Worker, ServiceError> {
        self.workers
            .iter()
            .find(|w| w.user_email.eq_ignore_ascii_case(email))
            .ok_or_else(|| not_found("Worker with email", email))
    }

    pub fn available_workers(&self) -> Vec<Worker> {
        self.workers.iter().filter(|w| w.is_available).cloned().collect()
    }

    pub fn worker_analytics(&self) -> WorkerAnalytics {
        let mut by_role = BTreeMap::new();
        for worker in &self.workers {
            *by_role.entry(worker.job_role.to_string()).or_insert(0) += 1;
        }
        WorkerAnalytics {
            total_workers: self.workers.len(),
            available_workers: self.workers.iter().filter(|w| w.is_available).count(),
            by_role,
        }
    }

    pub fn worker_details(&self, id: &str) -> Result<WorkerDetails, ServiceError> {
        let worker = self.worker(id)?.clone();
        Ok(WorkerDetails {
            tasks: self.tasks_for_worker(id),
            worker,
        })
    }

    pub fn update_worker_profile(
        &mut self,
        id: &str,
        update: WorkerProfileUpdate,
    ) -> Result<Worker, ServiceError> {
        let index = self.worker_index(id)?;
        let worker = &mut self.workers[index];
        if let Some(name) = update.name {
            worker.name = name;
        }
        if let Some(nic) = update.nic {
            worker.nic = nic;
        }
        if let Some(is_available) = update.is_available {
            worker.is_available = is_available;
        }
        Ok(worker.clone())
    }

    // --- tasks ---------------------------------------------------------

    fn task_index(&self, id: &str) -> Result<usize, ServiceError> {
        self.tasks
            .iter()
            .position(|t| t.task_id == id)
            .ok_or_else(|| not_found("Task", id))
    }

    fn trash_index(&self, id: &str) -> Result<usize, ServiceError> {
        self.trash
            .iter()
            .position(|t| t.task_id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("Task {id} is not in the trash")))
    }

    fn apply_task_payload(task: &mut Task, payload: TaskPayload) {
        task.title = payload.title;
        task.description = payload.description;
        task.priority = payload.priority;
        task.category = payload.category;
        task.status = payload.status;
        task.scheduled_date = payload.scheduled_date;
        task.scheduled_time = payload.scheduled_time;
        task.assigned_workers = payload.assigned_workers.into_iter().collect();
        task.estimated_hours = payload.estimated_hours;
    }

    pub fn create_task(&mut self, payload: TaskPayload) -> Result<Task, ServiceError> {
        let id = payload.task_id.clone();
        if self
            .tasks
            .iter()
            .chain(self.trash.iter())
            .any(|t| t.task_id == id)
        {
            return Err(conflict("Task", &id));
        }
        let mut task = Task {
            task_id: id,
            title: String::new(),
            description: String::new(),
            priority: TaskPriority::default(),
            category: TaskCategory::default(),
            status: TaskStatus::default(),
            scheduled_date: None,
            scheduled_time: None,
            assigned_workers: Default::default(),
            estimated_hours: 1.0,
            created_at: Some(Utc::now()),
            deleted_at: None,
        };
        Self::apply_task_payload(&mut task, payload);
        self.tasks.push(task.clone());
        Ok(task)
    }

    pub fn update_task(&mut self, id: &str, payload: TaskPayload) -> Result<Task, ServiceError> {
        ensure_same_id("Task", id, &payload.task_id)?;
        let index = self.task_index(id)?;
        let task = &mut self.tasks[index];
        Self::apply_task_payload(task, payload);
        Ok(task.clone())
    }

    /// Soft delete: active list to trash.
    pub fn trash_task(&mut self, id: &str) -> Result<(), ServiceError> {
        let index = self.task_index(id)?;
        let mut task = self.tasks.remove(index);
        task.deleted_at = Some(Utc::now());
        self.trash.push(task);
        Ok(())
    }

    pub fn restore_task(&mut self, id: &str) -> Result<Task, ServiceError> {
        let index = self.trash_index(id)?;
        let mut task = self.trash.remove(index);
        task.deleted_at = None;
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Hard delete; only tasks already in the trash can be removed.
    pub fn purge_task(&mut self, id: &str) -> Result<(), ServiceError> {
        let index = self.trash_index(id)?;
        self.trash.remove(index);
        Ok(())
    }

    pub fn tasks_for_worker(&self, worker_id: &str) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| t.is_assigned_to(worker_id))
            .cloned()
            .collect()
    }

    pub fn task_analytics(&self) -> TaskAnalytics {
        TaskAnalytics::from_tasks(&self.tasks)
    }

    pub fn worker_task_analytics(&self, worker_id: &str) -> Result<TaskAnalytics, ServiceError> {
        self.worker_index(worker_id)?;
        Ok(TaskAnalytics::from_tasks(
            self.tasks.iter().filter(|t| t.is_assigned_to(worker_id)),
        ))
    }

    pub fn update_task_status(&mut self, id: &str, status: TaskStatus) -> Result<Task, ServiceError> {
        let index = self.task_index(id)?;
        let task = &mut self.tasks[index];
        task.status = status;
        Ok(task.clone())
    }

    pub fn assign_task(&mut self, id: &str, worker_id: &str) -> Result<Task, ServiceError> {
        self.worker_index(worker_id)?;
        let index = self.task_index(id)?;
        let task = &mut self.tasks[index];
        if !task.assigned_workers.insert(worker_id.to_string()) {
            return Err(ServiceError::BadRequest(format!(
                "Worker {worker_id} is already assigned to task {id}"
            )));
        }
        Ok(task.clone())
    }

    // --- inventory -----------------------------------------------------

    pub fn product_exists(&self, pro_id: &str) -> bool {
        self.products.iter().any(|p| p.pro_id == pro_id)
    }

    pub fn create_product(&mut self, product: CocoProduct) -> Result<CocoProduct, ServiceError> {
        if self.product_exists(&product.pro_id) {
            return Err(conflict("Product", &product.pro_id));
        }
        ensure_reserved_within_on_hand(product.qty_on_hand, product.qty_reserved)?;
        self.products.push(product.clone());
        Ok(product)
    }

    pub fn update_product(&mut self, id: &str, product: CocoProduct) -> Result<CocoProduct, ServiceError> {
        ensure_same_id("Product", id, &product.pro_id)?;
        ensure_reserved_within_on_hand(product.qty_on_hand, product.qty_reserved)?;
        let slot = self
            .products
            .iter_mut()
            .find(|p| p.pro_id == id)
            .ok_or_else(|| not_found("Product", id))?;
        *slot = product.clone();
        Ok(product)
    }

    pub fn create_purchased_item(&mut self, item: PurchasedItem) -> Result<PurchasedItem, ServiceError> {
        if self.purchased.iter().any(|p| p.item_id == item.item_id) {
            return Err(conflict("Item", &item.item_id));
        }
        ensure_reserved_within_on_hand(item.qty_on_hand, item.qty_reserved)?;
        self.purchased.push(item.clone());
        Ok(item)
    }

    pub fn update_purchased_item(
        &mut self,
        id: &str,
        item: PurchasedItem,
    ) -> Result<PurchasedItem, ServiceError> {
        ensure_same_id("Item", id, &item.item_id)?;
        ensure_reserved_within_on_hand(item.qty_on_hand, item.qty_reserved)?;
        let slot = self
            .purchased
            .iter_mut()
            .find(|p| p.item_id == id)
            .ok_or_else(|| not_found("Item", id))?;
        *slot = item.clone();
        Ok(item)
    }

    pub fn create_supplier(&mut self, supplier: Supplier) -> Result<Supplier, ServiceError> {
        if self.suppliers.iter().any(|s| s.sup_id == supplier.sup_id) {
            return Err(conflict("Supplier", &supplier.sup_id));
        }
        self.suppliers.push(supplier.clone());
        Ok(supplier)
    }

    pub fn update_supplier(&mut self, id: &str, supplier: Supplier) -> Result<Supplier, ServiceError> {
        ensure_same_id("Supplier", id, &supplier.sup_id)?;
        let slot = self
            .suppliers
            .iter_mut()
            .find(|s| s.sup_id == id)
            .ok_or_else(|| not_found("Supplier", id))?;
        *slot = supplier.clone();
        Ok(supplier)
    }

    pub fn stock_exists(&self, stock_id: &str) -> bool {
        self.stocks.iter().any(|s| s.stock_id == stock_id)
    }

    fn movement_from(payload: StockPayload) -> StockMovement {
        StockMovement {
            stock_id: payload.stock_id,
            item_id: payload.item_id,
            category: payload.category,
            movement_type: payload.movement_type,
            reason: payload.reason,
            qty: payload.qty,
            tot_value: payload.tot_value,
            date: payload.date,
        }
    }

    pub fn create_stock(&mut self, payload: StockPayload) -> Result<StockMovement, ServiceError> {
        payload.validate()?;
        if self.stock_exists(&payload.stock_id) {
            return Err(conflict("Stock record", &payload.stock_id));
        }
        let movement = Self::movement_from(payload);
        self.stocks.push(movement.clone());
        Ok(movement)
    }

    pub fn update_stock(&mut self, id: &str, payload: StockPayload) -> Result<StockMovement, ServiceError> {
        payload.validate()?;
        ensure_same_id("Stock", id, &payload.stock_id)?;
        let slot = self
            .stocks
            .iter_mut()
            .find(|s| s.stock_id == id)
            .ok_or_else(|| not_found("Stock record", id))?;
        *slot = Self::movement_from(payload);
        Ok(slot.clone())
    }

    pub fn reorder_exists(&self, order_id: &str) -> bool {
        self.reorders.iter().any(|r| r.order_id == order_id)
    }

    pub fn create_reorder(&mut self, payload: ReorderPayload) -> Result<Reorder, ServiceError> {
        payload.validate()?;
        if self.reorder_exists(&payload.order_id) {
            return Err(conflict("Reorder", &payload.order_id));
        }
        let reorder = Reorder {
            order_id: payload.order_id,
            item_id: payload.item_id,
            unit_cost: payload.unit_cost,
            qty: payload.qty,
            tot_value: payload.tot_value,
            requested_by: payload.requested_by,
            created_at: Some(Utc::now()),
        };
        self.reorders.push(reorder.clone());
        Ok(reorder)
    }

    pub fn update_reorder(&mut self, id: &str, payload: ReorderPayload) -> Result<Reorder, ServiceError> {
        payload.validate()?;
        ensure_same_id("Reorder", id, &payload.order_id)?;
        let slot = self
            .reorders
            .iter_mut()
            .find(|r| r.order_id == id)
            .ok_or_else(|| not_found("Reorder", id))?;
        slot.item_id = payload.item_id;
        slot.unit_cost = payload.unit_cost;
        slot.qty = payload.qty;
        slot.tot_value = payload.tot_value;
        slot.requested_by = payload.requested_by;
        Ok(slot.clone())
    }

    /// Small estate used by `labor-mock-server` and the integration tests.
    pub fn seeded(today: NaiveDate) -> Self {
        let mut store = Store::new();
        store.register("hr@estate.lk", "Dilani Fernando", "hr", "hr-pass");
        store.register("inventory@estate.lk", "Ruwan Jayasinghe", "inventory", "inv-pass");
        store.register("nimal@estate.lk", "Nimal Perera", "worker", "worker-pass");
        store.register("kamal@estate.lk", "Kamal Silva", "worker", "worker-pass");
        store.register("sunil@estate.lk", "Sunil Bandara", "worker", "worker-pass");

        let birth = |years: u32| crate::validation::dates::years_before(today, years);
        let seed_workers = [
            ("W-001", "nimal@estate.lk", "Nimal Perera", JobRole::Harvesting, true, birth(30)),
            ("W-002", "kamal@estate.lk", "Kamal Silva", JobRole::Packaging, false, birth(25)),
        ];
        for (id, email, name, role, available, dob) in seed_workers {
            let _ = store.create_worker(WorkerPayload {
                worker_id: id.into(),
                user_email: email.into(),
                name: name.into(),
                job_role: role,
                is_available: available,
                date_of_birth: dob,
                nic: String::new(),
            });
        }

        let seed_tasks = [
            ("T-001", "Harvest Field A", "Pick mature nuts in block A", TaskCategory::Harvesting, TaskStatus::InProgress, vec!["W-001"]),
            ("T-002", "Packaging", "harvest-adjacent packing of husks", TaskCategory::Packaging, TaskStatus::ToDo, vec!["W-002"]),
            ("T-003", "Irrigation check", "North block drip lines", TaskCategory::Irrigation, TaskStatus::Completed, vec!["W-001"]),
        ];
        for (id, title, description, category, status, workers) in seed_tasks {
            let _ = store.create_task(TaskPayload {
                task_id: id.into(),
                title: title.into(),
                description: description.into(),
                priority: TaskPriority::Medium,
                category,
                status,
                scheduled_date: Some(today),
                scheduled_time: Some("08:00".into()),
                assigned_workers: workers.into_iter().map(String::from).collect(),
                estimated_hours: 4.0,
            });
        }

        let _ = store.create_product(CocoProduct {
            pro_id: "PRO-001".into(),
            pro_name: "Virgin Coconut Oil 500ml".into(),
            category: "Oil".into(),
            unit: "bottle".into(),
            std_cost: dec!(850),
            sell_price: dec!(1200),
            qty_on_hand: 120,
            qty_reserved: 20,
            reorder_level: 30,
            expire_date: today.checked_add_months(chrono::Months::new(12)),
        });
        let _ = store.create_supplier(Supplier {
            sup_id: "SUP-001".into(),
            sup_name: "Lanka Packaging".into(),
            email: "sales@lankapack.lk".into(),
            phone: "0112345678".into(),
            address: "Colombo 10".into(),
            item_category: "Packaging".into(),
        });
        let _ = store.create_purchased_item(PurchasedItem {
            item_id: "ITM-001".into(),
            item_name: "Glass bottles 500ml".into(),
            category: "Packaging".into(),
            unit: "pcs".into(),
            unit_cost: dec!(45),
            qty_on_hand: 400,
            qty_reserved: 0,
            reorder_level: 100,
            supplier_id: Some("SUP-001".into()),
        });
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn trash_lifecycle() {
        let mut store = Store::seeded(today());
        store.trash_task("T-001").unwrap();
        assert!(store.tasks.iter().all(|t| t.task_id != "T-001"));
        assert!(store.trash[0].deleted_at.is_some());

        let restored = store.restore_task("T-001").unwrap();
        assert!(restored.deleted_at.is_none());
        let active_before = store.tasks.clone();

        assert_matches!(store.purge_task("T-001"), Err(ServiceError::NotFound(_)));
        assert_eq!(store.tasks, active_before);

        store.trash_task("T-001").unwrap();
        store.purge_task("T-001").unwrap();
        assert!(store.trash.is_empty());
        assert!(store.tasks.iter().all(|t| t.task_id != "T-001"));
    }

    #[test]
    fn duplicate_ids_conflict_across_trash() {
        let mut store = Store::seeded(today());
        store.trash_task("T-002").unwrap();
        let payload = TaskPayload::from(&store.trash[0]);
        assert_matches!(store.create_task(payload), Err(ServiceError::Conflict(_)));
    }

    #[test]
    fn assignment_requires_known_worker_and_is_idempotent_guarded() {
        let mut store = Store::seeded(today());
        assert_matches!(store.assign_task("T-002", "W-404"), Err(ServiceError::NotFound(_)));
        let task = store.assign_task("T-002", "W-001").unwrap();
        assert!(task.is_assigned_to("W-001"));
        assert_matches!(store.assign_task("T-002", "W-001"), Err(ServiceError::BadRequest(_)));
    }

    #[test]
    fn deleting_worker_unassigns_them() {
        let mut store = Store::seeded(today());
        store.delete_worker("W-001").unwrap();
        assert!(store.tasks.iter().all(|t| !t.is_assigned_to("W-001")));
    }

    #[test]
    fn eligible_users_exclude_linked_accounts() {
        let store = Store::seeded(today());
        let emails: Vec<_> = store.eligible_users().into_iter().map(|u| u.email).collect();
        assert_eq!(emails, vec!["sunil@estate.lk"]);
    }

    #[test]
    fn reserved_above_on_hand_is_rejected() {
        let mut store = Store::seeded(today());
        let mut product = store.products[0].clone();
        product.qty_reserved = product.qty_on_hand + 1;
        assert_matches!(
            store.update_product("PRO-001", product),
            Err(ServiceError::BadRequest(_))
        );
    }

    #[test]
    fn ids_are_immutable_on_update() {
        let mut store = Store::seeded(today());
        let mut supplier = store.suppliers[0].clone();
        supplier.sup_id = "SUP-999".into();
        assert_matches!(
            store.update_supplier("SUP-001", supplier),
            Err(ServiceError::BadRequest(_))
        );
    }

    #[test]
    fn login_checks_password() {
        let store = Store::seeded(today());
        let ok = store
            .login(&LoginRequest {
                email: "HR@estate.lk".into(),
                password: "hr-pass".into(),
            })
            .unwrap();
        assert_eq!(ok.user.role, "hr");
        assert_matches!(
            store.login(&LoginRequest {
                email: "hr@estate.lk".into(),
                password: "nope".into(),
            }),
            Err(ServiceError::Unauthorized(_))
        );
    }
}
