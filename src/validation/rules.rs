//! Declarative rule table keyed by entity and field name.
//!
//! Numeric bounds are field specific: product prices and reorder costs use
//! different ranges and must stay that way.

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::models::{JobRole, StockCategory, StockType, TaskCategory, TaskPriority, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum EntityKind {
    Worker,
    Task,
    CocoProduct,
    PurchasedItem,
    Supplier,
    StockMovement,
    Reorder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRule {
    /// On or after today.
    NotBeforeToday,
    /// Inside `[today - days, today]`.
    TrailingWindow { days: i64 },
    /// Holder's age inside the worker age band.
    WorkingAge,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Identifier,
    Text,
    Email,
    Phone,
    Money { min: Decimal, max: Decimal },
    Quantity { min: u32 },
    Hours { min: f64, max: f64, step: f64 },
    Date(DateRule),
    Time,
    Choice(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    pub field: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldRule {
    fn required(field: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            field,
            label,
            kind,
            required: true,
        }
    }

    fn optional(field: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            field,
            label,
            kind,
            required: false,
        }
    }
}

fn choices<T: IntoEnumIterator + ToString>() -> FieldKind {
    FieldKind::Choice(T::iter().map(|v| v.to_string()).collect())
}

fn money(min: Decimal, max: Decimal) -> FieldKind {
    FieldKind::Money { min, max }
}

static RULE_TABLE: Lazy<HashMap<EntityKind, Vec<FieldRule>>> = Lazy::new(|| {
    use FieldKind::*;

    let product_price = money(dec!(0.01), dec!(100000));
    let purchase_cost = money(dec!(10), dec!(1000000));
    let stock_helper_cost = money(dec!(0.01), dec!(1000000));

    let mut table = HashMap::new();
    table.insert(
        EntityKind::Worker,
        vec![
            FieldRule::required("workerId", "Worker ID", Identifier),
            FieldRule::required("userEmail", "User email", Email),
            FieldRule::required("name", "Name", Text),
            FieldRule::required("jobRole", "Job role", choices::<JobRole>()),
            FieldRule::required("dateOfBirth", "Date of birth", Date(DateRule::WorkingAge)),
            FieldRule::required("nic", "NIC", Text),
        ],
    );
    table.insert(
        EntityKind::Task,
        vec![
            FieldRule::required("taskId", "Task ID", Identifier),
            FieldRule::required("title", "Title", Text),
            FieldRule::optional("description", "Description", Text),
            FieldRule::required("priority", "Priority", choices::<TaskPriority>()),
            FieldRule::required("category", "Category", choices::<TaskCategory>()),
            FieldRule::required("status", "Status", choices::<TaskStatus>()),
            FieldRule::required("scheduledDate", "Scheduled date", Date(DateRule::NotBeforeToday)),
            FieldRule::optional("scheduledTime", "Scheduled time", Time),
            FieldRule::required(
                "estimatedHours",
                "Estimated hours",
                Hours {
                    min: 0.5,
                    max: 10.0,
                    step: 0.5,
                },
            ),
        ],
    );
    table.insert(
        EntityKind::CocoProduct,
        vec![
            FieldRule::required("pro_id", "Product ID", Identifier),
            FieldRule::required("pro_name", "Product name", Text),
            FieldRule::required("category", "Category", Text),
            FieldRule::optional("unit", "Unit", Text),
            FieldRule::required("std_cost", "Standard cost", product_price.clone()),
            FieldRule::required("sell_price", "Selling price", product_price),
            FieldRule::required("qty_on_hand", "Quantity on hand", Quantity { min: 0 }),
            FieldRule::required("qty_reserved", "Reserved quantity", Quantity { min: 0 }),
            FieldRule::required("reorder_level", "Reorder level", Quantity { min: 0 }),
            FieldRule::optional("expire_date", "Expiry date", Date(DateRule::NotBeforeToday)),
        ],
    );
    table.insert(
        EntityKind::PurchasedItem,
        vec![
            FieldRule::required("item_id", "Item ID", Identifier),
            FieldRule::required("item_name", "Item name", Text),
            FieldRule::required("category", "Category", Text),
            FieldRule::optional("unit", "Unit", Text),
            FieldRule::required("unit_cost", "Unit cost", purchase_cost.clone()),
            FieldRule::required("qty_on_hand", "Quantity on hand", Quantity { min: 0 }),
            FieldRule::required("qty_reserved", "Reserved quantity", Quantity { min: 0 }),
            FieldRule::required("reorder_level", "Reorder level", Quantity { min: 0 }),
            FieldRule::optional("supplier_id", "Supplier ID", Identifier),
        ],
    );
    table.insert(
        EntityKind::Supplier,
        vec![
            FieldRule::required("sup_id", "Supplier ID", Identifier),
            FieldRule::required("sup_name", "Supplier name", Text),
            FieldRule::required("email", "Email", Email),
            FieldRule::required("phone", "Phone", Phone),
            FieldRule::optional("address", "Address", Text),
            FieldRule::optional("item_category", "Item category", Text),
        ],
    );
    table.insert(
        EntityKind::StockMovement,
        vec![
            FieldRule::required("stock_id", "Stock ID", Identifier),
            FieldRule::required("item_id", "Item ID", Identifier),
            FieldRule::required("category", "Category", choices::<StockCategory>()),
            FieldRule::required("type", "Type", choices::<StockType>()),
            FieldRule::required("reason", "Reason", Text),
            FieldRule::required("qty", "Quantity", Quantity { min: 1 }),
            FieldRule::required("unit_cost", "Unit cost", stock_helper_cost),
            FieldRule::required(
                "date",
                "Date",
                Date(DateRule::TrailingWindow {
                    days: super::dates::STOCK_BACKDATE_DAYS,
                }),
            ),
        ],
    );
    table.insert(
        EntityKind::Reorder,
        vec![
            FieldRule::required("order_id", "Order ID", Identifier),
            FieldRule::required("item_id", "Item ID", Identifier),
            FieldRule::required("unit_cost", "Unit cost", purchase_cost),
            FieldRule::required("qty", "Quantity", Quantity { min: 1 }),
            FieldRule::required("requested_by", "Requested by", Text),
        ],
    );
    table
});

/// Every rule declared for an entity, in form order.
pub fn rules_for(entity: EntityKind) -> &'static [FieldRule] {
    RULE_TABLE
        .get(&entity)
        .map(|rules| rules.as_slice())
        .unwrap_or(&[])
}

pub fn rule(entity: EntityKind, field: &str) -> Option<&'static FieldRule> {
    rules_for(entity).iter().find(|rule| rule.field == field)
}
