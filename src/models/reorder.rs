use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{validate_positive_money, ID_PATTERN};

/// Supplier purchase request for inventory replenishment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reorder {
    pub order_id: String,
    pub item_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_cost: Decimal,
    pub qty: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub tot_value: Decimal,
    #[serde(default)]
    pub requested_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST /api/rorders` and `PUT /api/rorders/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ReorderPayload {
    #[validate(regex(path = "ID_PATTERN", message = "must be at least 3 letters, digits, '-' or '_'"))]
    pub order_id: String,
    #[validate(regex(path = "ID_PATTERN", message = "must be at least 3 letters, digits, '-' or '_'"))]
    pub item_id: String,
    #[validate(custom = "validate_positive_money")]
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_cost: Decimal,
    #[validate(range(min = 1, message = "must be a positive whole number"))]
    pub qty: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub tot_value: Decimal,
    #[validate(length(min = 1, message = "is required"))]
    pub requested_by: String,
}
