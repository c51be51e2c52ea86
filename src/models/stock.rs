use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use validator::Validate;

use super::flexible_date;
use crate::validation::ID_PATTERN;

/// Which inventory table a movement refers to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum StockCategory {
    Product,
    Purchased,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum StockType {
    In,
    Out,
}

/// A single inbound or outbound inventory transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    pub stock_id: String,
    pub item_id: String,
    pub category: StockCategory,
    #[serde(rename = "type")]
    pub movement_type: StockType,
    #[serde(default)]
    pub reason: String,
    pub qty: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub tot_value: Decimal,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
}

/// Body of `POST /api/stocks` and `PUT /api/stocks/:id`; the helper unit
/// cost is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StockPayload {
    #[validate(regex(path = "ID_PATTERN", message = "must be at least 3 letters, digits, '-' or '_'"))]
    pub stock_id: String,
    #[validate(regex(path = "ID_PATTERN", message = "must be at least 3 letters, digits, '-' or '_'"))]
    pub item_id: String,
    pub category: StockCategory,
    #[serde(rename = "type")]
    pub movement_type: StockType,
    #[validate(length(min = 1, message = "is required"))]
    pub reason: String,
    #[validate(range(min = 1, message = "must be a positive whole number"))]
    pub qty: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub tot_value: Decimal,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
}
