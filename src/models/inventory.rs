use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::flexible_date;

/// Finished coconut product held in stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoProduct {
    pub pro_id: String,
    pub pro_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub unit: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub std_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub sell_price: Decimal,
    #[serde(default)]
    pub qty_on_hand: u32,
    #[serde(default)]
    pub qty_reserved: u32,
    #[serde(default)]
    pub reorder_level: u32,
    #[serde(with = "flexible_date::option", default)]
    pub expire_date: Option<NaiveDate>,
}

/// Raw material or consumable bought from a supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchasedItem {
    pub item_id: String,
    pub item_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub unit: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_cost: Decimal,
    #[serde(default)]
    pub qty_on_hand: u32,
    #[serde(default)]
    pub qty_reserved: u32,
    #[serde(default)]
    pub reorder_level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub sup_id: String,
    pub sup_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub item_category: String,
}

/// Items that are low on stock: available quantity at or below reorder level.
pub trait StockLevel {
    fn qty_on_hand(&self) -> u32;
    fn qty_reserved(&self) -> u32;
    fn reorder_level(&self) -> u32;

    fn qty_available(&self) -> u32 {
        self.qty_on_hand().saturating_sub(self.qty_reserved())
    }

    fn needs_reorder(&self) -> bool {
        self.qty_available() <= self.reorder_level()
    }
}

impl StockLevel for CocoProduct {
    fn qty_on_hand(&self) -> u32 {
        self.qty_on_hand
    }
    fn qty_reserved(&self) -> u32 {
        self.qty_reserved
    }
    fn reorder_level(&self) -> u32 {
        self.reorder_level
    }
}

impl StockLevel for PurchasedItem {
    fn qty_on_hand(&self) -> u32 {
        self.qty_on_hand
    }
    fn qty_reserved(&self) -> u32 {
        self.qty_reserved
    }
    fn reorder_level(&self) -> u32 {
        self.reorder_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn money_travels_as_raw_numbers() {
        let item = PurchasedItem {
            item_id: "ITM-01".into(),
            item_name: "Husk bags".into(),
            category: "Packaging".into(),
            unit: "pcs".into(),
            unit_cost: dec!(150.50),
            qty_on_hand: 40,
            qty_reserved: 5,
            reorder_level: 10,
            supplier_id: None,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["unit_cost"], serde_json::json!(150.5));
        assert_eq!(item.qty_available(), 35);
        assert!(!item.needs_reorder());
    }
}
