//! Wire models mirrored from the backend.
//!
//! The client never owns authoritative state: every type here is a copy of a
//! REST resource as last fetched.

pub mod inventory;
pub mod reorder;
pub mod stock;
pub mod task;
pub mod user;
pub mod worker;

pub use inventory::{CocoProduct, PurchasedItem, Supplier};
pub use reorder::Reorder;
pub use stock::{StockCategory, StockMovement, StockType};
pub use task::{Task, TaskCategory, TaskPriority, TaskStatus};
pub use user::{LoginRequest, LoginResponse, User};
pub use worker::{JobRole, Worker};

use serde::{Deserialize, Serialize};

/// Response of the `check-*` uniqueness endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

/// Normalises a human label typed on the command line ("quality-control",
/// "in_progress") into the canonical spaced form used on the wire.
pub fn normalize_label(raw: &str) -> String {
    raw.trim().replace(['-', '_'], " ")
}

/// Date helpers accepting both `YYYY-MM-DD` and full RFC 3339 timestamps.
///
/// The backend stores dates as timestamps but the forms submit plain dates.
pub mod flexible_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
            .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'")))
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => super::serialize(date, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            let raw = Option::<String>::deserialize(deserializer)?;
            match raw.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(value) => super::parse(value)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{value}'"))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn flexible_date_accepts_plain_and_timestamp_forms() {
        let expected = NaiveDate::from_ymd_opt(1995, 3, 14).unwrap();
        assert_eq!(flexible_date::parse("1995-03-14"), Some(expected));
        assert_eq!(flexible_date::parse("1995-03-14T00:00:00.000Z"), Some(expected));
        assert_eq!(flexible_date::parse("14/03/1995"), None);
    }

    #[test]
    fn labels_are_normalised() {
        assert_eq!(normalize_label("quality-control"), "quality control");
        assert_eq!(normalize_label(" in_progress "), "in progress");
    }
}
