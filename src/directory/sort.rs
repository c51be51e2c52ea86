use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

use crate::models::{Task, Worker};

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortKey {
    /// Newest `createdAt` first; records without one sort as the epoch.
    #[default]
    Recent,
    /// `name` for workers, `title` for tasks.
    #[strum(to_string = "name", serialize = "title")]
    Name,
    Id,
}

impl SortKey {
    /// Parses a UI sort value; blank input falls back to `Recent`.
    pub fn parse_or_default(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return SortKey::default();
        }
        SortKey::from_str(raw).unwrap_or_default()
    }
}

/// Case-insensitive comparison with lowercase ordered before uppercase on
/// ties, approximating a root-locale collator for Latin text.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

fn recency(created_at: Option<DateTime<Utc>>) -> i64 {
    created_at.map(|at| at.timestamp_millis()).unwrap_or(0)
}

/// Entities the directory knows how to order.
pub trait Sortable {
    fn sort_id(&self) -> &str;
    fn sort_name(&self) -> &str;
    fn created_at(&self) -> Option<DateTime<Utc>>;
}

impl Sortable for Worker {
    fn sort_id(&self) -> &str {
        &self.worker_id
    }

    fn sort_name(&self) -> &str {
        &self.name
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl Sortable for Task {
    fn sort_id(&self) -> &str {
        &self.task_id
    }

    fn sort_name(&self) -> &str {
        &self.title
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

/// Stable in-place sort of an already-copied vector.
pub fn sort_by_key<T: Sortable>(items: &mut [T], key: SortKey) {
    match key {
        SortKey::Recent => {
            items.sort_by(|a, b| recency(b.created_at()).cmp(&recency(a.created_at())))
        }
        SortKey::Name => items.sort_by(|a, b| locale_cmp(a.sort_name(), b.sort_name())),
        SortKey::Id => items.sort_by(|a, b| locale_cmp(a.sort_id(), b.sort_id())),
    }
}
