use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::flexible_date;

/// Job role of a worker.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum JobRole {
    General,
    Harvesting,
    Planting,
    Maintenance,
    #[serde(rename = "Quality Control")]
    #[strum(serialize = "Quality Control")]
    QualityControl,
    Packaging,
    Transportation,
}

impl Default for JobRole {
    fn default() -> Self {
        JobRole::General
    }
}

impl JobRole {
    pub fn parse_label(raw: &str) -> Option<Self> {
        super::normalize_label(raw).parse().ok()
    }
}

/// A laborer tracked by the HR module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub worker_id: String,
    #[serde(default)]
    pub user_email: String,
    pub name: String,
    #[serde(default)]
    pub job_role: JobRole,
    #[serde(default)]
    pub is_available: bool,
    #[serde(with = "flexible_date::option", default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub nic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for `POST /api/workers` and `PUT /api/workers/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerPayload {
    pub worker_id: String,
    pub user_email: String,
    pub name: String,
    pub job_role: JobRole,
    pub is_available: bool,
    #[serde(with = "flexible_date")]
    pub date_of_birth: NaiveDate,
    pub nic: String,
}

/// Self-service profile edit (`PUT /api/workers/:id/profile`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

/// `GET /api/workers/:id/details`: a worker with the tasks assigned to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerDetails {
    pub worker: Worker,
    #[serde(default)]
    pub tasks: Vec<super::Task>,
}

/// `GET /api/workers/analytics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerAnalytics {
    pub total_workers: usize,
    pub available_workers: usize,
    #[serde(default)]
    pub by_role: std::collections::BTreeMap<String, usize>,
}
