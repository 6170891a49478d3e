//! Dashboard records and the read interface used to fetch them

use super::payment::PaymentMethodType;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Number of payment requests shown in the activity log.
pub const RECENT_ACTIVITY_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetric {
    pub metric_key: String,
    pub metric_value: String,
    pub metric_change: Option<f64>,
    pub description: Option<String>,
    pub icon_name: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Request counts for one time bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficPoint {
    pub time_label: String,
    pub inbound: u64,
    pub denied: u64,
    pub verified: u64,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub day_label: String,
    pub revenue: f64,
    pub savings: f64,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Verified,
    Failed,
    Expired,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PaymentStatus::Pending => "pending",
                PaymentStatus::Verified => "verified",
                PaymentStatus::Failed => "failed",
                PaymentStatus::Expired => "expired",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub id: String,
    pub content_id: String,
    pub amount: f64,
    pub currency: String,
    pub payment_method: PaymentMethodType,
    pub status: PaymentStatus,
    pub gas_fee: Option<f64>,
    pub net_amount: Option<f64>,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Read-only access to the dashboard's record collections.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All metric snapshots ordered by key.
    async fn metrics(&self) -> Result<Vec<DashboardMetric>>;

    /// Traffic buckets, oldest first.
    async fn traffic(&self) -> Result<Vec<TrafficPoint>>;

    /// Revenue buckets, oldest first.
    async fn revenue(&self) -> Result<Vec<RevenuePoint>>;

    /// The `limit` most recent payment requests, newest first.
    async fn recent_payments(&self, limit: usize) -> Result<Vec<PaymentRequest>>;
}
