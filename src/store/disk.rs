use super::RecordSnapshot;
use crate::core::dashboard::{
    DashboardMetric, PaymentRequest, RecordStore, RevenuePoint, TrafficPoint,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Record store backed by a JSON snapshot file, re-read on every query.
pub struct DiskRecordStore {
    path: PathBuf,
}

impl DiskRecordStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    async fn load(&self) -> Result<RecordSnapshot> {
        debug!("Reading dashboard records from {}", self.path.display());
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read records file: {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse records file: {}", self.path.display()))
    }
}

#[async_trait]
impl RecordStore for DiskRecordStore {
    async fn metrics(&self) -> Result<Vec<DashboardMetric>> {
        Ok(self.load().await?.metrics_by_key())
    }

    async fn traffic(&self) -> Result<Vec<TrafficPoint>> {
        Ok(self.load().await?.traffic_oldest_first())
    }

    async fn revenue(&self) -> Result<Vec<RevenuePoint>> {
        Ok(self.load().await?.revenue_oldest_first())
    }

    async fn recent_payments(&self, limit: usize) -> Result<Vec<PaymentRequest>> {
        Ok(self.load().await?.payments_newest_first(limit))
    }
}
