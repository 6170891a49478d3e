pub mod disk;
pub mod memory;

pub use disk::DiskRecordStore;
pub use memory::MemoryRecordStore;

use crate::core::dashboard::{DashboardMetric, PaymentRequest, RevenuePoint, TrafficPoint};
use serde::{Deserialize, Serialize};

/// The four dashboard collections as stored; any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    #[serde(default)]
    pub metrics: Vec<DashboardMetric>,
    #[serde(default)]
    pub traffic: Vec<TrafficPoint>,
    #[serde(default)]
    pub revenue: Vec<RevenuePoint>,
    #[serde(default)]
    pub payments: Vec<PaymentRequest>,
}

impl RecordSnapshot {
    pub(crate) fn metrics_by_key(&self) -> Vec<DashboardMetric> {
        let mut metrics = self.metrics.clone();
        metrics.sort_by(|a, b| a.metric_key.cmp(&b.metric_key));
        metrics
    }

    pub(crate) fn traffic_oldest_first(&self) -> Vec<TrafficPoint> {
        let mut traffic = self.traffic.clone();
        traffic.sort_by_key(|p| p.recorded_at);
        traffic
    }

    pub(crate) fn revenue_oldest_first(&self) -> Vec<RevenuePoint> {
        let mut revenue = self.revenue.clone();
        revenue.sort_by_key(|p| p.recorded_at);
        revenue
    }

    pub(crate) fn payments_newest_first(&self, limit: usize) -> Vec<PaymentRequest> {
        let mut payments = self.payments.clone();
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        payments.truncate(limit);
        payments
    }
}
