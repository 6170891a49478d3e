use super::RecordSnapshot;
use crate::core::dashboard::{
    DashboardMetric, PaymentRequest, PaymentStatus, RecordStore, RevenuePoint, TrafficPoint,
};
use crate::core::payment::PaymentMethodType;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Record store held entirely in memory.
pub struct MemoryRecordStore {
    snapshot: RecordSnapshot,
}

impl MemoryRecordStore {
    pub fn new(snapshot: RecordSnapshot) -> Self {
        Self { snapshot }
    }

    /// Store seeded with the demonstration figures shown when no database is configured.
    pub fn sample() -> Self {
        Self::new(sample_snapshot())
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn metrics(&self) -> Result<Vec<DashboardMetric>> {
        Ok(self.snapshot.metrics_by_key())
    }

    async fn traffic(&self) -> Result<Vec<TrafficPoint>> {
        Ok(self.snapshot.traffic_oldest_first())
    }

    async fn revenue(&self) -> Result<Vec<RevenuePoint>> {
        Ok(self.snapshot.revenue_oldest_first())
    }

    async fn recent_payments(&self, limit: usize) -> Result<Vec<PaymentRequest>> {
        Ok(self.snapshot.payments_newest_first(limit))
    }
}

fn sample_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 12, 18, 0, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

fn sample_snapshot() -> RecordSnapshot {
    let now = sample_epoch();

    let metrics = [
        ("total_requests", "12,843", Some(12.5), "Last 30 days", "zap"),
        ("verified_payments", "9,234", Some(8.3), "72% conversion rate", "shield-check"),
        ("denied_requests", "3,609", Some(-4.2), "28% of total", "ban"),
        ("revenue_generated", "$8,945", Some(15.8), "Last 30 days", "dollar-sign"),
        ("cost_savings", "$2,341", Some(9.7), "Bandwidth saved", "trending-up"),
        ("avg_payment_value", "$0.97", Some(3.2), "Per transaction", "dollar-sign"),
        ("denied_rate", "28.1%", Some(-4.2), "Improving", "trending-down"),
        ("peak_traffic_hour", "4 PM", None, "167 req/hour", "zap"),
    ]
    .into_iter()
    .map(|(key, value, change, description, icon)| DashboardMetric {
        metric_key: key.to_string(),
        metric_value: value.to_string(),
        metric_change: change,
        description: Some(description.to_string()),
        icon_name: Some(icon.to_string()),
        updated_at: now,
    })
    .collect();

    let day_start = now - Duration::hours(18);
    let traffic = [
        ("00:00", 0, 45, 12, 33),
        ("04:00", 4 * 60, 52, 15, 37),
        ("08:00", 8 * 60, 89, 28, 61),
        ("12:00", 12 * 60, 134, 42, 92),
        ("16:00", 16 * 60, 167, 51, 116),
        ("20:00", 20 * 60, 98, 31, 67),
        ("23:59", 23 * 60 + 59, 76, 23, 53),
    ]
    .into_iter()
    .map(|(label, minutes, inbound, denied, verified)| TrafficPoint {
        time_label: label.to_string(),
        inbound,
        denied,
        verified,
        recorded_at: day_start + Duration::minutes(minutes),
    })
    .collect();

    let week_start = day_start - Duration::days(6);
    let revenue = [
        ("Mon", 245.0, 89.0),
        ("Tue", 312.0, 102.0),
        ("Wed", 289.0, 95.0),
        ("Thu", 378.0, 134.0),
        ("Fri", 421.0, 156.0),
        ("Sat", 198.0, 67.0),
        ("Sun", 167.0, 54.0),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (day, revenue, savings))| RevenuePoint {
        day_label: day.to_string(),
        revenue,
        savings,
        recorded_at: week_start + Duration::days(i as i64),
    })
    .collect();

    let payments = [
        ("1", "premium-content-001", 1000.0, "sats", PaymentMethodType::Lightning, PaymentStatus::Verified, 2),
        ("2", "premium-content-045", 5.99, "cUSD", PaymentMethodType::Celo, PaymentStatus::Failed, 5),
        ("3", "premium-content-023", 2500.0, "sats", PaymentMethodType::Lightning, PaymentStatus::Verified, 8),
        ("4", "premium-content-067", 0.5, "TON", PaymentMethodType::Ton, PaymentStatus::Pending, 12),
        ("5", "premium-content-089", 9.99, "cUSD", PaymentMethodType::Celo, PaymentStatus::Verified, 15),
        ("6", "premium-content-012", 1500.0, "sats", PaymentMethodType::Lightning, PaymentStatus::Failed, 18),
    ]
    .into_iter()
    .map(
        |(id, content_id, amount, currency, method, status, minutes_ago)| PaymentRequest {
            id: id.to_string(),
            content_id: content_id.to_string(),
            amount,
            currency: currency.to_string(),
            payment_method: method,
            status,
            gas_fee: None,
            net_amount: None,
            transaction_id: (status == PaymentStatus::Verified).then(|| format!("tx-{id}")),
            created_at: now - Duration::minutes(minutes_ago),
            expires_at: None,
        },
    )
    .collect();

    RecordSnapshot {
        metrics,
        traffic,
        revenue,
        payments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sample_metrics_sorted_by_key() {
        let store = MemoryRecordStore::sample();
        let metrics = store.metrics().await.unwrap();

        assert_eq!(metrics.len(), 8);
        assert_eq!(metrics[0].metric_key, "avg_payment_value");
        assert_eq!(metrics[7].metric_key, "verified_payments");
        assert!(metrics.windows(2).all(|w| w[0].metric_key <= w[1].metric_key));
    }

    #[tokio::test]
    async fn test_sample_series_oldest_first() {
        let store = MemoryRecordStore::sample();

        let traffic = store.traffic().await.unwrap();
        assert_eq!(traffic.len(), 7);
        assert_eq!(traffic[0].time_label, "00:00");
        assert_eq!(traffic[4].inbound, 167);

        let revenue = store.revenue().await.unwrap();
        assert_eq!(revenue.len(), 7);
        assert_eq!(revenue[0].day_label, "Mon");
        assert_eq!(revenue[6].day_label, "Sun");
    }

    #[tokio::test]
    async fn test_recent_payments_newest_first_with_limit() {
        let store = MemoryRecordStore::sample();

        let all = store.recent_payments(10).await.unwrap();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0].content_id, "premium-content-001");
        assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        let two = store.recent_payments(2).await.unwrap();
        assert_eq!(two.len(), 2);
        assert_eq!(two[1].id, "2");
        assert_eq!(two[0].transaction_id.as_deref(), Some("tx-1"));
        assert!(two[1].transaction_id.is_none());
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = MemoryRecordStore::new(RecordSnapshot::default());
        assert!(store.metrics().await.unwrap().is_empty());
        assert!(store.recent_payments(10).await.unwrap().is_empty());
    }
}
