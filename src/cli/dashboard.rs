use super::ui;
use crate::core::dashboard::{
    DashboardMetric, PaymentRequest, RecordStore, RevenuePoint, TrafficPoint,
};
use anyhow::Result;
use comfy_table::{Cell, Table};

fn metrics_table(metrics: &[DashboardMetric]) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Metric"),
        ui::header_cell("Value"),
        ui::header_cell("Change"),
        ui::header_cell("Description"),
    ]);
    for metric in metrics {
        let change = metric.metric_change.map_or_else(ui::na_cell, ui::change_cell);
        table.add_row(vec![
            Cell::new(metric.metric_key.replace('_', " ")),
            ui::number_cell(metric.metric_value.clone()),
            change,
            Cell::new(metric.description.as_deref().unwrap_or("")),
        ]);
    }
    table
}

fn traffic_table(traffic: &[TrafficPoint]) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Time"),
        ui::header_cell("Inbound"),
        ui::header_cell("Denied"),
        ui::header_cell("Verified"),
    ]);
    for point in traffic {
        table.add_row(vec![
            Cell::new(&point.time_label),
            ui::number_cell(point.inbound.to_string()),
            ui::number_cell(point.denied.to_string()),
            ui::number_cell(point.verified.to_string()),
        ]);
    }
    table
}

fn revenue_table(revenue: &[RevenuePoint]) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Day"),
        ui::header_cell("Revenue ($)"),
        ui::header_cell("Savings ($)"),
    ]);
    for point in revenue {
        table.add_row(vec![
            Cell::new(&point.day_label),
            ui::number_cell(format!("{:.2}", point.revenue)),
            ui::number_cell(format!("{:.2}", point.savings)),
        ]);
    }
    table
}

fn activity_table(payments: &[PaymentRequest]) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Content"),
        ui::header_cell("Amount"),
        ui::header_cell("Method"),
        ui::header_cell("Status"),
        ui::header_cell("Created"),
    ]);
    for payment in payments {
        table.add_row(vec![
            Cell::new(&payment.content_id),
            ui::number_cell(format!("{} {}", payment.amount, payment.currency)),
            Cell::new(payment.payment_method.to_string()),
            ui::status_cell(&payment.status.to_string()),
            Cell::new(payment.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }
    table
}

pub async fn run(store: &dyn RecordStore, limit: usize) -> Result<()> {
    let (metrics, traffic, revenue, payments) = futures::try_join!(
        store.metrics(),
        store.traffic(),
        store.revenue(),
        store.recent_payments(limit)
    )?;

    let sections = [
        ("Overview", metrics_table(&metrics)),
        ("Traffic", traffic_table(&traffic)),
        ("Revenue & Savings", revenue_table(&revenue)),
        ("Recent Activity", activity_table(&payments)),
    ];
    let count = sections.len();
    for (i, (title, table)) in sections.into_iter().enumerate() {
        println!("{}\n", ui::style_text(title, ui::StyleType::Title));
        println!("{table}");
        if i < count - 1 {
            ui::print_separator();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRecordStore;

    #[tokio::test]
    async fn test_tables_from_sample_store() {
        let store = MemoryRecordStore::sample();

        let metrics = metrics_table(&store.metrics().await.unwrap()).to_string();
        assert!(metrics.contains("total requests"));
        assert!(metrics.contains("+12.5%"));
        assert!(metrics.contains("N/A"));

        let activity = activity_table(&store.recent_payments(3).await.unwrap()).to_string();
        assert!(activity.contains("premium-content-001"));
        assert!(!activity.contains("premium-content-067"));

        let revenue = revenue_table(&store.revenue().await.unwrap()).to_string();
        assert!(revenue.contains("421.00"));
    }

    #[test]
    fn test_metric_without_change_shows_na() {
        let metric = |key: &str, change: Option<f64>| DashboardMetric {
            metric_key: key.to_string(),
            metric_value: "7".to_string(),
            metric_change: change,
            description: None,
            icon_name: None,
            updated_at: chrono::Utc::now(),
        };
        let rendered =
            metrics_table(&[metric("peak_hour", None), metric("verified", Some(-3.0))]).to_string();

        assert!(rendered.contains("N/A"));
        assert!(rendered.contains("-3.0%"));
    }

    #[tokio::test]
    async fn test_run_with_sample_store() {
        let store = MemoryRecordStore::sample();
        assert!(run(&store, 10).await.is_ok());
    }
}
