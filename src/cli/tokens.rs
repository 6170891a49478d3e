use super::ui;
use crate::core::config::FeedAsset;
use crate::core::converter::{self, SharedConverter, TokenConverter};
use crate::providers::price_feed::{PriceFeed, distinct_asset_ids, refresh_rates};
use anyhow::Result;
use comfy_table::{Cell, Table};

/// Renders every supported token with its USD rate and network gas fee.
pub fn rates_table(converter: &TokenConverter) -> Result<Table> {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Token"),
        ui::header_cell("USD Rate"),
        ui::header_cell("Network"),
        ui::header_cell("Gas Fee"),
        ui::header_cell("Gas Fee (USD)"),
    ]);

    for rate in converter.rates() {
        let fee = converter.get_gas_fee(&rate.symbol)?;
        table.add_row(vec![
            Cell::new(&rate.symbol),
            ui::number_cell(format!("{}", rate.usd_rate)),
            Cell::new(rate.family().map_or("-".to_string(), |f| f.to_string())),
            ui::number_cell(format!("{} {}", fee.fee, rate.symbol)),
            ui::number_cell(format!("~${:.2}", fee.fee_in_usd)),
        ]);
    }
    Ok(table)
}

/// Pulls live quotes into `converter`, reporting assets that could not be priced.
pub async fn refresh(
    converter: &SharedConverter,
    feed: &dyn PriceFeed,
    assets: &[FeedAsset],
) -> Result<()> {
    let pb = ui::new_progress_bar(distinct_asset_ids(assets).len() as u64, true);
    pb.set_message("Fetching live rates...");
    let report = refresh_rates(converter, feed, assets, &|| pb.inc(1)).await;
    pb.finish_and_clear();

    for (symbol, error) in &report.failed {
        println!(
            "{}",
            ui::style_text(
                &format!("Kept previous rate for {symbol}: {error}"),
                ui::StyleType::Error
            )
        );
    }
    Ok(())
}

pub fn run(converter: &SharedConverter) -> Result<()> {
    let converter = converter::read(converter);
    println!(
        "{}\n",
        ui::style_text("Supported Tokens", ui::StyleType::Title)
    );
    println!("{}", rates_table(&converter)?);
    Ok(())
}
