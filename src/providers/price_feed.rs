use super::util::with_retry;
use crate::core::cache::Cache;
use crate::core::config::FeedAsset;
use crate::core::converter::{self, SharedConverter};
use crate::core::rates::TokenRate;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Source of live USD quotes for rate table refreshes.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn fetch_usd_price(&self, asset_id: &str) -> Result<f64>;
}

/// Quotes from a CoinGecko style `simple/price` endpoint.
pub struct HttpPriceFeed {
    base_url: String,
    cache: Arc<Cache<String, f64>>,
}

impl HttpPriceFeed {
    pub fn new(base_url: &str, cache: Arc<Cache<String, f64>>) -> Self {
        HttpPriceFeed {
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
        }
    }
}

// { "bitcoin": { "usd": 43500.0 } }
type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

#[async_trait]
impl PriceFeed for HttpPriceFeed {
    #[instrument(name = "FeedPriceFetch", skip(self), fields(asset = %asset_id))]
    async fn fetch_usd_price(&self, asset_id: &str) -> Result<f64> {
        if let Some(cached) = self.cache.get(&asset_id.to_string()).await {
            return Ok(cached);
        }

        let url = format!(
            "{}/api/v3/simple/price?ids={}&vs_currencies=usd",
            self.base_url, asset_id
        );
        debug!("Requesting USD price from {}", url);

        let client = reqwest::Client::builder().user_agent("p402/1.0").build()?;
        let response = with_retry(|| client.get(&url).send(), 3, 500)
            .await
            .map_err(|e| anyhow!("Request error: {} for asset: {}", e, asset_id))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for asset: {}",
                response.status(),
                asset_id
            ));
        }

        let text = response.text().await?;
        let data: SimplePriceResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", asset_id, e))?;

        let price = data
            .get(asset_id)
            .and_then(|quotes| quotes.get("usd"))
            .copied()
            .ok_or_else(|| anyhow!("No USD price found for asset: {}", asset_id))?;

        self.cache.put(asset_id.to_string(), price).await;
        Ok(price)
    }
}

/// Outcome of one rate refresh.
#[derive(Debug, Default)]
pub struct RefreshReport {
    pub updated: Vec<TokenRate>,
    pub failed: Vec<(String, String)>,
}

/// Feed ids in first-seen order; assets sharing an id are fetched once.
pub fn distinct_asset_ids(assets: &[FeedAsset]) -> Vec<&str> {
    let mut seen = HashSet::new();
    assets
        .iter()
        .map(|a| a.id.as_str())
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Fetches every asset's quote and merges the new USD rates into `converter`.
///
/// Existing gas fees are kept. Assets whose quote fails or is not a positive
/// number are reported and leave their current rate untouched.
pub async fn refresh_rates(
    converter: &SharedConverter,
    feed: &dyn PriceFeed,
    assets: &[FeedAsset],
    on_fetched: &(dyn Fn() + Sync),
) -> RefreshReport {
    let quote_futures = distinct_asset_ids(assets).into_iter().map(|id| async move {
        let quote = feed.fetch_usd_price(id).await;
        on_fetched();
        (id, quote)
    });
    let quotes: HashMap<&str, Result<f64>> = join_all(quote_futures).await.into_iter().collect();

    let mut report = RefreshReport::default();
    for asset in assets {
        let quote = match quotes.get(asset.id.as_str()) {
            Some(Ok(price)) => price * asset.scale,
            Some(Err(e)) => {
                report.failed.push((asset.symbol.clone(), e.to_string()));
                continue;
            }
            None => continue,
        };

        if !quote.is_finite() || quote <= 0.0 {
            warn!(symbol = %asset.symbol, quote, "Discarding non-positive quote");
            report
                .failed
                .push((asset.symbol.clone(), format!("Invalid quote: {quote}")));
            continue;
        }

        let gas_fee = converter::read(converter)
            .get_rate(&asset.symbol)
            .and_then(|rate| rate.gas_fee);
        report
            .updated
            .push(TokenRate::new(&asset.symbol, quote, gas_fee));
    }

    converter::write(converter).update_rates(report.updated.clone());
    debug!(
        updated = report.updated.len(),
        failed = report.failed.len(),
        "Rate refresh finished"
    );
    report
}
