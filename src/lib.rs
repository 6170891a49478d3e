pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::params::ParamsRequest;
use crate::core::cache::Cache;
use crate::core::config::AppConfig;
use crate::core::converter::{self, SharedConverter, TokenConverter};
use crate::core::dashboard::{RECENT_ACTIVITY_LIMIT, RecordStore};
use crate::core::registry::ProviderRegistry;
use crate::providers::CustomProvider;
use crate::providers::price_feed::HttpPriceFeed;
use crate::store::{DiskRecordStore, MemoryRecordStore};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum AppCommand {
    Tokens {
        live: bool,
    },
    Convert {
        amount: f64,
        from: String,
        to: String,
        include_gas_fee: bool,
        live: bool,
    },
    Providers,
    Params(ParamsRequest),
    Verify {
        method: String,
        token: String,
    },
    Dashboard {
        limit: Option<usize>,
    },
}

/// Everything a command needs, wired from configuration.
pub struct App {
    pub config: AppConfig,
    pub converter: SharedConverter,
    pub registry: ProviderRegistry,
}

impl App {
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let converter = converter::shared(TokenConverter::new(config.rate_table()?));

        let mut registry = ProviderRegistry::with_defaults(Arc::clone(&converter));
        for custom in &config.custom_providers {
            registry.register(Arc::new(CustomProvider::from_config(
                custom,
                Arc::clone(&converter),
            )));
        }
        debug!(providers = registry.len(), "Payment providers registered");

        Ok(Self {
            config,
            converter,
            registry,
        })
    }

    pub fn record_store(&self) -> Box<dyn RecordStore> {
        match &self.config.dashboard {
            Some(dashboard) => Box::new(DiskRecordStore::new(&dashboard.records_path)),
            None => Box::new(MemoryRecordStore::sample()),
        }
    }

    /// Merges live quotes from the configured feed into the rate table.
    pub async fn refresh_rates(&self) -> Result<()> {
        let feed_config = self.config.feed.clone().unwrap_or_default();
        let cache = Arc::new(match feed_config.cache_ttl_secs {
            Some(secs) => Cache::with_ttl(Duration::from_secs(secs)),
            None => Cache::new(),
        });
        let feed = HttpPriceFeed::new(&feed_config.base_url, cache);
        cli::tokens::refresh(&self.converter, &feed, &feed_config.assets).await
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("p402 starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let app = App::from_config(config)?;

    match command {
        AppCommand::Tokens { live } => {
            if live {
                app.refresh_rates().await?;
            }
            cli::tokens::run(&app.converter)
        }
        AppCommand::Convert {
            amount,
            from,
            to,
            include_gas_fee,
            live,
        } => {
            if live {
                app.refresh_rates().await?;
            }
            cli::convert::run(&app.converter, amount, &from, &to, include_gas_fee)
        }
        AppCommand::Providers => cli::providers::run(&app.registry),
        AppCommand::Params(request) => cli::params::run(&app.registry, &request).await,
        AppCommand::Verify { method, token } => {
            cli::verify::run(&app.registry, &method, &token).await
        }
        AppCommand::Dashboard { limit } => {
            let store = app.record_store();
            cli::dashboard::run(store.as_ref(), limit.unwrap_or(RECENT_ACTIVITY_LIMIT)).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{CustomProviderConfig, DashboardConfig};
    use crate::core::payment::ConfigSchema;

    #[test]
    fn test_custom_provider_overrides_builtin() {
        let config = AppConfig {
            custom_providers: vec![
                CustomProviderConfig {
                    id: "voucher".to_string(),
                    name: "Voucher".to_string(),
                    check_url: None,
                    fee_token: None,
                    fields: ConfigSchema::new(),
                },
                CustomProviderConfig {
                    id: "ton".to_string(),
                    name: "TON via gateway".to_string(),
                    check_url: None,
                    fee_token: Some("TON".to_string()),
                    fields: ConfigSchema::new(),
                },
            ],
            ..Default::default()
        };

        let app = App::from_config(config).unwrap();
        let names: Vec<String> = app
            .registry
            .get_all()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["Lightning Network", "Celo", "TON via gateway", "Voucher"]
        );
    }

    #[tokio::test]
    async fn test_record_store_selection() {
        let app = App::from_config(AppConfig::default()).unwrap();
        assert_eq!(app.record_store().metrics().await.unwrap().len(), 8);

        let app = App::from_config(AppConfig {
            dashboard: Some(DashboardConfig {
                records_path: "/nonexistent/records.json".to_string(),
            }),
            ..Default::default()
        })
        .unwrap();
        assert!(app.record_store().metrics().await.is_err());
    }
}
