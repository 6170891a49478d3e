use super::payment::ConfigSchema;
use super::rates::{RateTable, TokenRate, default_rates};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

fn default_scale() -> f64 {
    1.0
}

/// Maps a rate table symbol to the feed's asset id.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FeedAsset {
    pub symbol: String,
    pub id: String,
    /// Multiplier applied to the quote, e.g. 1e-8 to price SATS from bitcoin.
    #[serde(default = "default_scale")]
    pub scale: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FeedConfig {
    pub base_url: String,
    #[serde(default = "FeedConfig::default_assets")]
    pub assets: Vec<FeedAsset>,
    pub cache_ttl_secs: Option<u64>,
}

impl FeedConfig {
    fn default_assets() -> Vec<FeedAsset> {
        [
            ("BTC", "bitcoin", 1.0),
            ("SATS", "bitcoin", 1e-8),
            ("CELO", "celo", 1.0),
            ("cUSD", "celo-dollar", 1.0),
            ("TON", "the-open-network", 1.0),
        ]
        .into_iter()
        .map(|(symbol, id, scale)| FeedAsset {
            symbol: symbol.to_string(),
            id: id.to_string(),
            scale,
        })
        .collect()
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            base_url: "https://api.coingecko.com".to_string(),
            assets: Self::default_assets(),
            cache_ttl_secs: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CustomProviderConfig {
    pub id: String,
    pub name: String,
    /// Verification URL; `{content_id}` is substituted.
    pub check_url: Option<String>,
    /// Rate table symbol whose gas fee is quoted with the parameters.
    pub fee_token: Option<String>,
    #[serde(default)]
    pub fields: ConfigSchema,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DashboardConfig {
    /// JSON snapshot with `metrics`, `traffic`, `revenue` and `payments`.
    pub records_path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    /// Entries merged over the built-in rates.
    #[serde(default)]
    pub rates: Vec<TokenRate>,
    pub feed: Option<FeedConfig>,
    #[serde(default)]
    pub custom_providers: Vec<CustomProviderConfig>,
    pub dashboard: Option<DashboardConfig>,
}

impl AppConfig {
    /// Loads the default config file, falling back to built-in settings when it is absent.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "p402", "p402")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Built-in rates with the configured entries merged over them, validated.
    pub fn rate_table(&self) -> Result<RateTable> {
        let rates = default_rates().into_iter().chain(self.rates.iter().cloned());
        RateTable::new(rates).context("Invalid rate table in configuration")
    }
}
