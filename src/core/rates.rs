//! Token rate table and the pure arithmetic helpers built on it

use super::error::RateTableError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

/// Decimal places kept for token amounts, fees and exchange rates.
pub const TOKEN_PRECISION: u32 = 8;
/// Decimal places kept for USD display figures.
pub const USD_PRECISION: u32 = 2;

/// Payment network a gas fee is denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkFamily {
    Lightning,
    Celo,
    Ton,
}

impl NetworkFamily {
    /// Number of smallest units in one whole token of the family.
    pub fn divisor(&self) -> f64 {
        match self {
            NetworkFamily::Lightning => 100_000_000.0,
            NetworkFamily::Celo => 1_000_000_000.0,
            NetworkFamily::Ton => 1_000_000_000.0,
        }
    }

    /// Symbol quoted directly in the family's smallest unit, if the table has one.
    pub fn smallest_unit_symbol(&self) -> Option<&'static str> {
        match self {
            NetworkFamily::Lightning => Some("SATS"),
            NetworkFamily::Celo | NetworkFamily::Ton => None,
        }
    }
}

impl Display for NetworkFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                NetworkFamily::Lightning => "Lightning",
                NetworkFamily::Celo => "Celo",
                NetworkFamily::Ton => "TON",
            }
        )
    }
}

/// Fixed transaction cost of a token's network, in the network's smallest unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "amount", rename_all = "lowercase")]
pub enum NetworkFee {
    Sats(u64),
    Gwei(u64),
    Nano(u64),
}

impl NetworkFee {
    pub fn family(&self) -> NetworkFamily {
        match self {
            NetworkFee::Sats(_) => NetworkFamily::Lightning,
            NetworkFee::Gwei(_) => NetworkFamily::Celo,
            NetworkFee::Nano(_) => NetworkFamily::Ton,
        }
    }

    pub fn smallest_units(&self) -> u64 {
        match self {
            NetworkFee::Sats(v) | NetworkFee::Gwei(v) | NetworkFee::Nano(v) => *v,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRate {
    pub symbol: String,
    /// Price of one unit of the token in USD.
    pub usd_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_fee: Option<NetworkFee>,
}

impl TokenRate {
    pub fn new(symbol: &str, usd_rate: f64, gas_fee: Option<NetworkFee>) -> Self {
        Self {
            symbol: symbol.to_string(),
            usd_rate,
            gas_fee,
        }
    }

    pub fn family(&self) -> Option<NetworkFamily> {
        self.gas_fee.map(|fee| fee.family())
    }

    pub fn validate(&self) -> Result<(), RateTableError> {
        if self.symbol.trim().is_empty() {
            return Err(RateTableError::EmptySymbol);
        }
        if !self.usd_rate.is_finite() || self.usd_rate <= 0.0 {
            return Err(RateTableError::InvalidRate {
                symbol: self.symbol.clone(),
                rate: self.usd_rate,
            });
        }
        Ok(())
    }
}

/// Rates the application starts with before any configuration or live feed.
pub fn default_rates() -> Vec<TokenRate> {
    vec![
        TokenRate::new("BTC", 43_500.0, Some(NetworkFee::Sats(500))),
        TokenRate::new("SATS", 0.000435, Some(NetworkFee::Sats(500))),
        TokenRate::new("CELO", 0.65, Some(NetworkFee::Gwei(5_000_000))),
        TokenRate::new("cUSD", 1.0, Some(NetworkFee::Gwei(5_000_000))),
        TokenRate::new("TON", 2.45, Some(NetworkFee::Nano(10_000_000))),
        TokenRate::new("USD", 1.0, None),
    ]
}

/// Rounds half away from zero at `places` decimals of the value's exact decimal expansion.
pub fn round_to(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or_else(|| {
            let factor = 10f64.powi(places as i32);
            (value * factor).round() / factor
        })
}

/// Gas fee of `rate` expressed in units of `rate.symbol`.
///
/// The network's smallest-unit figure is divided down to whole tokens, except
/// when the symbol itself is the smallest unit (SATS), where the raw figure is
/// already in the token's unit. Tokens without a fee figure cost nothing.
pub fn network_fee_in_token_units(rate: &TokenRate) -> f64 {
    let Some(fee) = rate.gas_fee else {
        return 0.0;
    };
    let family = fee.family();
    let raw = fee.smallest_units() as f64;
    if family.smallest_unit_symbol() == Some(rate.symbol.as_str()) {
        raw
    } else {
        raw / family.divisor()
    }
}

/// Symbol-keyed rates that remember insertion order.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    order: Vec<String>,
    entries: HashMap<String, TokenRate>,
}

impl RateTable {
    /// Builds a validated table; a repeated symbol replaces the earlier entry.
    pub fn new(rates: impl IntoIterator<Item = TokenRate>) -> Result<Self, RateTableError> {
        let rates: Vec<TokenRate> = rates.into_iter().collect();
        for rate in &rates {
            rate.validate()?;
        }
        let mut table = Self::default();
        table.merge(rates);
        Ok(table)
    }

    pub fn seeded() -> Self {
        let mut table = Self::default();
        table.merge(default_rates());
        table
    }

    pub fn get(&self, symbol: &str) -> Option<&TokenRate> {
        self.entries.get(symbol)
    }

    pub fn symbols(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenRate> {
        self.order.iter().filter_map(|s| self.entries.get(s))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Shallow merge: known symbols are replaced in place, new symbols are appended.
    pub fn merge(&mut self, rates: impl IntoIterator<Item = TokenRate>) {
        for rate in rates {
            if !self.entries.contains_key(&rate.symbol) {
                self.order.push(rate.symbol.clone());
            }
            self.entries.insert(rate.symbol.clone(), rate);
        }
    }
}
