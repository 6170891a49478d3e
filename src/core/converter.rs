//! Token conversion with network gas fee deduction

use super::error::ConversionError;
use super::rates::{
    RateTable, TOKEN_PRECISION, TokenRate, USD_PRECISION, network_fee_in_token_units, round_to,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Converter shared between the CLI and the payment providers.
///
/// Providers only take the read lock; `update_rates` goes through the write lock.
pub type SharedConverter = Arc<RwLock<TokenConverter>>;

pub fn shared(converter: TokenConverter) -> SharedConverter {
    Arc::new(RwLock::new(converter))
}

pub fn read(converter: &SharedConverter) -> RwLockReadGuard<'_, TokenConverter> {
    converter.read().unwrap_or_else(PoisonError::into_inner)
}

pub fn write(converter: &SharedConverter) -> RwLockWriteGuard<'_, TokenConverter> {
    converter.write().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub from_amount: f64,
    pub from_token: String,
    pub to_amount: f64,
    pub to_token: String,
    pub gas_fee: f64,
    pub gas_fee_token: String,
    pub net_amount: f64,
    pub exchange_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasFee {
    pub fee: f64,
    #[serde(rename = "feeInUSD")]
    pub fee_in_usd: f64,
}

#[derive(Debug, Clone)]
pub struct TokenConverter {
    rates: RateTable,
}

impl Default for TokenConverter {
    fn default() -> Self {
        Self::new(RateTable::seeded())
    }
}

impl TokenConverter {
    pub fn new(rates: RateTable) -> Self {
        Self { rates }
    }

    pub fn get_supported_tokens(&self) -> Vec<String> {
        self.rates.symbols()
    }

    pub fn get_rate(&self, symbol: &str) -> Option<&TokenRate> {
        self.rates.get(symbol)
    }

    pub fn rates(&self) -> impl Iterator<Item = &TokenRate> {
        self.rates.iter()
    }

    fn rate(&self, symbol: &str) -> Result<&TokenRate, ConversionError> {
        self.rates.get(symbol).ok_or_else(|| {
            debug!(%symbol, "Rate lookup failed");
            ConversionError::unsupported(symbol)
        })
    }

    pub fn to_usd(&self, amount: f64, symbol: &str) -> Result<f64, ConversionError> {
        Ok(amount * self.rate(symbol)?.usd_rate)
    }

    pub fn from_usd(&self, usd_amount: f64, symbol: &str) -> Result<f64, ConversionError> {
        Ok(usd_amount / self.rate(symbol)?.usd_rate)
    }

    /// Network gas fee of `symbol` in its own unit and in USD.
    pub fn get_gas_fee(&self, symbol: &str) -> Result<GasFee, ConversionError> {
        let rate = self.rate(symbol)?;
        let fee = network_fee_in_token_units(rate);
        Ok(GasFee {
            fee: round_to(fee, TOKEN_PRECISION),
            fee_in_usd: round_to(fee * rate.usd_rate, USD_PRECISION),
        })
    }

    /// Converts `amount` of `from` into `to`, pricing both through USD.
    ///
    /// With `include_gas_fee` the source network's fee is deducted in USD terms
    /// before re-pricing into the destination token.
    pub fn convert(
        &self,
        amount: f64,
        from: &str,
        to: &str,
        include_gas_fee: bool,
    ) -> Result<ConversionResult, ConversionError> {
        let from_rate = self.rate(from)?;
        let to_rate = self.rate(to)?;

        let usd_value = amount * from_rate.usd_rate;
        let gas_fee = if include_gas_fee {
            network_fee_in_token_units(from_rate)
        } else {
            0.0
        };

        let net_usd_value = usd_value - gas_fee * from_rate.usd_rate;
        let to_amount = net_usd_value / to_rate.usd_rate;
        let exchange_rate = to_amount / amount;

        debug!(
            %from, %to, amount, usd_value, gas_fee, net_usd_value,
            "Converted amount"
        );

        Ok(ConversionResult {
            from_amount: amount,
            from_token: from.to_string(),
            to_amount: round_to(to_amount, TOKEN_PRECISION),
            to_token: to.to_string(),
            gas_fee: round_to(gas_fee, TOKEN_PRECISION),
            gas_fee_token: from.to_string(),
            net_amount: round_to(amount - gas_fee, TOKEN_PRECISION),
            exchange_rate: round_to(exchange_rate, TOKEN_PRECISION),
        })
    }

    /// Merges `rates` into the live table without validating them.
    pub fn update_rates(&mut self, rates: impl IntoIterator<Item = TokenRate>) {
        self.rates.merge(rates);
        debug!(tokens = self.rates.len(), "Rates updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rates::NetworkFee;

    fn scenario_converter() -> TokenConverter {
        let table = RateTable::new(vec![
            TokenRate::new("SATS", 0.000435, Some(NetworkFee::Sats(500))),
            TokenRate::new("TON", 2.45, Some(NetworkFee::Nano(10_000_000))),
        ])
        .unwrap();
        TokenConverter::new(table)
    }

    #[test]
    fn test_convert_sats_to_ton_with_fee() {
        let converter = scenario_converter();
        let result = converter.convert(1000.0, "SATS", "TON", true).unwrap();

        assert_eq!(result.gas_fee, 500.0);
        assert_eq!(result.gas_fee_token, "SATS");
        assert_eq!(result.to_amount, 0.08877551);
        assert_eq!(result.net_amount, 500.0);
        assert_eq!(result.exchange_rate, 0.00008878);
        assert_eq!(result.from_amount, 1000.0);
        assert_eq!(result.to_token, "TON");
        assert!((converter.to_usd(1000.0, "SATS").unwrap() - 0.435).abs() < 1e-12);
    }

    #[test]
    fn test_convert_whole_coin_divides_fee() {
        let converter = TokenConverter::default();
        let result = converter.convert(0.01, "BTC", "USD", true).unwrap();

        assert_eq!(result.gas_fee, 0.000005);
        assert_eq!(result.net_amount, 0.009995);
        assert_eq!(result.to_amount, 434.7825);
    }

    #[test]
    fn test_convert_without_fee() {
        let converter = TokenConverter::default();
        let result = converter.convert(100.0, "CELO", "cUSD", false).unwrap();

        assert_eq!(result.gas_fee, 0.0);
        assert_eq!(result.net_amount, 100.0);
        assert_eq!(result.to_amount, 65.0);
        assert_eq!(result.exchange_rate, 0.65);
    }

    #[test]
    fn test_convert_round_trip_without_fee() {
        let converter = TokenConverter::default();
        let pairs = [("BTC", "TON"), ("CELO", "SATS"), ("cUSD", "USD")];
        for (a, b) in pairs {
            let there = converter.convert(12.5, a, b, false).unwrap();
            let back = converter.convert(there.to_amount, b, a, false).unwrap();
            assert!(
                (back.to_amount - 12.5).abs() < 1e-6,
                "{a} -> {b} -> {a} gave {}",
                back.to_amount
            );
        }
    }

    #[test]
    fn test_convert_names_missing_token() {
        let converter = TokenConverter::default();

        let err = converter.convert(1.0, "DOGE", "TON", true).unwrap_err();
        assert_eq!(err, ConversionError::unsupported("DOGE"));
        assert_eq!(err.to_string(), "Unsupported token: DOGE");

        let err = converter.convert(1.0, "TON", "XRP", true).unwrap_err();
        assert_eq!(err, ConversionError::unsupported("XRP"));
    }

    #[test]
    fn test_usd_round_trip() {
        let converter = TokenConverter::default();
        for symbol in converter.get_supported_tokens() {
            let x = 1234.5678;
            let back = converter
                .to_usd(converter.from_usd(x, &symbol).unwrap(), &symbol)
                .unwrap();
            assert!(((back - x) / x).abs() < 1e-6, "{symbol} round trip gave {back}");
        }
        assert!(converter.to_usd(1.0, "NOPE").is_err());
        assert!(converter.from_usd(1.0, "NOPE").is_err());
    }

    #[test]
    fn test_get_gas_fee() {
        let converter = scenario_converter();
        let fee = converter.get_gas_fee("TON").unwrap();
        assert_eq!(fee, GasFee { fee: 0.01, fee_in_usd: 0.02 });
        assert_eq!(converter.get_gas_fee("TON").unwrap(), fee);

        let sats = converter.get_gas_fee("SATS").unwrap();
        assert_eq!(sats.fee, 500.0);
        assert_eq!(sats.fee_in_usd, 0.22);

        assert_eq!(
            converter.get_gas_fee("BTC").unwrap_err(),
            ConversionError::unsupported("BTC")
        );
    }

    #[test]
    fn test_gas_fee_for_tokens_without_network() {
        let converter = TokenConverter::default();
        let fee = converter.get_gas_fee("USD").unwrap();
        assert_eq!(fee.fee, 0.0);
        assert_eq!(fee.fee_in_usd, 0.0);

        let celo = converter.get_gas_fee("CELO").unwrap();
        assert_eq!(celo.fee, 0.005);
        assert_eq!(celo.fee_in_usd, 0.0);
    }

    #[test]
    fn test_update_rates_counts_distinct_symbols() {
        let mut converter = TokenConverter::default();
        assert_eq!(converter.get_supported_tokens().len(), 6);

        converter.update_rates(vec![
            TokenRate::new("TON", 3.0, Some(NetworkFee::Nano(10_000_000))),
            TokenRate::new("EUR", 1.08, None),
        ]);
        converter.update_rates(vec![TokenRate::new("EUR", 1.09, None)]);

        let tokens = converter.get_supported_tokens();
        assert_eq!(tokens.len(), 7);
        assert_eq!(tokens.last().map(String::as_str), Some("EUR"));
        assert_eq!(converter.get_rate("TON").unwrap().usd_rate, 3.0);
        assert_eq!(converter.get_rate("EUR").unwrap().usd_rate, 1.09);
        assert!(converter.get_rate("DOGE").is_none());
    }

    #[test]
    fn test_shared_converter_locks() {
        let converter = shared(TokenConverter::default());
        write(&converter).update_rates(vec![TokenRate::new("EUR", 1.08, None)]);
        assert!(read(&converter).get_rate("EUR").is_some());
    }
}
