//! Domain errors raised by the rate table and converter

use thiserror::Error;

/// Raised by amount conversion and fee lookups.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("Unsupported token: {symbol}")]
    UnsupportedToken { symbol: String },
}

impl ConversionError {
    pub fn unsupported(symbol: &str) -> Self {
        ConversionError::UnsupportedToken {
            symbol: symbol.to_string(),
        }
    }
}

/// Raised when a rate table is loaded with an entry that cannot be priced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RateTableError {
    #[error("invalid USD rate {rate} for token {symbol}: rates must be positive")]
    InvalidRate { symbol: String, rate: f64 },

    #[error("token symbol must not be empty")]
    EmptySymbol,
}
