//! Core business logic abstractions

pub mod cache;
pub mod challenge;
pub mod config;
pub mod converter;
pub mod dashboard;
pub mod error;
pub mod log;
pub mod payment;
pub mod rates;
pub mod registry;

// Re-export main types for cleaner imports
pub use converter::{ConversionResult, GasFee, SharedConverter, TokenConverter};
pub use dashboard::RecordStore;
pub use error::{ConversionError, RateTableError};
pub use payment::{PaymentProvider, VerificationParams, VerificationResult};
pub use rates::{NetworkFamily, NetworkFee, RateTable, TokenRate};
pub use registry::ProviderRegistry;
