pub mod celo;
pub mod custom;
pub mod lightning;
pub mod price_feed;
pub mod ton;
pub mod util;

pub use celo::CeloProvider;
pub use custom::CustomProvider;
pub use lightning::LightningProvider;
pub use ton::TonProvider;

use crate::core::converter::{self, SharedConverter};
use crate::core::payment::{VerificationParams, VerificationResult};
use chrono::Utc;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

/// Fabricated verification shared by every provider.
///
/// No payment rail is consulted: any token is reported as a verified payment
/// whose transaction id is the token itself. Replace with a real settlement
/// check before gating real content.
pub(crate) fn mock_verification(provider_id: &str, token: &str) -> VerificationResult {
    warn!(
        provider = %provider_id,
        "Payment verification is mocked; no payment rail was consulted"
    );
    VerificationResult {
        verified: true,
        payment_method: provider_id.to_string(),
        transaction_id: Some(token.to_string()),
        timestamp: Utc::now(),
        error: None,
    }
}

/// Fields every provider emits regardless of network.
pub(crate) fn base_params(check_url: String, params: &VerificationParams) -> Map<String, Value> {
    let mut bag = Map::new();
    bag.insert("amount".to_string(), json!(params.amount));
    bag.insert("currency".to_string(), json!(params.currency));
    if let Some(expires) = params.expires_at {
        bag.insert("expires".to_string(), json!(expires.to_rfc3339()));
    }
    bag.insert("checkUrl".to_string(), json!(check_url));
    if let Some(metadata) = &params.metadata {
        bag.insert("metadata".to_string(), Value::Object(metadata.clone()));
    }
    bag
}

/// Network fee of `token` read from the shared rate table, if the token is priced.
pub(crate) fn network_fee(converter: &SharedConverter, token: &str) -> Option<Value> {
    match converter::read(converter).get_gas_fee(token) {
        Ok(fee) => Some(json!({
            "token": token,
            "fee": fee.fee,
            "feeInUSD": fee.fee_in_usd,
        })),
        Err(e) => {
            debug!(%token, error = %e, "Omitting network fee");
            None
        }
    }
}
