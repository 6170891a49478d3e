use crate::core::challenge::PaymentChallenge;
use crate::core::payment::VerificationParams;
use crate::core::registry::ProviderRegistry;
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};

/// Inputs of a 402 challenge as given on the command line.
#[derive(Debug, Clone)]
pub struct ParamsRequest {
    pub method: String,
    pub content_id: String,
    pub amount: f64,
    pub currency: String,
    pub expires_in_secs: Option<i64>,
    pub metadata: Vec<String>,
}

/// Parses `key=value` pairs into a metadata object.
pub fn parse_metadata(pairs: &[String]) -> Result<Option<Map<String, Value>>> {
    if pairs.is_empty() {
        return Ok(None);
    }
    let mut metadata = Map::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("Metadata must be key=value, got: {pair}"))?;
        metadata.insert(key.trim().to_string(), Value::String(value.trim().to_string()));
    }
    Ok(Some(metadata))
}

fn expiry_from_now(secs: i64) -> Result<DateTime<Utc>> {
    Duration::try_seconds(secs)
        .and_then(|delta| Utc::now().checked_add_signed(delta))
        .ok_or_else(|| anyhow!("Expiry out of range: {secs} seconds"))
}

pub async fn build_challenge(
    registry: &ProviderRegistry,
    request: &ParamsRequest,
) -> Result<PaymentChallenge> {
    let provider = registry.get(&request.method).ok_or_else(|| {
        let known: Vec<String> = registry
            .get_all()
            .iter()
            .map(|p| p.id().to_string())
            .collect();
        anyhow!(
            "Unknown payment method: {} (available: {})",
            request.method,
            known.join(", ")
        )
    })?;

    let mut params = VerificationParams::new(
        &request.content_id,
        request.amount,
        &request.currency,
        &request.method,
    );
    params.expires_at = request.expires_in_secs.map(expiry_from_now).transpose()?;
    params.metadata = parse_metadata(&request.metadata)?;

    PaymentChallenge::build(provider.as_ref(), &params).await
}

pub async fn run(registry: &ProviderRegistry, request: &ParamsRequest) -> Result<()> {
    let challenge = build_challenge(registry, request).await?;
    println!("{}", challenge.to_json_pretty()?);
    Ok(())
}
