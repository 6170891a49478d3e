use super::ui;
use crate::core::payment::VerificationResult;
use crate::core::registry::ProviderRegistry;
use anyhow::{Result, anyhow};

pub async fn verify(
    registry: &ProviderRegistry,
    method: &str,
    token: &str,
) -> Result<VerificationResult> {
    let provider = registry
        .get(method)
        .ok_or_else(|| anyhow!("Unknown payment method: {}", method))?;
    provider.verify(token).await
}

pub async fn run(registry: &ProviderRegistry, method: &str, token: &str) -> Result<()> {
    let result = verify(registry, method, token).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    println!(
        "{}",
        ui::style_text(
            "Note: verification is simulated; no payment network was queried.",
            ui::StyleType::Subtle
        )
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::converter::{TokenConverter, shared};

    #[tokio::test]
    async fn test_verify_through_registry() {
        let registry = ProviderRegistry::with_defaults(shared(TokenConverter::default()));

        let result = verify(&registry, "celo", "0xabc").await.unwrap();
        assert!(result.verified);
        assert_eq!(result.payment_method, "celo");

        assert!(verify(&registry, "stripe", "x").await.is_err());
    }
}
