use super::{base_params, mock_verification, network_fee};
use crate::core::converter::SharedConverter;
use crate::core::payment::{
    ConfigField, ConfigSchema, FieldType, PaymentMethodType, PaymentProvider, VerificationParams,
    VerificationResult,
};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Value, json};

pub struct TonProvider {
    converter: SharedConverter,
}

impl TonProvider {
    pub fn new(converter: SharedConverter) -> Self {
        Self { converter }
    }
}

#[async_trait]
impl PaymentProvider for TonProvider {
    fn id(&self) -> &str {
        "ton"
    }

    fn name(&self) -> &str {
        "TON"
    }

    fn method_type(&self) -> PaymentMethodType {
        PaymentMethodType::Ton
    }

    async fn build_params(&self, params: &VerificationParams) -> Result<Value> {
        let check_url = format!("/api/verify/{}/{}", self.id(), params.content_id);
        let mut bag = base_params(check_url, params);
        bag.insert("address".to_string(), json!("UQ..."));
        // The transfer comment ties the payment to the content
        bag.insert("comment".to_string(), json!(params.content_id));
        if let Some(fee) = network_fee(&self.converter, "TON") {
            bag.insert("networkFee".to_string(), fee);
        }
        Ok(Value::Object(bag))
    }

    async fn verify(&self, token: &str) -> Result<VerificationResult> {
        Ok(mock_verification(self.id(), token))
    }

    fn config_schema(&self) -> ConfigSchema {
        ConfigSchema::from([
            (
                "walletAddress".to_string(),
                ConfigField::required(FieldType::String, "Wallet Address"),
            ),
            (
                "apiKey".to_string(),
                ConfigField::required(FieldType::Secret, "TON Center API Key"),
            ),
            (
                "network".to_string(),
                ConfigField::select("Network", &["mainnet", "testnet"], Some("mainnet")),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::converter::{TokenConverter, shared};
    use serde_json::Map;

    #[tokio::test]
    async fn test_build_params() {
        let provider = TonProvider::new(shared(TokenConverter::default()));
        let mut params = VerificationParams::new("video-42", 0.5, "TON", "ton");
        let mut metadata = Map::new();
        metadata.insert("tier".to_string(), json!("gold"));
        params.metadata = Some(metadata);

        let bag = provider.build_params(&params).await.unwrap();

        assert_eq!(bag["address"], "UQ...");
        assert_eq!(bag["comment"], "video-42");
        assert_eq!(bag["metadata"]["tier"], "gold");
        assert_eq!(bag["networkFee"]["fee"], 0.01);
        assert_eq!(bag["networkFee"]["feeInUSD"], 0.02);
    }

    #[tokio::test]
    async fn test_verify_is_mocked() {
        let provider = TonProvider::new(shared(TokenConverter::default()));
        let result = provider.verify("boc-hash").await.unwrap();
        assert!(result.verified);
        assert_eq!(result.payment_method, "ton");
    }
}
