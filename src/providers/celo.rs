use super::{base_params, mock_verification, network_fee};
use crate::core::converter::SharedConverter;
use crate::core::payment::{
    ConfigField, ConfigSchema, FieldType, PaymentMethodType, PaymentProvider, VerificationParams,
    VerificationResult,
};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Value, json};

const CELO_MAINNET_CHAIN_ID: u64 = 42220;

pub struct CeloProvider {
    converter: SharedConverter,
}

impl CeloProvider {
    pub fn new(converter: SharedConverter) -> Self {
        Self { converter }
    }
}

#[async_trait]
impl PaymentProvider for CeloProvider {
    fn id(&self) -> &str {
        "celo"
    }

    fn name(&self) -> &str {
        "Celo"
    }

    fn method_type(&self) -> PaymentMethodType {
        PaymentMethodType::Celo
    }

    async fn build_params(&self, params: &VerificationParams) -> Result<Value> {
        let check_url = format!("/api/verify/{}/{}", self.id(), params.content_id);
        let mut bag = base_params(check_url, params);
        bag.insert("address".to_string(), json!("0x..."));
        bag.insert("chainId".to_string(), json!(CELO_MAINNET_CHAIN_ID));
        // Fees are paid in the native token even for cUSD transfers
        if let Some(fee) = network_fee(&self.converter, "CELO") {
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
                "network".to_string(),
                ConfigField::select("Network", &["mainnet", "alfajores"], Some("mainnet")),
            ),
            (
                "feeCurrency".to_string(),
                ConfigField::select("Fee Currency", &["CELO", "cUSD"], Some("CELO")),
            ),
        ])
    }
}
