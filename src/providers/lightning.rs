use super::{base_params, mock_verification, network_fee};
use crate::core::converter::SharedConverter;
use crate::core::payment::{
    ConfigField, ConfigSchema, FieldType, PaymentMethodType, PaymentProvider, VerificationParams,
    VerificationResult,
};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, instrument};

const FEE_TOKEN: &str = "SATS";

pub struct LightningProvider {
    converter: SharedConverter,
}

impl LightningProvider {
    pub fn new(converter: SharedConverter) -> Self {
        Self { converter }
    }
}

#[async_trait]
impl PaymentProvider for LightningProvider {
    fn id(&self) -> &str {
        "lightning"
    }

    fn name(&self) -> &str {
        "Lightning Network"
    }

    fn method_type(&self) -> PaymentMethodType {
        PaymentMethodType::Lightning
    }

    #[instrument(name = "LightningParams", skip(self, params), fields(content_id = %params.content_id))]
    async fn build_params(&self, params: &VerificationParams) -> Result<Value> {
        let check_url = format!("/api/verify/{}/{}", self.id(), params.content_id);
        let mut bag = base_params(check_url, params);
        // Mock BOLT11 invoice
        bag.insert("invoice".to_string(), json!("lnbc..."));
        if let Some(fee) = network_fee(&self.converter, FEE_TOKEN) {
            bag.insert("networkFee".to_string(), fee);
        }
        debug!("Generated Lightning invoice parameters");
        Ok(Value::Object(bag))
    }

    async fn verify(&self, token: &str) -> Result<VerificationResult> {
        Ok(mock_verification(self.id(), token))
    }

    fn config_schema(&self) -> ConfigSchema {
        ConfigSchema::from([
            (
                "nodeUrl".to_string(),
                ConfigField::required(FieldType::String, "Lightning Node URL"),
            ),
            (
                "macaroon".to_string(),
                ConfigField::required(FieldType::Secret, "Macaroon"),
            ),
        ])
    }
}
