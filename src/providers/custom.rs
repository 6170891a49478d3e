use super::{base_params, mock_verification, network_fee};
use crate::core::config::CustomProviderConfig;
use crate::core::converter::SharedConverter;
use crate::core::payment::{
    ConfigSchema, PaymentMethodType, PaymentProvider, VerificationParams, VerificationResult,
};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Provider declared in configuration rather than compiled in.
pub struct CustomProvider {
    id: String,
    name: String,
    check_url: Option<String>,
    fee_token: Option<String>,
    fields: ConfigSchema,
    converter: SharedConverter,
}

impl CustomProvider {
    pub fn from_config(config: &CustomProviderConfig, converter: SharedConverter) -> Self {
        Self {
            id: config.id.clone(),
            name: config.name.clone(),
            check_url: config.check_url.clone(),
            fee_token: config.fee_token.clone(),
            fields: config.fields.clone(),
            converter,
        }
    }

    fn check_url(&self, content_id: &str) -> String {
        match &self.check_url {
            Some(template) => template.replace("{content_id}", content_id),
            None => format!("/api/verify/{}/{}", self.id, content_id),
        }
    }
}

#[async_trait]
impl PaymentProvider for CustomProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn method_type(&self) -> PaymentMethodType {
        PaymentMethodType::Custom
    }

    async fn build_params(&self, params: &VerificationParams) -> Result<Value> {
        let mut bag = base_params(self.check_url(&params.content_id), params);
        if let Some(fee) = self
            .fee_token
            .as_deref()
            .and_then(|token| network_fee(&self.converter, token))
        {
            bag.insert("networkFee".to_string(), fee);
        }
        Ok(Value::Object(bag))
    }

    async fn verify(&self, token: &str) -> Result<VerificationResult> {
        Ok(mock_verification(&self.id, token))
    }

    fn config_schema(&self) -> ConfigSchema {
        self.fields.clone()
    }
}
