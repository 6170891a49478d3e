//! HTTP 402 responses asking a client to pay for content

use super::payment::{PaymentProvider, VerificationParams};
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub const PAYMENT_REQUIRED: u16 = 402;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengePayment {
    pub method: String,
    pub amount: f64,
    pub currency: String,
    pub content_id: String,
    /// Parameters produced by the payment provider.
    pub params: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChallengeBody {
    pub error: String,
    pub message: String,
    pub payment: ChallengePayment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentChallenge {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: ChallengeBody,
}

impl PaymentChallenge {
    pub async fn build(
        provider: &dyn PaymentProvider,
        params: &VerificationParams,
    ) -> Result<Self> {
        let provider_params = provider.build_params(params).await?;
        let method = provider.id().to_string();

        let headers = BTreeMap::from([
            (
                "WWW-Authenticate".to_string(),
                www_authenticate(&method, params),
            ),
            ("Content-Type".to_string(), "application/json".to_string()),
        ]);

        Ok(Self {
            status: PAYMENT_REQUIRED,
            headers,
            body: ChallengeBody {
                error: "Payment Required".to_string(),
                message: "This content requires payment to access".to_string(),
                payment: ChallengePayment {
                    method,
                    amount: params.amount,
                    currency: params.currency.clone(),
                    content_id: params.content_id.clone(),
                    params: provider_params,
                },
            },
        })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn www_authenticate(method: &str, params: &VerificationParams) -> String {
    format!(
        r#"{} amount="{}" currency="{}" content-id="{}""#,
        method.to_uppercase(),
        params.amount,
        params.currency,
        params.content_id
    )
}
