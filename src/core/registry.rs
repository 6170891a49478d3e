//! Lookup of payment providers by identifier

use super::converter::SharedConverter;
use super::payment::PaymentProvider;
use crate::providers::{CeloProvider, LightningProvider, TonProvider};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Providers keyed by id, enumerated in registration order.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn PaymentProvider>>,
    index: HashMap<String, usize>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in Lightning, Celo and TON providers.
    pub fn with_defaults(converter: SharedConverter) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(LightningProvider::new(Arc::clone(&converter))));
        registry.register(Arc::new(CeloProvider::new(Arc::clone(&converter))));
        registry.register(Arc::new(TonProvider::new(converter)));
        registry
    }

    /// Inserts `provider`; an existing entry with the same id is replaced in place.
    pub fn register(&mut self, provider: Arc<dyn PaymentProvider>) {
        let id = provider.id().to_string();
        match self.index.get(&id) {
            Some(&position) => {
                debug!(%id, "Replacing registered provider");
                self.providers[position] = provider;
            }
            None => {
                debug!(%id, "Registering provider");
                self.index.insert(id, self.providers.len());
                self.providers.push(provider);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn PaymentProvider>> {
        self.index
            .get(id)
            .map(|&position| Arc::clone(&self.providers[position]))
    }

    pub fn get_all(&self) -> Vec<Arc<dyn PaymentProvider>> {
        self.providers.clone()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::converter::{TokenConverter, shared};
    use crate::core::payment::{
        ConfigSchema, PaymentMethodType, VerificationParams, VerificationResult,
    };
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::{Value, json};

    struct MockProvider {
        id: &'static str,
        name: &'static str,
    }

    #[async_trait]
    impl PaymentProvider for MockProvider {
        fn id(&self) -> &str {
            self.id
        }

        fn name(&self) -> &str {
            self.name
        }

        fn method_type(&self) -> PaymentMethodType {
            PaymentMethodType::Custom
        }

        async fn build_params(&self, params: &VerificationParams) -> Result<Value> {
            Ok(json!({ "amount": params.amount }))
        }

        async fn verify(&self, token: &str) -> Result<VerificationResult> {
            Ok(VerificationResult {
                verified: false,
                payment_method: self.id.to_string(),
                transaction_id: Some(token.to_string()),
                timestamp: Utc::now(),
                error: None,
            })
        }

        fn config_schema(&self) -> ConfigSchema {
            ConfigSchema::new()
        }
    }

    #[test]
    fn test_defaults_in_registration_order() {
        let registry = ProviderRegistry::with_defaults(shared(TokenConverter::default()));
        let ids: Vec<String> = registry
            .get_all()
            .iter()
            .map(|p| p.id().to_string())
            .collect();
        assert_eq!(ids, vec!["lightning", "celo", "ton"]);
        assert_eq!(registry.get("ton").unwrap().name(), "TON");
        assert!(registry.get("stripe").is_none());
    }

    #[test]
    fn test_register_then_get() {
        let mut registry = ProviderRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(MockProvider {
            id: "mock",
            name: "Mock",
        }));

        assert_eq!(registry.get("mock").unwrap().id(), "mock");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_same_id_replaces_in_place() {
        let mut registry = ProviderRegistry::with_defaults(shared(TokenConverter::default()));
        let before = registry.len();

        registry.register(Arc::new(MockProvider {
            id: "celo",
            name: "Replacement",
        }));

        assert_eq!(registry.len(), before);
        assert_eq!(registry.get("celo").unwrap().name(), "Replacement");
        assert_eq!(registry.get_all()[1].name(), "Replacement");
    }
}
