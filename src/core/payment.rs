//! Payment provider abstractions and the values they exchange

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt::Display;
use std::ops::Index;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethodType {
    Lightning,
    Celo,
    Ton,
    Custom,
}

impl Display for PaymentMethodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PaymentMethodType::Lightning => "lightning",
                PaymentMethodType::Celo => "celo",
                PaymentMethodType::Ton => "ton",
                PaymentMethodType::Custom => "custom",
            }
        )
    }
}

impl FromStr for PaymentMethodType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lightning" => Ok(PaymentMethodType::Lightning),
            "celo" => Ok(PaymentMethodType::Celo),
            "ton" => Ok(PaymentMethodType::Ton),
            "custom" => Ok(PaymentMethodType::Custom),
            _ => Err(anyhow::anyhow!("Invalid payment method type: {}", s)),
        }
    }
}

/// What a caller wants paid for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationParams {
    pub content_id: String,
    pub amount: f64,
    pub currency: String,
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl VerificationParams {
    pub fn new(content_id: &str, amount: f64, currency: &str, payment_method: &str) -> Self {
        Self {
            content_id: content_id.to_string(),
            amount,
            currency: currency.to_string(),
            payment_method: payment_method.to_string(),
            expires_at: None,
            metadata: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub verified: bool,
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Secret,
    Number,
    Select,
}

/// Describes one configuration input a provider needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigField {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl ConfigField {
    pub fn required(field_type: FieldType, label: &str) -> Self {
        Self {
            field_type,
            required: true,
            label: label.to_string(),
            default: None,
            options: None,
        }
    }

    pub fn select(label: &str, options: &[&str], default: Option<&str>) -> Self {
        Self {
            field_type: FieldType::Select,
            required: false,
            label: label.to_string(),
            default: default.map(str::to_string),
            options: Some(options.iter().map(|o| o.to_string()).collect()),
        }
    }
}

/// Configuration fields of a provider, kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSchema {
    fields: Vec<(String, ConfigField)>,
}

impl ConfigSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `field`; a repeated name replaces the earlier field in place.
    pub fn insert(&mut self, name: String, field: ConfigField) {
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = field,
            None => self.fields.push((name, field)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ConfigField> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, field)| field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigField)> {
        self.fields.iter().map(|(n, f)| (n.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<const N: usize> From<[(String, ConfigField); N]> for ConfigSchema {
    fn from(fields: [(String, ConfigField); N]) -> Self {
        fields.into_iter().collect()
    }
}

impl FromIterator<(String, ConfigField)> for ConfigSchema {
    fn from_iter<I: IntoIterator<Item = (String, ConfigField)>>(iter: I) -> Self {
        let mut schema = Self::new();
        for (name, field) in iter {
            schema.insert(name, field);
        }
        schema
    }
}

impl IntoIterator for ConfigSchema {
    type Item = (String, ConfigField);
    type IntoIter = std::vec::IntoIter<(String, ConfigField)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl Index<&str> for ConfigSchema {
    type Output = ConfigField;

    fn index(&self, name: &str) -> &ConfigField {
        match self.get(name) {
            Some(field) => field,
            None => panic!("No config field named {name}"),
        }
    }
}

impl Serialize for ConfigSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, field) in &self.fields {
            map.serialize_entry(name, field)?;
        }
        map.end()
    }
}

struct ConfigSchemaVisitor;

impl<'de> Visitor<'de> for ConfigSchemaVisitor {
    type Value = ConfigSchema;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("a map of configuration fields")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ConfigSchema, A::Error> {
        let mut schema = ConfigSchema::new();
        while let Some((name, field)) = access.next_entry::<String, ConfigField>()? {
            schema.insert(name, field);
        }
        Ok(schema)
    }
}

impl<'de> Deserialize<'de> for ConfigSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ConfigSchemaVisitor)
    }
}

/// A payment network or method able to price, request and check a payment.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn method_type(&self) -> PaymentMethodType;

    /// Provider specific parameters the payer needs to settle `params`.
    async fn build_params(&self, params: &VerificationParams) -> Result<Value>;

    async fn verify(&self, token: &str) -> Result<VerificationResult>;

    fn config_schema(&self) -> ConfigSchema;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_type_round_trip() {
        for method in ["lightning", "CELO", "Ton", "custom"] {
            let parsed: PaymentMethodType = method.parse().unwrap();
            assert_eq!(parsed.to_string(), method.to_lowercase());
        }
        assert!("stripe".parse::<PaymentMethodType>().is_err());
    }

    #[test]
    fn test_config_field_serialization() {
        let field = ConfigField::select("Network", &["mainnet", "testnet"], Some("mainnet"));
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "select");
        assert_eq!(json["required"], false);
        assert_eq!(json["options"][1], "testnet");
        assert_eq!(json["default"], "mainnet");

        let secret = ConfigField::required(FieldType::Secret, "Macaroon");
        let json = serde_json::to_value(&secret).unwrap();
        assert!(json.get("options").is_none());
        assert_eq!(json["required"], true);
    }

    #[test]
    fn test_config_schema_keeps_declaration_order() {
        let yaml = r#"
zone:
  type: string
  label: "Zone"
account:
  type: secret
  required: true
  label: "Account"
"#;
        let mut schema: ConfigSchema = serde_yaml::from_str(yaml).unwrap();
        let names: Vec<&str> = schema.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zone", "account"]);
        assert!(schema.get("missing").is_none());

        schema.insert(
            "zone".to_string(),
            ConfigField::required(FieldType::Number, "Zone id"),
        );
        let names: Vec<&str> = schema.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zone", "account"]);
        assert_eq!(schema["zone"].field_type, FieldType::Number);

        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.find("zone").unwrap() < json.find("account").unwrap());
    }

    #[test]
    fn test_verification_params_json_shape() {
        let mut params = VerificationParams::new("premium-content-001", 1000.0, "sats", "lightning");
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["contentId"], "premium-content-001");
        assert!(json.get("expiresAt").is_none());

        params.expires_at = Some(Utc::now());
        let json = serde_json::to_value(&params).unwrap();
        assert!(json["expiresAt"].is_string());
    }
}
