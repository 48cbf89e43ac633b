//! Dispatch of one conversation to every provider encoder
//!
//! The [`Converter`] normalizes its input once, then runs each encoder
//! exactly once against the same read-only normalized conversation. A
//! failing encoder only fills its own result slot.

use crate::config::{ConfigResult, ConfigValidator, ConverterConfig};
use crate::http::ProviderRequest;
use crate::protocol::{normalize_conversation, Conversation, Message, ValidationError};
use crate::providers::{ConvertError, ConvertResult, EncodedRequest, Encoder, ProviderKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Per-provider outcomes, ordered by provider name
pub type ConversionResults = BTreeMap<ProviderKind, ConvertResult<EncodedRequest>>;

/// Runs every provider encoder over one input
pub struct Converter {
    encoders: Vec<Box<dyn Encoder>>,
}

impl Converter {
    /// Converter with every provider at its defaults
    pub fn new() -> Self {
        Self::with_settings(&ConverterConfig::default())
    }

    /// Converter using the configured provider settings
    ///
    /// The configuration goes through [`ConfigValidator`] first, so a
    /// programmatically built config is held to the same rules as a loaded
    /// file.
    pub fn from_config(config: &ConverterConfig) -> ConfigResult<Self> {
        ConfigValidator::new()?.validate(config)?;
        Ok(Self::with_settings(config))
    }

    fn with_settings(config: &ConverterConfig) -> Self {
        let encoders = ProviderKind::ALL
            .iter()
            .map(|kind| kind.create_encoder(config.providers.get(*kind)))
            .collect();
        Self { encoders }
    }

    /// The encoder for one provider
    pub fn encoder(&self, kind: ProviderKind) -> Option<&dyn Encoder> {
        self.encoders
            .iter()
            .find(|encoder| encoder.kind() == kind)
            .map(|encoder| &**encoder)
    }

    /// Convert a single message
    pub fn convert(&self, message: &Message) -> Result<ConversionResults, ValidationError> {
        self.convert_conversation(&Conversation::from(message.clone()))
    }

    /// Convert a conversation
    ///
    /// Normalization failures reject the whole input. After that, each
    /// provider's result is independent of the others.
    pub fn convert_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<ConversionResults, ValidationError> {
        let normalized = normalize_conversation(conversation)?;
        debug!(
            "Converting {} message(s) for {} provider(s)",
            normalized.messages.len(),
            self.encoders.len()
        );

        let mut results = BTreeMap::new();
        for encoder in &self.encoders {
            let result = encoder.encode(&normalized);
            if let Err(e) = &result {
                warn!("Provider {} failed: {}", encoder.kind(), e);
            }
            results.insert(encoder.kind(), result);
        }
        Ok(results)
    }

    /// Convert a message given as a JSON document
    pub fn convert_json(&self, json: &str) -> ConvertResponse {
        match serde_json::from_str::<Value>(json) {
            Ok(value) => self.convert_value(value),
            Err(e) => ConvertResponse::failure(format!("Invalid JSON: {}", e)),
        }
    }

    /// Convert a message given as a decoded JSON value
    pub fn convert_value(&self, value: Value) -> ConvertResponse {
        let message: Message = match serde_json::from_value(value) {
            Ok(message) => message,
            Err(e) => return ConvertResponse::failure(format!("Invalid message: {}", e)),
        };

        match self.convert(&message) {
            Ok(results) => ConvertResponse {
                success: true,
                results: results
                    .into_iter()
                    .map(|(kind, result)| (kind.as_str().to_string(), ProviderResult::from(result)))
                    .collect(),
                input_validated: Some(message),
                error: None,
            },
            Err(e) => ConvertResponse::failure(e.to_string()),
        }
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

/// Response envelope for callers working in JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertResponse {
    /// Whether the input message was valid; provider failures do not affect it
    pub success: bool,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub results: BTreeMap<String, ProviderResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_validated: Option<Message>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConvertResponse {
    fn failure(error: String) -> Self {
        debug!("Rejected input: {}", error);
        Self {
            success: false,
            results: BTreeMap::new(),
            input_validated: None,
            error: Some(error),
        }
    }
}

/// One provider's slot in the envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_request: Option<ProviderRequest>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lossy_reasons: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl ProviderResult {
    /// Whether the provider produced a request
    pub fn is_success(&self) -> bool {
        self.http_request.is_some()
    }
}

impl From<Result<EncodedRequest, ConvertError>> for ProviderResult {
    fn from(result: Result<EncodedRequest, ConvertError>) -> Self {
        match result {
            Ok(encoded) => Self {
                http_request: Some(encoded.request),
                lossy_reasons: encoded.lossy_reasons,
                error: None,
                error_kind: None,
            },
            Err(e) => Self {
                http_request: None,
                lossy_reasons: Vec::new(),
                error: Some(e.to_string()),
                error_kind: Some(e.kind().to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_provider_has_an_encoder() {
        let converter = Converter::new();
        for kind in ProviderKind::ALL {
            assert_eq!(converter.encoder(kind).map(|e| e.kind()), Some(kind));
        }
    }

    #[test]
    fn test_from_config_rejects_invalid_settings() {
        let mut config = ConverterConfig::default();
        config.providers.anthropic = Some(crate::config::ProviderSettings {
            reasoning_effort: Some("high".to_string()),
            ..Default::default()
        });
        match Converter::from_config(&config) {
            Err(crate::config::ConfigError::Setting(e)) => {
                assert_eq!(e.field_path, "providers.anthropic.reasoning_effort")
            }
            Err(other) => panic!("expected a setting error, got {other:?}"),
            Ok(_) => panic!("expected a setting error"),
        }

        config.providers.anthropic = Some(crate::config::ProviderSettings {
            base_url: Some("not a url".to_string()),
            ..Default::default()
        });
        assert!(Converter::from_config(&config).is_err());
    }

    #[test]
    fn test_invalid_json_fails_whole_input() {
        let response = Converter::new().convert_json("{not json");
        assert!(!response.success);
        assert!(response.results.is_empty());
        assert!(response.error.unwrap().starts_with("Invalid JSON"));
    }

    #[test]
    fn test_missing_role_fails_whole_input() {
        let response = Converter::new().convert_value(serde_json::json!({"content": "hi"}));
        assert!(!response.success);
        assert!(response.error.unwrap().contains("role"));
    }
}
