//! Encoder trait and provider identities
//!
//! Defines the core abstraction every provider encoder implements. Encoders
//! are stateless: all they hold is read-only settings and their capability
//! table, so one instance can serve any number of conversions.

use crate::capabilities::{check_conversation, EncoderCapabilities};
use crate::config::{ProviderSettings, SecretString};
use crate::http::{Headers, ProviderRequest};
use crate::protocol::NormalizedConversation;
use crate::providers::error::ConvertResult;
use crate::providers::transform::{EncodedRequest, LossyNotes};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Core trait that all provider encoders implement
pub trait Encoder: Send + Sync {
    /// Which provider this encoder targets
    fn kind(&self) -> ProviderKind;

    /// The provider's capability table
    fn capabilities(&self) -> &EncoderCapabilities;

    /// Resolved settings (defaults applied)
    fn settings(&self) -> &EncoderSettings;

    /// Absolute request URL
    fn endpoint(&self) -> String;

    /// Provider headers before configured extras are applied
    fn headers(&self) -> Headers;

    /// Build the provider body for an already checked conversation
    fn encode_body(&self, conversation: &NormalizedConversation) -> ConvertResult<Value>;

    /// Check the conversation against the capability table, then build the
    /// full request descriptor
    fn encode(&self, conversation: &NormalizedConversation) -> ConvertResult<EncodedRequest> {
        debug!(
            "Encoding {} message(s) for {}",
            conversation.messages.len(),
            self.kind()
        );

        let mut notes = LossyNotes::default();
        check_conversation(self.kind(), self.capabilities(), conversation, &mut notes)?;
        let body = self.encode_body(conversation)?;

        let mut headers = self.headers();
        for (name, value) in self.settings().extra_headers.iter() {
            headers.insert(name, value);
        }

        Ok(EncodedRequest {
            request: ProviderRequest::post(self.endpoint(), headers, body),
            lossy_reasons: notes.into_vec(),
        })
    }
}

/// Provider enumeration, ordered by wire name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Anthropic,
    GoogleGenai,
    Kimi,
    OpenaiLegacy,
    OpenaiResponses,
}

impl ProviderKind {
    /// Every provider, in result order
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::Anthropic,
        ProviderKind::GoogleGenai,
        ProviderKind::Kimi,
        ProviderKind::OpenaiLegacy,
        ProviderKind::OpenaiResponses,
    ];

    /// Wire name used as the result key
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::GoogleGenai => "google_genai",
            ProviderKind::Kimi => "kimi",
            ProviderKind::OpenaiLegacy => "openai_legacy",
            ProviderKind::OpenaiResponses => "openai_responses",
        }
    }

    /// Create an encoder for this provider from optional settings
    pub fn create_encoder(&self, settings: Option<&ProviderSettings>) -> Box<dyn Encoder> {
        use crate::providers::{
            AnthropicEncoder, GoogleGenaiEncoder, KimiEncoder, OpenAILegacyEncoder,
            OpenAIResponsesEncoder,
        };
        match self {
            ProviderKind::Anthropic => Box::new(AnthropicEncoder::from_settings(settings)),
            ProviderKind::GoogleGenai => Box::new(GoogleGenaiEncoder::from_settings(settings)),
            ProviderKind::Kimi => Box::new(KimiEncoder::from_settings(settings)),
            ProviderKind::OpenaiLegacy => Box::new(OpenAILegacyEncoder::from_settings(settings)),
            ProviderKind::OpenaiResponses => {
                Box::new(OpenAIResponsesEncoder::from_settings(settings))
            }
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings an encoder works with once defaults are applied
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<SecretString>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub extra_headers: Headers,
    pub reasoning_key: Option<String>,
    pub reasoning_effort: Option<String>,
    pub prompt_caching: bool,
}

impl EncoderSettings {
    /// Settings with only the provider defaults
    pub fn defaults(base_url: &str, model: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            model: model.to_string(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            extra_headers: Headers::new(),
            reasoning_key: None,
            reasoning_effort: None,
            prompt_caching: true,
        }
    }

    /// Overlay configured settings on the provider defaults
    pub fn resolve(settings: Option<&ProviderSettings>, base_url: &str, model: &str) -> Self {
        let mut resolved = Self::defaults(base_url, model);
        let Some(settings) = settings else {
            return resolved;
        };

        if let Some(base_url) = &settings.base_url {
            resolved.base_url = base_url.clone();
        }
        if let Some(model) = &settings.model {
            resolved.model = model.clone();
        }
        resolved.api_key = settings.api_key.clone().filter(|key| !key.is_empty());
        resolved.max_tokens = settings.max_tokens;
        resolved.temperature = settings.temperature;
        resolved.top_p = settings.top_p;
        resolved.extra_headers = settings.headers.iter().collect();
        resolved.reasoning_key = settings.reasoning_key.clone();
        resolved.reasoning_effort = settings.reasoning_effort.clone();
        if let Some(prompt_caching) = settings.prompt_caching {
            resolved.prompt_caching = prompt_caching;
        }
        resolved
    }

    /// Exposed API key, if any
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(SecretString::expose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_order_matches_names() {
        let mut names: Vec<&str> = ProviderKind::ALL.iter().map(|k| k.as_str()).collect();
        let sorted = {
            let mut sorted = names.clone();
            sorted.sort();
            sorted
        };
        assert_eq!(names, sorted);
        names.dedup();
        assert_eq!(names.len(), 5);
    }

    #[test]
    fn test_resolve_keeps_defaults_without_settings() {
        let settings = EncoderSettings::resolve(None, "https://api.example.com", "m-1");
        assert_eq!(settings.base_url, "https://api.example.com");
        assert_eq!(settings.model, "m-1");
        assert!(settings.api_key().is_none());
        assert!(settings.prompt_caching);
    }

    #[test]
    fn test_resolve_overlays_settings() {
        let config = ProviderSettings {
            model: Some("m-2".to_string()),
            api_key: Some(SecretString::new("sk-test")),
            prompt_caching: Some(false),
            ..Default::default()
        };
        let settings = EncoderSettings::resolve(Some(&config), "https://api.example.com", "m-1");
        assert_eq!(settings.model, "m-2");
        assert_eq!(settings.api_key(), Some("sk-test"));
        assert!(!settings.prompt_caching);
    }
}
