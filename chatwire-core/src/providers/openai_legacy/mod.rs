//! OpenAI Chat Completions encoder
//!
//! This module provides the encoder for the legacy Chat Completions API,
//! translating the canonical protocol into OpenAI's message format. The same
//! types and converter back OpenAI-compatible vendors such as Kimi.

pub mod converter;
pub mod types;

pub use types::{OpenAIMessage, OpenAIRequest};

use crate::capabilities::{EncoderCapabilities, ModalitySupport, ReasoningSupport};
use crate::config::ProviderSettings;
use crate::http::{join_url, Headers};
use crate::protocol::NormalizedConversation;
use crate::providers::adapter::{Encoder, EncoderSettings, ProviderKind};
use crate::providers::error::ConvertResult;
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Encoder for `POST /chat/completions`
pub struct OpenAILegacyEncoder {
    settings: EncoderSettings,
    capabilities: EncoderCapabilities,
}

impl OpenAILegacyEncoder {
    /// Create an encoder from resolved settings
    ///
    /// Reasoning is only representable when a `reasoning_key` is configured;
    /// the key names the vendor field that carries `think` text.
    pub fn new(settings: EncoderSettings) -> Self {
        let reasoning = match &settings.reasoning_key {
            Some(key) => ReasoningSupport::VendorField(key.clone()),
            None => ReasoningSupport::Unsupported,
        };
        let capabilities = EncoderCapabilities::builder()
            .reasoning(reasoning)
            .with_modalities(ModalitySupport::text_and_image())
            .speaker_names()
            .media_ids()
            .build();

        Self {
            settings,
            capabilities,
        }
    }

    /// Create an encoder from optional configuration
    pub fn from_settings(settings: Option<&ProviderSettings>) -> Self {
        Self::new(EncoderSettings::resolve(
            settings,
            DEFAULT_BASE_URL,
            DEFAULT_MODEL,
        ))
    }
}

impl Default for OpenAILegacyEncoder {
    fn default() -> Self {
        Self::from_settings(None)
    }
}

impl Encoder for OpenAILegacyEncoder {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenaiLegacy
    }

    fn capabilities(&self) -> &EncoderCapabilities {
        &self.capabilities
    }

    fn settings(&self) -> &EncoderSettings {
        &self.settings
    }

    fn endpoint(&self) -> String {
        join_url(&self.settings.base_url, "chat/completions")
    }

    fn headers(&self) -> Headers {
        let mut headers = Headers::new().with("content-type", "application/json");
        if let Some(key) = self.settings.api_key() {
            headers.insert("authorization", format!("Bearer {}", key));
        }
        headers
    }

    fn encode_body(&self, conversation: &NormalizedConversation) -> ConvertResult<Value> {
        let request = converter::to_openai_request(
            self.kind(),
            conversation,
            &self.settings,
            self.settings.reasoning_key.as_deref(),
        )?;
        Ok(serde_json::to_value(request)?)
    }
}
