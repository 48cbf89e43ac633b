//! Kimi (Moonshot) encoder
//!
//! Kimi speaks the Chat Completions format with a few vendor extensions:
//! reasoning text in `reasoning_content`, assistant prefill through
//! `partial: true`, and `$`-prefixed builtin tools.

pub mod converter;

use crate::capabilities::{EncoderCapabilities, ModalitySupport, ReasoningSupport};
use crate::config::ProviderSettings;
use crate::http::{join_url, Headers};
use crate::protocol::NormalizedConversation;
use crate::providers::adapter::{Encoder, EncoderSettings, ProviderKind};
use crate::providers::error::ConvertResult;
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "https://api.moonshot.ai/v1";
pub const DEFAULT_MODEL: &str = "kimi-k2-turbo-preview";

/// Encoder for Moonshot's `POST /chat/completions`
pub struct KimiEncoder {
    settings: EncoderSettings,
    capabilities: EncoderCapabilities,
}

impl KimiEncoder {
    pub fn new(settings: EncoderSettings) -> Self {
        let capabilities = EncoderCapabilities::builder()
            .reasoning(ReasoningSupport::VendorField(
                converter::REASONING_FIELD.to_string(),
            ))
            .with_modalities(ModalitySupport::text_and_image())
            .partial_messages()
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

impl Default for KimiEncoder {
    fn default() -> Self {
        Self::from_settings(None)
    }
}

impl Encoder for KimiEncoder {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Kimi
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
        let request = converter::to_kimi_request(conversation, &self.settings)?;
        Ok(serde_json::to_value(request)?)
    }
}
