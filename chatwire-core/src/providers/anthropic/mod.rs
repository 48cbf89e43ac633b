//! Anthropic Messages encoder
//!
//! Implements the encoder for Anthropic's Claude Messages API. Reasoning is
//! carried in signed `thinking` blocks, tool arguments travel as parsed
//! `input` objects, and a trailing assistant message acts as a prefill.

pub mod converter;
pub mod types;

pub use types::AnthropicRequest;

use crate::capabilities::{EncoderCapabilities, ModalitySupport, ReasoningSupport};
use crate::config::ProviderSettings;
use crate::http::{join_url, Headers};
use crate::protocol::NormalizedConversation;
use crate::providers::adapter::{Encoder, EncoderSettings, ProviderKind};
use crate::providers::error::ConvertResult;
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const API_VERSION: &str = "2023-06-01";

/// Encoder for `POST /v1/messages`
pub struct AnthropicEncoder {
    settings: EncoderSettings,
    capabilities: EncoderCapabilities,
}

impl AnthropicEncoder {
    pub fn new(settings: EncoderSettings) -> Self {
        let capabilities = EncoderCapabilities::builder()
            .reasoning(ReasoningSupport::SignedBlocks)
            .with_modalities(ModalitySupport::text_and_image())
            .partial_messages()
            .structured_tool_arguments()
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

impl Default for AnthropicEncoder {
    fn default() -> Self {
        Self::from_settings(None)
    }
}

impl Encoder for AnthropicEncoder {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn capabilities(&self) -> &EncoderCapabilities {
        &self.capabilities
    }

    fn settings(&self) -> &EncoderSettings {
        &self.settings
    }

    fn endpoint(&self) -> String {
        join_url(&self.settings.base_url, "v1/messages")
    }

    fn headers(&self) -> Headers {
        let mut headers = Headers::new()
            .with("content-type", "application/json")
            .with("anthropic-version", API_VERSION);
        if let Some(key) = self.settings.api_key() {
            headers.insert("x-api-key", key);
        }
        headers
    }

    fn encode_body(&self, conversation: &NormalizedConversation) -> ConvertResult<Value> {
        let request = converter::to_anthropic_request(conversation, &self.settings)?;
        Ok(serde_json::to_value(request)?)
    }
}
