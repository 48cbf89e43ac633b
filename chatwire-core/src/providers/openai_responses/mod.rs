//! OpenAI Responses encoder
//!
//! The Responses API models a conversation as a flat list of typed items.
//! Reasoning is native (`reasoning` items with optional encrypted content),
//! and images and audio are accepted as input content.

pub mod converter;
pub mod types;

pub use types::ResponsesRequest;

use crate::capabilities::{EncoderCapabilities, ModalitySupport, ReasoningSupport};
use crate::config::ProviderSettings;
use crate::http::{join_url, Headers};
use crate::protocol::NormalizedConversation;
use crate::providers::adapter::{Encoder, EncoderSettings, ProviderKind};
use crate::providers::error::ConvertResult;
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4.1";

/// Encoder for `POST /responses`
pub struct OpenAIResponsesEncoder {
    settings: EncoderSettings,
    capabilities: EncoderCapabilities,
}

impl OpenAIResponsesEncoder {
    pub fn new(settings: EncoderSettings) -> Self {
        let capabilities = EncoderCapabilities::builder()
            .reasoning(ReasoningSupport::Native)
            .with_modalities(ModalitySupport::text_image_audio())
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

impl Default for OpenAIResponsesEncoder {
    fn default() -> Self {
        Self::from_settings(None)
    }
}

impl Encoder for OpenAIResponsesEncoder {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenaiResponses
    }

    fn capabilities(&self) -> &EncoderCapabilities {
        &self.capabilities
    }

    fn settings(&self) -> &EncoderSettings {
        &self.settings
    }

    fn endpoint(&self) -> String {
        join_url(&self.settings.base_url, "responses")
    }

    fn headers(&self) -> Headers {
        let mut headers = Headers::new().with("content-type", "application/json");
        if let Some(key) = self.settings.api_key() {
            headers.insert("authorization", format!("Bearer {}", key));
        }
        headers
    }

    fn encode_body(&self, conversation: &NormalizedConversation) -> ConvertResult<Value> {
        let request = converter::to_responses_request(conversation, &self.settings)?;
        Ok(serde_json::to_value(request)?)
    }
}
