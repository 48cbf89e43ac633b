//! Google GenAI encoder
//!
//! Targets the Gemini `generateContent` REST endpoint. Tool arguments travel
//! as parsed `args` objects. The API has no slot for replaying reasoning text,
//! so thinking parts are rejected by the capability check.

pub mod converter;
pub mod types;

pub use types::GenerateContentRequest;

use crate::capabilities::{EncoderCapabilities, ModalitySupport, ReasoningSupport};
use crate::config::ProviderSettings;
use crate::http::{join_url, Headers};
use crate::protocol::NormalizedConversation;
use crate::providers::adapter::{Encoder, EncoderSettings, ProviderKind};
use crate::providers::error::ConvertResult;
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Encoder for `POST /v1beta/models/{model}:generateContent`
pub struct GoogleGenaiEncoder {
    settings: EncoderSettings,
    capabilities: EncoderCapabilities,
}

impl GoogleGenaiEncoder {
    pub fn new(settings: EncoderSettings) -> Self {
        let capabilities = EncoderCapabilities::builder()
            .reasoning(ReasoningSupport::Unsupported)
            .with_modalities(ModalitySupport::text_image_audio())
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

impl Default for GoogleGenaiEncoder {
    fn default() -> Self {
        Self::from_settings(None)
    }
}

impl Encoder for GoogleGenaiEncoder {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GoogleGenai
    }

    fn capabilities(&self) -> &EncoderCapabilities {
        &self.capabilities
    }

    fn settings(&self) -> &EncoderSettings {
        &self.settings
    }

    fn endpoint(&self) -> String {
        join_url(
            &self.settings.base_url,
            &format!("v1beta/models/{}:generateContent", self.settings.model),
        )
    }

    fn headers(&self) -> Headers {
        let mut headers = Headers::new().with("content-type", "application/json");
        if let Some(key) = self.settings.api_key() {
            headers.insert("x-goog-api-key", key);
        }
        headers
    }

    fn encode_body(&self, conversation: &NormalizedConversation) -> ConvertResult<Value> {
        let request = converter::to_google_request(conversation, &self.settings)?;
        Ok(serde_json::to_value(request)?)
    }
}
