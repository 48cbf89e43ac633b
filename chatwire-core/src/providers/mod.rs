//! Provider encoders
//!
//! Each submodule turns a checked [`NormalizedConversation`] into one
//! provider's HTTP request. The shared pieces live here:
//! - [`Encoder`]: the trait every provider implements
//! - [`ConvertError`]: the per-provider failure type
//! - [`EncodedRequest`]: a request plus its lossy notes
//!
//! [`NormalizedConversation`]: crate::protocol::NormalizedConversation

pub mod adapter;
pub mod error;
pub mod transform;

pub mod anthropic;
pub mod google_genai;
pub mod kimi;
pub mod openai_legacy;
pub mod openai_responses;

pub use adapter::{Encoder, EncoderSettings, ProviderKind};
pub use error::{ConvertError, ConvertResult};
pub use transform::{EncodedRequest, LossinessReason, LossyNotes};

// Re-export concrete encoders
pub use anthropic::AnthropicEncoder;
pub use google_genai::GoogleGenaiEncoder;
pub use kimi::KimiEncoder;
pub use openai_legacy::OpenAILegacyEncoder;
pub use openai_responses::OpenAIResponsesEncoder;
