//! Chatwire Core Library
//!
//! Converts one canonical chat conversation into the HTTP requests expected by
//! Anthropic, OpenAI Chat Completions, OpenAI Responses, Google GenAI and Kimi.
//! Nothing here performs network I/O: every encoder returns a request
//! descriptor that a transport layer can send.

pub mod capabilities;
pub mod config;
pub mod convert;
pub mod http;
pub mod protocol;
pub mod providers;

pub use convert::{ConversionResults, ConvertResponse, Converter, ProviderResult};
pub use http::{Headers, HttpMethod, ProviderRequest};
pub use protocol::{ContentPart, Conversation, Message, MessageRole, ToolCall, ToolDefinition};
pub use providers::{ConvertError, EncodedRequest, Encoder, ProviderKind};

/// Returns the version of the Chatwire Core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
