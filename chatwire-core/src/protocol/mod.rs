//! Protocol module for the canonical chat model
//!
//! This module defines the provider-agnostic message model and its
//! normalization. These structures are designed to be:
//! - Provider-agnostic
//! - Immutable during a conversion
//! - Type-safe and serializable

pub mod data_url;
pub mod error;
pub mod normalize;
pub mod types;

pub use data_url::DataUrl;
pub use error::{ValidationError, ValidationErrorKind};
pub use normalize::{
    normalize_conversation, normalize_message, IndexedToolCall, NormalizedConversation,
    NormalizedMessage, ToolCallIndex,
};
pub use types::{
    ContentPart, Conversation, FunctionBody, MediaUrl, Message, MessageContent, MessageRole,
    ToolCall, ToolDefinition, CONTENT_PART_KINDS,
};

// Re-export common traits for convenience
pub use types::{IntoMessage, MessageBuilder};
