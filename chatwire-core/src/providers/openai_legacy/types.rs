//! OpenAI Chat Completions API types
//!
//! These types match the request side of the Chat Completions format. They are
//! shared with OpenAI-compatible vendors, which add their own fields through
//! [`OpenAIMessage::vendor`] and [`OpenAIRequest::vendor`].

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// OpenAI chat completion request
#[derive(Debug, Clone, Serialize)]
pub struct OpenAIRequest {
    pub model: String,
    pub messages: Vec<OpenAIMessage>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<OpenAITool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<String>,

    /// Vendor-specific top-level fields
    #[serde(flatten)]
    pub vendor: BTreeMap<String, Value>,
}

/// OpenAI message format
#[derive(Debug, Clone, Serialize)]
pub struct OpenAIMessage {
    pub role: String,

    pub content: OpenAIContent,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<OpenAIToolCall>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Vendor-specific message fields (reasoning text, partial flag)
    #[serde(flatten)]
    pub vendor: BTreeMap<String, Value>,
}

/// OpenAI content (can be string or array of parts)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OpenAIContent {
    Text(String),
    Parts(Vec<OpenAIContentPart>),
}

/// OpenAI content part for multimodal
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum OpenAIContentPart {
    #[serde(rename = "text")]
    Text { text: String },

    #[serde(rename = "image_url")]
    ImageUrl { image_url: OpenAIImageUrl },
}

/// OpenAI image URL format
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenAIImageUrl {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// OpenAI function call
#[derive(Debug, Clone, Serialize)]
pub struct OpenAIFunctionCall {
    pub name: String,
    pub arguments: String,
}

/// OpenAI tool call
#[derive(Debug, Clone, Serialize)]
pub struct OpenAIToolCall {
    pub id: String,

    #[serde(rename = "type")]
    pub tool_type: String,

    pub function: OpenAIFunctionCall,
}

/// OpenAI tool definition
#[derive(Debug, Clone, Serialize)]
pub struct OpenAITool {
    #[serde(rename = "type")]
    pub tool_type: String,

    pub function: OpenAIFunction,
}

/// OpenAI function definition
#[derive(Debug, Clone, Serialize)]
pub struct OpenAIFunction {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}
