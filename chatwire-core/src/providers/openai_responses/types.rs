//! OpenAI Responses API types

use serde::Serialize;
use serde_json::Value;

/// Responses API request
#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest {
    pub model: String,
    pub input: Vec<InputItem>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ResponsesTool>,

    /// Requests are never persisted server-side
    pub store: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ReasoningConfig>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
}

/// One entry of the `input` list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputItem {
    Message {
        role: String,
        content: Vec<ContentItem>,
    },
    Reasoning {
        summary: Vec<SummaryText>,
        #[serde(skip_serializing_if = "Option::is_none")]
        encrypted_content: Option<String>,
    },
    FunctionCall {
        arguments: String,
        call_id: String,
        name: String,
    },
    FunctionCallOutput {
        call_id: String,
        output: FunctionOutput,
    },
}

/// Message content item
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    InputText {
        text: String,
    },
    InputImage {
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
        image_url: String,
    },
    InputAudio {
        input_audio: InputAudio,
    },
    InputFile {
        #[serde(skip_serializing_if = "Option::is_none")]
        file_url: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        file_data: Option<String>,
    },
    OutputText {
        text: String,
        annotations: Vec<Value>,
    },
}

/// Inline audio payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputAudio {
    pub data: String,
    pub format: String,
}

/// Reasoning summary entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryText {
    #[serde(rename = "type")]
    pub summary_type: String,
    pub text: String,
}

impl SummaryText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            summary_type: "summary_text".to_string(),
            text: text.into(),
        }
    }
}

/// Function call output: plain text or content items
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FunctionOutput {
    Text(String),
    Items(Vec<ContentItem>),
}

/// Reasoning request options
#[derive(Debug, Clone, Serialize)]
pub struct ReasoningConfig {
    pub effort: String,
    pub summary: String,
}

/// Responses function tool
#[derive(Debug, Clone, Serialize)]
pub struct ResponsesTool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub name: String,
    pub description: String,
    pub parameters: Value,
    pub strict: bool,
}
