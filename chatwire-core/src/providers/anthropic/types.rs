//! Anthropic Messages API types

use serde::Serialize;
use serde_json::Value;

/// Anthropic messages request
#[derive(Debug, Clone, Serialize)]
pub struct AnthropicRequest {
    pub model: String,

    /// Required by the API
    pub max_tokens: u32,

    pub messages: Vec<AnthropicMessage>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub system: Vec<AnthropicBlock>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<AnthropicTool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
}

/// Anthropic message: only `user` and `assistant` roles exist
#[derive(Debug, Clone, Serialize)]
pub struct AnthropicMessage {
    pub role: String,
    pub content: Vec<AnthropicBlock>,
}

/// Content block
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicBlock {
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        cache_control: Option<CacheControl>,
    },
    Image {
        source: ImageSource,
        #[serde(skip_serializing_if = "Option::is_none")]
        cache_control: Option<CacheControl>,
    },
    Thinking {
        thinking: String,
        signature: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        cache_control: Option<CacheControl>,
    },
    ToolResult {
        tool_use_id: String,
        content: Vec<AnthropicBlock>,
        #[serde(skip_serializing_if = "Option::is_none")]
        cache_control: Option<CacheControl>,
    },
}

impl AnthropicBlock {
    /// Text block without cache control
    pub fn text(text: impl Into<String>) -> Self {
        AnthropicBlock::Text {
            text: text.into(),
            cache_control: None,
        }
    }

    /// Mark the block as a cache breakpoint; thinking blocks cannot carry one
    pub fn set_cache_control(&mut self, control: CacheControl) -> bool {
        match self {
            AnthropicBlock::Text { cache_control, .. }
            | AnthropicBlock::Image { cache_control, .. }
            | AnthropicBlock::ToolUse { cache_control, .. }
            | AnthropicBlock::ToolResult { cache_control, .. } => {
                *cache_control = Some(control);
                true
            }
            AnthropicBlock::Thinking { .. } => false,
        }
    }
}

/// Image source
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageSource {
    Base64 { media_type: String, data: String },
    Url { url: String },
}

/// Prompt caching marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheControl {
    #[serde(rename = "type")]
    pub cache_type: String,
}

impl CacheControl {
    pub fn ephemeral() -> Self {
        Self {
            cache_type: "ephemeral".to_string(),
        }
    }
}

/// Anthropic tool definition
#[derive(Debug, Clone, Serialize)]
pub struct AnthropicTool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}
