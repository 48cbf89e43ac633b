//! Kimi extensions on top of the Chat Completions format

use crate::protocol::{NormalizedConversation, ToolDefinition};
use crate::providers::adapter::EncoderSettings;
use crate::providers::error::ConvertResult;
use crate::providers::openai_legacy::converter::{to_openai_request, to_openai_tool};
use crate::providers::openai_legacy::types::{OpenAIFunction, OpenAIRequest, OpenAITool};
use crate::providers::ProviderKind;
use serde_json::Value;

/// Vendor message field carrying reasoning text
pub const REASONING_FIELD: &str = "reasoning_content";

/// Default completion budget
pub const DEFAULT_MAX_TOKENS: u32 = 32000;

/// Convert a checked conversation to a Kimi request
pub fn to_kimi_request(
    conversation: &NormalizedConversation,
    settings: &EncoderSettings,
) -> ConvertResult<OpenAIRequest> {
    let mut request = to_openai_request(
        ProviderKind::Kimi,
        conversation,
        settings,
        Some(REASONING_FIELD),
    )?;

    request.tools = conversation.tools.iter().map(to_kimi_tool).collect();
    request.max_tokens = Some(settings.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS));
    request.temperature = settings
        .temperature
        .or_else(|| default_temperature(&settings.model, settings.reasoning_effort.is_some()));

    let trailing_partial = conversation
        .messages
        .last()
        .map(|message| message.partial)
        .unwrap_or(false);
    if trailing_partial {
        if let Some(last) = request.messages.last_mut() {
            last.vendor.insert("partial".to_string(), Value::Bool(true));
        }
    }

    Ok(request)
}

/// Builtin tools are declared by a `$` name prefix and carry no schema
pub fn to_kimi_tool(tool: &ToolDefinition) -> OpenAITool {
    if tool.name.starts_with('$') {
        OpenAITool {
            tool_type: "builtin_function".to_string(),
            function: OpenAIFunction {
                name: tool.name.clone(),
                description: None,
                parameters: None,
            },
        }
    } else {
        to_openai_tool(tool)
    }
}

/// Temperature Moonshot recommends for a model family
pub fn default_temperature(model: &str, reasoning_enabled: bool) -> Option<f64> {
    if model.contains("thinking") || reasoning_enabled {
        Some(1.0)
    } else if model.starts_with("kimi-k2") {
        Some(0.6)
    } else {
        None
    }
}
