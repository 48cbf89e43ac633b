//! Conversion from the canonical model to the Anthropic Messages format
//!
//! Anthropic has no system or tool roles. System messages become user turns
//! wrapped in `<system>` tags, and tool results become `tool_result` blocks
//! inside user turns, with consecutive results sharing one turn.

use super::types::*;
use crate::protocol::{
    ContentPart, DataUrl, MediaUrl, MessageRole, NormalizedConversation, NormalizedMessage,
    ToolCall, ToolDefinition,
};
use crate::providers::adapter::EncoderSettings;
use crate::providers::error::{ConvertError, ConvertResult};
use crate::providers::ProviderKind;
use serde_json::{Map, Value};

/// Default completion budget; the API requires one
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Inline image types the API accepts
const INLINE_IMAGE_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/gif", "image/webp"];

/// Convert a checked conversation to an Anthropic request
pub fn to_anthropic_request(
    conversation: &NormalizedConversation,
    settings: &EncoderSettings,
) -> ConvertResult<AnthropicRequest> {
    let mut messages: Vec<AnthropicMessage> = Vec::new();
    let mut collecting_tool_results = false;

    for message in &conversation.messages {
        match message.role {
            MessageRole::Tool => {
                let block = to_tool_result_block(message)?;
                match messages.last_mut() {
                    Some(last) if collecting_tool_results => last.content.push(block),
                    _ => messages.push(AnthropicMessage {
                        role: "user".to_string(),
                        content: vec![block],
                    }),
                }
                collecting_tool_results = true;
            }
            MessageRole::System => {
                messages.push(AnthropicMessage {
                    role: "user".to_string(),
                    content: to_blocks(message, true)?,
                });
                collecting_tool_results = false;
            }
            MessageRole::User | MessageRole::Assistant => {
                let mut content = to_blocks(message, false)?;
                for call in &message.tool_calls {
                    content.push(to_tool_use_block(call)?);
                }
                messages.push(AnthropicMessage {
                    role: message.role.as_str().to_string(),
                    content,
                });
                collecting_tool_results = false;
            }
        }
    }

    let mut system = Vec::new();
    if let Some(prompt) = &conversation.system_prompt {
        system.push(AnthropicBlock::text(prompt.clone()));
    }

    if settings.prompt_caching {
        if let Some(block) = system.last_mut() {
            block.set_cache_control(CacheControl::ephemeral());
        }
        if let Some(block) = messages.last_mut().and_then(|m| m.content.last_mut()) {
            block.set_cache_control(CacheControl::ephemeral());
        }
    }

    Ok(AnthropicRequest {
        model: settings.model.clone(),
        max_tokens: settings.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        messages,
        system,
        tools: conversation.tools.iter().map(to_anthropic_tool).collect(),
        temperature: settings.temperature,
        top_p: settings.top_p,
    })
}

/// Convert message parts to blocks; unsigned thinking and empty text are
/// skipped since the API rejects empty text blocks
fn to_blocks(message: &NormalizedMessage, wrap_system: bool) -> ConvertResult<Vec<AnthropicBlock>> {
    let mut blocks = Vec::with_capacity(message.parts.len());
    for part in &message.parts {
        match part {
            ContentPart::Text { text } if text.is_empty() => {}
            ContentPart::Text { text } if wrap_system => {
                blocks.push(AnthropicBlock::text(format!("<system>{}</system>", text)))
            }
            ContentPart::Text { text } => blocks.push(AnthropicBlock::text(text.clone())),
            ContentPart::ImageUrl { image_url } => blocks.push(to_image_block(image_url)?),
            ContentPart::Think {
                think,
                encrypted: Some(signature),
            } => blocks.push(AnthropicBlock::Thinking {
                thinking: think.clone(),
                signature: signature.clone(),
            }),
            ContentPart::Think { encrypted: None, .. } => {}
            ContentPart::AudioUrl { .. } | ContentPart::Unknown { .. } => {
                return Err(ConvertError::InternalEncoding(format!(
                    "anthropic cannot encode '{}' content parts",
                    part.kind()
                )))
            }
        }
    }
    Ok(blocks)
}

/// Data URLs become base64 sources; anything else is fetched by URL
fn to_image_block(media: &MediaUrl) -> ConvertResult<AnthropicBlock> {
    let source = if DataUrl::is_data_url(&media.url) {
        let data_url = DataUrl::parse(&media.url).map_err(ConvertError::InternalEncoding)?;
        if !INLINE_IMAGE_TYPES.contains(&data_url.mime_type) {
            return Err(ConvertError::unsupported(
                ProviderKind::Anthropic,
                format!("inline images of type {}", data_url.mime_type),
            ));
        }
        ImageSource::Base64 {
            media_type: data_url.mime_type.to_string(),
            data: data_url.data.to_string(),
        }
    } else {
        ImageSource::Url {
            url: media.url.clone(),
        }
    };

    Ok(AnthropicBlock::Image {
        source,
        cache_control: None,
    })
}

fn to_tool_use_block(call: &ToolCall) -> ConvertResult<AnthropicBlock> {
    let arguments = call.function.arguments.as_deref().ok_or_else(|| {
        ConvertError::InternalEncoding(format!("tool call '{}' has no arguments", call.id))
    })?;
    let input = if arguments.trim().is_empty() {
        Value::Object(Map::new())
    } else {
        match serde_json::from_str::<Value>(arguments)? {
            object @ Value::Object(_) => object,
            _ => {
                return Err(ConvertError::InternalEncoding(format!(
                    "tool call '{}' arguments are not an object",
                    call.id
                )))
            }
        }
    };

    Ok(AnthropicBlock::ToolUse {
        id: call.id.clone(),
        name: call.function.name.clone(),
        input,
        cache_control: None,
    })
}

/// Tool results may only hold text and images; empty text is dropped
fn to_tool_result_block(message: &NormalizedMessage) -> ConvertResult<AnthropicBlock> {
    let tool_use_id = message.tool_call_id.clone().ok_or_else(|| {
        ConvertError::InternalEncoding("tool message without tool_call_id".to_string())
    })?;

    let mut content = Vec::new();
    for part in &message.parts {
        match part {
            ContentPart::Text { text } if text.is_empty() => {}
            ContentPart::Text { text } => content.push(AnthropicBlock::text(text.clone())),
            ContentPart::ImageUrl { image_url } => content.push(to_image_block(image_url)?),
            other => {
                return Err(ConvertError::unsupported(
                    ProviderKind::Anthropic,
                    format!("'{}' parts in tool results", other.kind()),
                ))
            }
        }
    }

    Ok(AnthropicBlock::ToolResult {
        tool_use_id,
        content,
        cache_control: None,
    })
}

pub fn to_anthropic_tool(tool: &ToolDefinition) -> AnthropicTool {
    AnthropicTool {
        name: tool.name.clone(),
        description: tool.description.clone(),
        input_schema: tool.parameters.clone(),
    }
}
