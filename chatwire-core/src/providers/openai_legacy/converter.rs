//! Conversion from the canonical model to the Chat Completions format

use super::types::*;
use crate::protocol::{
    ContentPart, MessageRole, NormalizedConversation, NormalizedMessage, ToolDefinition,
};
use crate::providers::adapter::EncoderSettings;
use crate::providers::error::{ConvertError, ConvertResult};
use crate::providers::ProviderKind;
use serde_json::Value;
use std::collections::BTreeMap;

/// Convert a checked conversation to an OpenAI-style request
///
/// `reasoning_field` names the vendor message field that carries `think`
/// text; without one, reasoning parts are not expected here.
pub fn to_openai_request(
    provider: ProviderKind,
    conversation: &NormalizedConversation,
    settings: &EncoderSettings,
    reasoning_field: Option<&str>,
) -> ConvertResult<OpenAIRequest> {
    let mut messages = Vec::with_capacity(conversation.messages.len() + 1);
    if let Some(system_prompt) = &conversation.system_prompt {
        messages.push(text_message("system", system_prompt.clone()));
    }
    for message in &conversation.messages {
        messages.push(to_openai_message(provider, message, reasoning_field)?);
    }

    Ok(OpenAIRequest {
        model: settings.model.clone(),
        messages,
        tools: conversation.tools.iter().map(to_openai_tool).collect(),
        max_tokens: settings.max_tokens,
        temperature: settings.temperature,
        top_p: settings.top_p,
        reasoning_effort: settings.reasoning_effort.clone(),
        vendor: BTreeMap::new(),
    })
}

fn text_message(role: &str, content: String) -> OpenAIMessage {
    OpenAIMessage {
        role: role.to_string(),
        content: OpenAIContent::Text(content),
        name: None,
        tool_calls: Vec::new(),
        tool_call_id: None,
        vendor: BTreeMap::new(),
    }
}

/// Convert a single message
pub fn to_openai_message(
    provider: ProviderKind,
    message: &NormalizedMessage,
    reasoning_field: Option<&str>,
) -> ConvertResult<OpenAIMessage> {
    let mut vendor = BTreeMap::new();
    let reasoning: Vec<&str> = message
        .parts
        .iter()
        .filter_map(|part| match part {
            ContentPart::Think { think, .. } => Some(think.as_str()),
            _ => None,
        })
        .collect();
    if !reasoning.is_empty() {
        let field = reasoning_field.ok_or_else(|| {
            ConvertError::InternalEncoding(format!("{} has no reasoning field", provider))
        })?;
        vendor.insert(field.to_string(), Value::String(reasoning.concat()));
    }

    let content = to_openai_content(provider, message)?;
    let tool_calls = message
        .tool_calls
        .iter()
        .map(|tc| {
            Ok(OpenAIToolCall {
                id: tc.id.clone(),
                tool_type: tc.tool_type.clone(),
                function: OpenAIFunctionCall {
                    name: tc.function.name.clone(),
                    arguments: tc.function.arguments.clone().ok_or_else(|| {
                        ConvertError::InternalEncoding(format!(
                            "tool call '{}' reached {} without arguments",
                            tc.id, provider
                        ))
                    })?,
                },
            })
        })
        .collect::<ConvertResult<Vec<_>>>()?;

    Ok(OpenAIMessage {
        role: message.role.as_str().to_string(),
        content,
        name: message.name.clone(),
        tool_calls,
        tool_call_id: message
            .tool_call_id
            .clone()
            .filter(|_| message.role == MessageRole::Tool),
        vendor,
    })
}

/// Convert message content; plain text collapses to a string
fn to_openai_content(
    provider: ProviderKind,
    message: &NormalizedMessage,
) -> ConvertResult<OpenAIContent> {
    let visible: Vec<&ContentPart> = message
        .parts
        .iter()
        .filter(|part| !matches!(part, ContentPart::Think { .. }))
        .collect();

    if visible
        .iter()
        .all(|part| matches!(part, ContentPart::Text { .. }))
    {
        let text = visible
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        return Ok(OpenAIContent::Text(text));
    }

    if message.role == MessageRole::Tool {
        return Err(ConvertError::unsupported(provider, "non-text tool results"));
    }

    let parts = visible
        .into_iter()
        .map(|part| match part {
            ContentPart::Text { text } => Ok(OpenAIContentPart::Text { text: text.clone() }),
            ContentPart::ImageUrl { image_url } => Ok(OpenAIContentPart::ImageUrl {
                image_url: OpenAIImageUrl {
                    url: image_url.url.clone(),
                    id: image_url.id.clone(),
                },
            }),
            other => Err(ConvertError::InternalEncoding(format!(
                "{} cannot encode '{}' content parts",
                provider,
                other.kind()
            ))),
        })
        .collect::<ConvertResult<Vec<_>>>()?;

    Ok(OpenAIContent::Parts(parts))
}

/// Convert a tool definition to the function tool format
pub fn to_openai_tool(tool: &ToolDefinition) -> OpenAITool {
    OpenAITool {
        tool_type: "function".to_string(),
        function: OpenAIFunction {
            name: tool.name.clone(),
            description: Some(tool.description.clone()),
            parameters: Some(tool.parameters.clone()),
        },
    }
}
