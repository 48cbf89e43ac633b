//! Conversion from the canonical model to the Responses `input` list
//!
//! A single canonical message can expand into several input items. Each run
//! of non-reasoning parts becomes one `message` item, each run of `think`
//! parts sharing the same signature becomes one `reasoning` item, and every
//! tool call becomes a trailing `function_call` item. Part order is kept.

use super::types::*;
use crate::protocol::{
    ContentPart, DataUrl, MediaUrl, MessageRole, NormalizedConversation, NormalizedMessage,
    ToolDefinition,
};
use crate::providers::adapter::EncoderSettings;
use crate::providers::error::{ConvertError, ConvertResult};
use crate::providers::ProviderKind;

const PROVIDER: ProviderKind = ProviderKind::OpenaiResponses;

/// Convert a checked conversation to a Responses request
pub fn to_responses_request(
    conversation: &NormalizedConversation,
    settings: &EncoderSettings,
) -> ConvertResult<ResponsesRequest> {
    let mut input = Vec::new();
    if let Some(prompt) = &conversation.system_prompt {
        input.push(InputItem::Message {
            role: "system".to_string(),
            content: vec![ContentItem::InputText {
                text: prompt.clone(),
            }],
        });
    }
    for message in &conversation.messages {
        input.extend(to_input_items(message)?);
    }

    let reasoning = settings
        .reasoning_effort
        .as_ref()
        .map(|effort| ReasoningConfig {
            effort: effort.clone(),
            summary: "auto".to_string(),
        });
    let include = if reasoning.is_some() {
        vec!["reasoning.encrypted_content".to_string()]
    } else {
        Vec::new()
    };

    Ok(ResponsesRequest {
        model: settings.model.clone(),
        input,
        tools: conversation.tools.iter().map(to_responses_tool).collect(),
        store: false,
        max_output_tokens: settings.max_tokens,
        temperature: settings.temperature,
        top_p: settings.top_p,
        reasoning,
        include,
    })
}

/// Expand one message into input items
pub fn to_input_items(message: &NormalizedMessage) -> ConvertResult<Vec<InputItem>> {
    if message.role == MessageRole::Tool {
        return Ok(vec![to_function_call_output(message)?]);
    }

    let mut items = Vec::new();
    let mut pending: Vec<&ContentPart> = Vec::new();
    let mut parts = message.parts.iter().peekable();

    while let Some(part) = parts.next() {
        let ContentPart::Think { think, encrypted } = part else {
            pending.push(part);
            continue;
        };

        flush_message(message.role, &mut pending, &mut items)?;
        let mut summary = vec![SummaryText::new(think.clone())];
        while let Some(ContentPart::Think {
            think: next_think,
            encrypted: next_encrypted,
        }) = parts.peek()
        {
            if next_encrypted != encrypted {
                break;
            }
            summary.push(SummaryText::new(next_think.clone()));
            parts.next();
        }
        items.push(InputItem::Reasoning {
            summary,
            encrypted_content: encrypted.clone(),
        });
    }
    flush_message(message.role, &mut pending, &mut items)?;

    if items.is_empty() && message.tool_calls.is_empty() {
        items.push(InputItem::Message {
            role: message.role.as_str().to_string(),
            content: Vec::new(),
        });
    }

    for call in &message.tool_calls {
        let arguments = call.function.arguments.clone().ok_or_else(|| {
            ConvertError::InternalEncoding(format!("tool call '{}' has no arguments", call.id))
        })?;
        items.push(InputItem::FunctionCall {
            arguments: if arguments.is_empty() {
                "{}".to_string()
            } else {
                arguments
            },
            call_id: call.id.clone(),
            name: call.function.name.clone(),
        });
    }

    Ok(items)
}

/// Emit pending non-reasoning parts as one message item; empty runs emit nothing
fn flush_message(
    role: MessageRole,
    pending: &mut Vec<&ContentPart>,
    items: &mut Vec<InputItem>,
) -> ConvertResult<()> {
    if pending.is_empty() {
        return Ok(());
    }

    let mut content = Vec::with_capacity(pending.len());
    for part in pending.drain(..) {
        let item = if role == MessageRole::Assistant {
            to_output_item(part)?
        } else {
            to_input_item(part)?
        };
        content.extend(item);
    }

    if !content.is_empty() {
        items.push(InputItem::Message {
            role: role.as_str().to_string(),
            content,
        });
    }
    Ok(())
}

fn to_output_item(part: &ContentPart) -> ConvertResult<Option<ContentItem>> {
    match part {
        ContentPart::Text { text } if text.is_empty() => Ok(None),
        ContentPart::Text { text } => Ok(Some(ContentItem::OutputText {
            text: text.clone(),
            annotations: Vec::new(),
        })),
        ContentPart::ImageUrl { .. } | ContentPart::AudioUrl { .. } => Err(
            ConvertError::unsupported(PROVIDER, format!("{} parts in assistant output", part.kind())),
        ),
        ContentPart::Think { .. } | ContentPart::Unknown { .. } => Err(unexpected(part)),
    }
}

fn to_input_item(part: &ContentPart) -> ConvertResult<Option<ContentItem>> {
    match part {
        ContentPart::Text { text } if text.is_empty() => Ok(None),
        ContentPart::Text { text } => Ok(Some(ContentItem::InputText { text: text.clone() })),
        ContentPart::ImageUrl { image_url } => Ok(Some(ContentItem::InputImage {
            detail: Some("auto".to_string()),
            image_url: image_url.url.clone(),
        })),
        ContentPart::AudioUrl { audio_url } => to_audio_item(audio_url).map(Some),
        ContentPart::Think { .. } | ContentPart::Unknown { .. } => Err(unexpected(part)),
    }
}

/// Inline mp3/wav becomes `input_audio`; remote audio becomes `input_file`
fn to_audio_item(media: &MediaUrl) -> ConvertResult<ContentItem> {
    if DataUrl::is_data_url(&media.url) {
        let data_url = DataUrl::parse(&media.url).map_err(ConvertError::InternalEncoding)?;
        let format = match data_url.mime_type.to_ascii_lowercase().as_str() {
            "audio/mp3" | "audio/mpeg" => "mp3",
            "audio/wav" => "wav",
            other => {
                return Err(ConvertError::unsupported(
                    PROVIDER,
                    format!("inline audio of type {}", other),
                ))
            }
        };
        return Ok(ContentItem::InputAudio {
            input_audio: InputAudio {
                data: data_url.data.to_string(),
                format: format.to_string(),
            },
        });
    }

    if is_remote(&media.url) {
        return Ok(ContentItem::InputFile {
            file_url: Some(media.url.clone()),
            file_data: None,
        });
    }

    Err(ConvertError::unsupported(
        PROVIDER,
        format!("audio URL scheme of '{}'", media.url),
    ))
}

fn is_remote(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Tool results: text-only output collapses to a string
fn to_function_call_output(message: &NormalizedMessage) -> ConvertResult<InputItem> {
    let call_id = message.tool_call_id.clone().ok_or_else(|| {
        ConvertError::InternalEncoding("tool message without tool_call_id".to_string())
    })?;

    if message.is_text_only() {
        return Ok(InputItem::FunctionCallOutput {
            call_id,
            output: FunctionOutput::Text(message.text()),
        });
    }

    let mut output = Vec::new();
    for part in &message.parts {
        match part {
            ContentPart::Text { text } if text.is_empty() => {}
            ContentPart::Text { text } => output.push(ContentItem::InputText { text: text.clone() }),
            ContentPart::ImageUrl { image_url } => output.push(ContentItem::InputImage {
                detail: None,
                image_url: image_url.url.clone(),
            }),
            ContentPart::AudioUrl { audio_url } if is_remote(&audio_url.url) => {
                output.push(ContentItem::InputFile {
                    file_url: Some(audio_url.url.clone()),
                    file_data: None,
                })
            }
            ContentPart::AudioUrl { audio_url } => {
                let data_url =
                    DataUrl::parse(&audio_url.url).map_err(ConvertError::InternalEncoding)?;
                output.push(ContentItem::InputFile {
                    file_url: None,
                    file_data: Some(data_url.data.to_string()),
                })
            }
            ContentPart::Think { .. } | ContentPart::Unknown { .. } => {
                return Err(unexpected(part))
            }
        }
    }

    Ok(InputItem::FunctionCallOutput {
        call_id,
        output: FunctionOutput::Items(output),
    })
}

fn unexpected(part: &ContentPart) -> ConvertError {
    ConvertError::InternalEncoding(format!(
        "'{}' part reached the message encoder",
        part.kind()
    ))
}

pub fn to_responses_tool(tool: &ToolDefinition) -> ResponsesTool {
    ResponsesTool {
        tool_type: "function".to_string(),
        name: tool.name.clone(),
        description: tool.description.clone(),
        parameters: tool.parameters.clone(),
        strict: false,
    }
}
