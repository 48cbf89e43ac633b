//! Conversion from the canonical model to the Google GenAI format
//!
//! Gemini knows two roles, `user` and `model`. Leading system content goes to
//! `systemInstruction`, later system messages become `<system>`-wrapped user
//! turns in place, tool results become `functionResponse` parts inside
//! user turns, and media is sent either inline or as a file reference.

use super::types::*;
use crate::protocol::{
    ContentPart, DataUrl, MediaUrl, MessageRole, NormalizedConversation, NormalizedMessage,
    ToolCall, ToolDefinition,
};
use crate::providers::adapter::EncoderSettings;
use crate::providers::error::{ConvertError, ConvertResult};
use crate::providers::ProviderKind;
use serde_json::{json, Map, Value};

/// Inline image types the API accepts
const INLINE_IMAGE_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/gif", "image/webp"];

/// Tool call extra carrying a Gemini thought signature
pub const THOUGHT_SIGNATURE_KEY: &str = "thought_signature";

/// Convert a checked conversation to a generateContent request
pub fn to_google_request(
    conversation: &NormalizedConversation,
    settings: &EncoderSettings,
) -> ConvertResult<GenerateContentRequest> {
    let mut system_parts = Vec::new();
    if let Some(prompt) = &conversation.system_prompt {
        system_parts.push(GooglePart::text(prompt.clone()));
    }

    // Only the leading run of system messages becomes the instruction; later
    // ones stay where they are in the history.
    let leading_system = conversation
        .messages
        .iter()
        .take_while(|message| message.role == MessageRole::System)
        .count();

    let mut contents: Vec<GoogleContent> = Vec::new();
    let mut collecting_tool_results = false;

    for (i, message) in conversation.messages.iter().enumerate() {
        match message.role {
            MessageRole::System => {
                if !message.is_text_only() {
                    return Err(ConvertError::unsupported(
                        ProviderKind::GoogleGenai,
                        "non-text system messages",
                    ));
                }
                if i < leading_system {
                    system_parts.push(GooglePart::text(message.text()));
                } else {
                    contents.push(GoogleContent {
                        role: "user".to_string(),
                        parts: vec![GooglePart::text(format!("<system>{}</system>", message.text()))],
                    });
                    collecting_tool_results = false;
                }
            }
            MessageRole::Tool => {
                let part = to_function_response(conversation, message)?;
                match contents.last_mut() {
                    Some(last) if collecting_tool_results => last.parts.push(part),
                    _ => contents.push(GoogleContent {
                        role: "user".to_string(),
                        parts: vec![part],
                    }),
                }
                collecting_tool_results = true;
            }
            MessageRole::User | MessageRole::Assistant => {
                let mut parts = to_parts(message)?;
                for call in &message.tool_calls {
                    parts.push(to_function_call(call)?);
                }
                let role = if message.role == MessageRole::Assistant {
                    "model"
                } else {
                    "user"
                };
                contents.push(GoogleContent {
                    role: role.to_string(),
                    parts,
                });
                collecting_tool_results = false;
            }
        }
    }

    let system_instruction = (!system_parts.is_empty()).then(|| GoogleContent {
        role: "user".to_string(),
        parts: system_parts,
    });

    let tools = if conversation.tools.is_empty() {
        Vec::new()
    } else {
        vec![GoogleTool {
            function_declarations: conversation.tools.iter().map(to_function_declaration).collect(),
        }]
    };

    let generation_config = GenerationConfig {
        max_output_tokens: settings.max_tokens,
        temperature: settings.temperature,
        top_p: settings.top_p,
        thinking_config: settings
            .reasoning_effort
            .as_deref()
            .map(thinking_config)
            .transpose()?,
    };

    Ok(GenerateContentRequest {
        contents,
        system_instruction,
        tools,
        generation_config: (!generation_config.is_empty()).then_some(generation_config),
    })
}

/// Map a reasoning effort level to a thinking budget
pub fn thinking_config(effort: &str) -> ConvertResult<ThinkingConfig> {
    let thinking_budget = match effort {
        "off" => 0,
        "low" => 1024,
        "medium" => 4096,
        "high" => 32000,
        other => {
            return Err(ConvertError::unsupported(
                ProviderKind::GoogleGenai,
                format!("reasoning effort '{}'", other),
            ))
        }
    };
    Ok(ThinkingConfig {
        thinking_budget,
        include_thoughts: thinking_budget > 0,
    })
}

fn to_parts(message: &NormalizedMessage) -> ConvertResult<Vec<GooglePart>> {
    let mut parts = Vec::with_capacity(message.parts.len());
    for part in &message.parts {
        let converted = match part {
            ContentPart::Text { text } => GooglePart::text(text.clone()),
            ContentPart::ImageUrl { image_url } => to_media_part(image_url, MediaKind::Image)?,
            ContentPart::AudioUrl { audio_url } => to_media_part(audio_url, MediaKind::Audio)?,
            ContentPart::Think { .. } | ContentPart::Unknown { .. } => {
                return Err(ConvertError::InternalEncoding(format!(
                    "google_genai cannot encode '{}' content parts",
                    part.kind()
                )))
            }
        };
        parts.push(converted);
    }
    Ok(parts)
}

#[derive(Clone, Copy)]
enum MediaKind {
    Image,
    Audio,
}

impl MediaKind {
    fn prefix(self) -> &'static str {
        match self {
            MediaKind::Image => "image/",
            MediaKind::Audio => "audio/",
        }
    }

    fn fallback_mime(self) -> &'static str {
        match self {
            MediaKind::Image => "image/png",
            MediaKind::Audio => "audio/mpeg",
        }
    }
}

fn to_media_part(media: &MediaUrl, kind: MediaKind) -> ConvertResult<GooglePart> {
    if DataUrl::is_data_url(&media.url) {
        let data_url = DataUrl::parse(&media.url).map_err(ConvertError::InternalEncoding)?;
        let accepted = match kind {
            MediaKind::Image => INLINE_IMAGE_TYPES.contains(&data_url.mime_type),
            MediaKind::Audio => data_url.mime_type.starts_with(kind.prefix()),
        };
        if !accepted {
            return Err(ConvertError::unsupported(
                ProviderKind::GoogleGenai,
                format!("inline media of type {}", data_url.mime_type),
            ));
        }
        return Ok(GooglePart {
            inline_data: Some(Blob {
                mime_type: data_url.mime_type.to_string(),
                data: data_url.data.to_string(),
            }),
            ..Default::default()
        });
    }

    Ok(GooglePart {
        file_data: Some(FileData {
            mime_type: guess_mime_type(&media.url, kind),
            file_uri: media.url.clone(),
        }),
        ..Default::default()
    })
}

/// Guess a MIME type from the URL path, falling back per media kind
fn guess_mime_type(uri: &str, kind: MediaKind) -> String {
    let path = url::Url::parse(uri)
        .map(|parsed| parsed.path().to_string())
        .unwrap_or_else(|_| uri.to_string());
    mime_guess::from_path(path)
        .first_raw()
        .filter(|mime| mime.starts_with(kind.prefix()))
        .unwrap_or(kind.fallback_mime())
        .to_string()
}

fn to_function_call(call: &ToolCall) -> ConvertResult<GooglePart> {
    let arguments = call.function.arguments.as_deref().ok_or_else(|| {
        ConvertError::InternalEncoding(format!("tool call '{}' has no arguments", call.id))
    })?;
    let args = if arguments.trim().is_empty() {
        Map::new()
    } else {
        match serde_json::from_str::<Value>(arguments)? {
            Value::Object(map) => map,
            _ => {
                return Err(ConvertError::InternalEncoding(format!(
                    "tool call '{}' arguments are not an object",
                    call.id
                )))
            }
        }
    };

    Ok(GooglePart {
        function_call: Some(FunctionCall {
            id: call.id.clone(),
            name: call.function.name.clone(),
            args,
        }),
        thought_signature: call
            .extra(THOUGHT_SIGNATURE_KEY)
            .and_then(Value::as_str)
            .map(str::to_string),
        ..Default::default()
    })
}

/// Function responses carry the name of the call they answer
fn to_function_response(
    conversation: &NormalizedConversation,
    message: &NormalizedMessage,
) -> ConvertResult<GooglePart> {
    let id = message.tool_call_id.clone().ok_or_else(|| {
        ConvertError::InternalEncoding("tool message without tool_call_id".to_string())
    })?;
    let name = conversation
        .tool_calls
        .get(&id)
        .map(|indexed| indexed.call.function.name.clone())
        .ok_or_else(|| ConvertError::InternalEncoding(format!("unresolved tool call '{}'", id)))?;

    if !message.is_text_only() {
        return Err(ConvertError::unsupported(
            ProviderKind::GoogleGenai,
            "non-text tool results",
        ));
    }

    Ok(GooglePart {
        function_response: Some(FunctionResponse {
            id,
            name,
            response: json!({ "output": message.text() }),
        }),
        ..Default::default()
    })
}

pub fn to_function_declaration(tool: &ToolDefinition) -> FunctionDeclaration {
    FunctionDeclaration {
        name: tool.name.clone(),
        description: tool.description.clone(),
        parameters: tool.parameters.clone(),
    }
}
