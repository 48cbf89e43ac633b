//! Shared validation step run by every encoder
//!
//! Structural checks come first (tool linkage, partial placement), then the
//! provider's capability table is applied part by part. The first violation
//! wins; documented omissions are recorded as lossy notes instead.

use super::{EncoderCapabilities, Modality, ReasoningSupport};
use crate::protocol::{
    ContentPart, MessageRole, NormalizedConversation, NormalizedMessage, ValidationError,
    ValidationErrorKind,
};
use crate::providers::error::ConvertError;
use crate::providers::transform::{LossinessReason, LossyNotes};
use crate::providers::ProviderKind;
use serde_json::Value;

/// Validate a conversation against one provider's capabilities
pub fn check_conversation(
    provider: ProviderKind,
    caps: &EncoderCapabilities,
    conversation: &NormalizedConversation,
    notes: &mut LossyNotes,
) -> Result<(), ConvertError> {
    let last = conversation.last_index();
    for (i, message) in conversation.messages.iter().enumerate() {
        let path = format!("messages[{}]", i);
        check_structure(conversation, i, message, &path)?;
        check_partial(provider, caps, message, Some(i) == last, &path)?;
        check_parts(provider, caps, message, &path, notes)?;
        if caps.structured_tool_arguments {
            check_structured_arguments(message, &path)?;
        }
        if message.name.is_some() && !caps.speaker_names {
            notes.record(format!("{}.name", path), LossinessReason::SpeakerNameDropped);
        }
    }
    Ok(())
}

fn check_structure(
    conversation: &NormalizedConversation,
    index: usize,
    message: &NormalizedMessage,
    path: &str,
) -> Result<(), ValidationError> {
    if message.role == MessageRole::Tool {
        let id = message
            .tool_call_id
            .as_deref()
            .ok_or_else(|| ValidationError::required(format!("{}.tool_call_id", path)))?;
        if conversation.tool_calls.resolve_before(id, index).is_none() {
            return Err(ValidationError::new(
                format!("{}.tool_call_id", path),
                ValidationErrorKind::DanglingToolResult { id: id.to_string() },
            ));
        }
    }

    if !message.tool_calls.is_empty() && message.role != MessageRole::Assistant {
        return Err(ValidationError::misplaced(
            format!("{}.tool_calls", path),
            format!("tool calls on a {} message", message.role.as_str()),
        ));
    }

    Ok(())
}

fn check_partial(
    provider: ProviderKind,
    caps: &EncoderCapabilities,
    message: &NormalizedMessage,
    is_last: bool,
    path: &str,
) -> Result<(), ConvertError> {
    if message.partial {
        if !caps.partial_messages {
            return Err(ConvertError::unsupported(provider, "partial messages"));
        }
        if !is_last || message.role != MessageRole::Assistant {
            return Err(ValidationError::new(
                format!("{}.partial", path),
                ValidationErrorKind::MisplacedPartial,
            )
            .into());
        }
    }

    for (j, call) in message.tool_calls.iter().enumerate() {
        if call.function.arguments.is_none() {
            if !message.partial {
                return Err(ValidationError::new(
                    format!("{}.tool_calls[{}].function.arguments", path, j),
                    ValidationErrorKind::NullArguments,
                )
                .into());
            }
            if !caps.partial_tool_calls {
                return Err(ConvertError::unsupported(
                    provider,
                    "partial tool calls with null arguments",
                ));
            }
        }
    }

    Ok(())
}

fn check_parts(
    provider: ProviderKind,
    caps: &EncoderCapabilities,
    message: &NormalizedMessage,
    path: &str,
    notes: &mut LossyNotes,
) -> Result<(), ConvertError> {
    for (k, part) in message.parts.iter().enumerate() {
        match part {
            ContentPart::Text { .. } => {}
            ContentPart::Think { encrypted, .. } => {
                if message.role != MessageRole::Assistant {
                    return Err(ConvertError::unsupported(
                        provider,
                        format!("reasoning content on {} messages", message.role.as_str()),
                    ));
                }
                match &caps.reasoning {
                    ReasoningSupport::Unsupported => {
                        return Err(ConvertError::unsupported(provider, "reasoning content"));
                    }
                    ReasoningSupport::VendorField(_) if encrypted.is_some() => {
                        return Err(ConvertError::unsupported(
                            provider,
                            "encrypted reasoning signatures",
                        ));
                    }
                    ReasoningSupport::SignedBlocks if encrypted.is_none() => {
                        notes.record(
                            format!("{}.content[{}]", path, k),
                            LossinessReason::UnsignedReasoningOmitted,
                        );
                    }
                    _ => {}
                }
            }
            ContentPart::ImageUrl { image_url: media } | ContentPart::AudioUrl { audio_url: media } => {
                let modality = if matches!(part, ContentPart::ImageUrl { .. }) {
                    Modality::Image
                } else {
                    Modality::Audio
                };
                if !caps.modalities.supports_input(modality) {
                    return Err(ConvertError::unsupported(
                        provider,
                        format!("{} input", modality.as_str()),
                    ));
                }
                if media.id.is_some() && !caps.media_ids {
                    notes.record(
                        format!("{}.content[{}].{}.id", path, k, part.kind()),
                        LossinessReason::MediaIdDropped,
                    );
                }
            }
            ContentPart::Unknown { kind } => {
                return Err(ConvertError::InternalEncoding(format!(
                    "unnormalized content part '{}' at {}.content[{}]",
                    kind, path, k
                )));
            }
        }
    }
    Ok(())
}

fn check_structured_arguments(message: &NormalizedMessage, path: &str) -> Result<(), ValidationError> {
    for (j, call) in message.tool_calls.iter().enumerate() {
        let Some(arguments) = call.function.arguments.as_deref() else {
            continue;
        };
        if arguments.trim().is_empty() {
            continue;
        }
        let field = format!("{}.tool_calls[{}].function.arguments", path, j);
        match serde_json::from_str::<Value>(arguments) {
            Ok(Value::Object(_)) => {}
            Ok(_) => {
                return Err(ValidationError::invalid_arguments(field, "expected a JSON object"))
            }
            Err(e) => return Err(ValidationError::invalid_arguments(field, e.to_string())),
        }
    }
    Ok(())
}
