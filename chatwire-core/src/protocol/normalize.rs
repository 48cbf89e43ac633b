//! Content normalization
//!
//! Turns the caller-facing [`Message`] shape into a uniform, ordered list of
//! typed parts and builds the tool-call lookup every encoder resolves
//! `tool_call_id` through. Normalization is the last point where an input can
//! fail as a whole; everything after it fails per provider.

use super::data_url::DataUrl;
use super::error::{ValidationError, ValidationErrorKind};
use super::types::{
    ContentPart, Conversation, Message, MessageContent, MessageRole, ToolCall, ToolDefinition,
};
use std::collections::BTreeMap;

/// A message with its content flattened to typed parts
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMessage {
    pub role: MessageRole,
    pub name: Option<String>,
    pub parts: Vec<ContentPart>,
    pub tool_calls: Vec<ToolCall>,
    pub tool_call_id: Option<String>,
    pub partial: bool,
}

impl NormalizedMessage {
    /// Whether every part is text
    pub fn is_text_only(&self) -> bool {
        self.parts
            .iter()
            .all(|part| matches!(part, ContentPart::Text { .. }))
    }

    /// Concatenated text of all text parts
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Where a tool call was proposed
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedToolCall {
    /// Index of the assistant message carrying the call
    pub message_index: usize,
    pub call: ToolCall,
}

/// Lookup from tool call id to the call that produced it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToolCallIndex {
    calls: BTreeMap<String, IndexedToolCall>,
}

impl ToolCallIndex {
    /// Resolve a `tool_call_id`
    pub fn get(&self, id: &str) -> Option<&IndexedToolCall> {
        self.calls.get(id)
    }

    /// Resolve a `tool_call_id` only if the call precedes `message_index`
    pub fn resolve_before(&self, id: &str, message_index: usize) -> Option<&ToolCall> {
        self.calls
            .get(id)
            .filter(|indexed| indexed.message_index < message_index)
            .map(|indexed| &indexed.call)
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

/// A conversation ready for encoding
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedConversation {
    pub system_prompt: Option<String>,
    pub tools: Vec<ToolDefinition>,
    pub messages: Vec<NormalizedMessage>,
    pub tool_calls: ToolCallIndex,
}

impl NormalizedConversation {
    /// Index of the last message, if any
    pub fn last_index(&self) -> Option<usize> {
        self.messages.len().checked_sub(1)
    }
}

/// Normalize a single message
///
/// Field paths in errors are relative to the message (`content[1].type`).
pub fn normalize_message(message: &Message) -> Result<NormalizedMessage, ValidationError> {
    let parts = match &message.content {
        MessageContent::Text(text) => vec![ContentPart::Text { text: text.clone() }],
        MessageContent::Parts(parts) => {
            for (i, part) in parts.iter().enumerate() {
                validate_part(part).map_err(|e| e.nested(&format!("content[{}]", i)))?;
            }
            parts.clone()
        }
    };

    Ok(NormalizedMessage {
        role: message.role,
        name: message.name.clone(),
        parts,
        tool_calls: message.tool_calls.clone().unwrap_or_default(),
        tool_call_id: message.tool_call_id.clone(),
        partial: message.is_partial(),
    })
}

fn validate_part(part: &ContentPart) -> Result<(), ValidationError> {
    match part {
        ContentPart::Unknown { kind } => Err(ValidationError::new(
            "type",
            ValidationErrorKind::UnknownContentPartKind { kind: kind.clone() },
        )),
        ContentPart::ImageUrl { image_url: media } | ContentPart::AudioUrl { audio_url: media } => {
            if media.url.is_empty() {
                return Err(ValidationError::required(format!("{}.url", part.kind())));
            }
            if DataUrl::is_data_url(&media.url) {
                DataUrl::parse(&media.url).map_err(|message| {
                    ValidationError::new(
                        format!("{}.url", part.kind()),
                        ValidationErrorKind::InvalidDataUrl { message },
                    )
                })?;
            }
            Ok(())
        }
        ContentPart::Text { .. } | ContentPart::Think { .. } => Ok(()),
    }
}

/// Normalize a whole conversation and index its tool calls
///
/// Duplicate tool call ids make linkage ambiguous for every provider, so they
/// fail here rather than per encoder.
pub fn normalize_conversation(
    conversation: &Conversation,
) -> Result<NormalizedConversation, ValidationError> {
    let mut messages = Vec::with_capacity(conversation.messages.len());
    let mut calls = BTreeMap::new();

    for (i, message) in conversation.messages.iter().enumerate() {
        let normalized =
            normalize_message(message).map_err(|e| e.nested(&format!("messages[{}]", i)))?;

        for (j, call) in normalized.tool_calls.iter().enumerate() {
            if call.id.is_empty() {
                return Err(ValidationError::required(format!(
                    "messages[{}].tool_calls[{}].id",
                    i, j
                )));
            }
            let indexed = IndexedToolCall {
                message_index: i,
                call: call.clone(),
            };
            if calls.insert(call.id.clone(), indexed).is_some() {
                return Err(ValidationError::new(
                    format!("messages[{}].tool_calls[{}].id", i, j),
                    ValidationErrorKind::DuplicateToolCallId {
                        id: call.id.clone(),
                    },
                ));
            }
        }

        messages.push(normalized);
    }

    Ok(NormalizedConversation {
        system_prompt: conversation
            .system_prompt
            .clone()
            .filter(|prompt| !prompt.is_empty()),
        tools: conversation.tools.clone(),
        messages,
        tool_calls: ToolCallIndex { calls },
    })
}
