//! Core protocol types for chat conversion
//!
//! This module contains the canonical, provider-agnostic chat model that every
//! encoder reads. The design prioritizes:
//! - Type safety through a closed, tagged content-part union
//! - Lossless passthrough of opaque provider payloads (signatures, extras)
//! - Cheap construction through builders and convenience constructors

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instructions that guide the model's behavior
    System,
    /// User input message
    User,
    /// Assistant (model) response
    Assistant,
    /// Tool result linked to an earlier tool call
    Tool,
}

impl MessageRole {
    /// Lowercase wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::Tool => "tool",
        }
    }
}

/// Content of a message: a bare string or an ordered list of typed parts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Shorthand for a single text part
    Text(String),
    /// Ordered content parts
    Parts(Vec<ContentPart>),
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Text(String::new())
    }
}

impl<'de> Deserialize<'de> for MessageContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(text) => Ok(MessageContent::Text(text)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| ContentPart::deserialize(item).map_err(de::Error::custom))
                .collect::<Result<Vec<_>, _>>()
                .map(MessageContent::Parts),
            other => Err(de::Error::invalid_type(
                unexpected(&other),
                &"a string or an array of content parts",
            )),
        }
    }
}

/// A media reference carried by image and audio parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaUrl {
    /// `http(s)://` URL or `data:` URL
    pub url: String,

    /// Provider-assigned identifier used to correlate the media across turns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Individual typed fragment of a message's content
///
/// `Unknown` never comes from a constructor: it only records a `type` tag the
/// deserializer did not recognize so that normalization can reject it with the
/// offending tag instead of failing inside serde.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Plain text
    Text { text: String },
    /// Reasoning transcript with an optional opaque signature
    Think {
        think: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        encrypted: Option<String>,
    },
    /// Image reference
    ImageUrl { image_url: MediaUrl },
    /// Audio reference
    AudioUrl { audio_url: MediaUrl },
    /// Unrecognized part kind (rejected during normalization)
    #[serde(skip_serializing)]
    Unknown { kind: String },
}

/// Mirror of the known `ContentPart` variants, used for tagged deserialization
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum KnownPart {
    Text {
        text: String,
    },
    Think {
        think: String,
        #[serde(default)]
        encrypted: Option<String>,
    },
    ImageUrl {
        image_url: MediaUrl,
    },
    AudioUrl {
        audio_url: MediaUrl,
    },
}

impl From<KnownPart> for ContentPart {
    fn from(part: KnownPart) -> Self {
        match part {
            KnownPart::Text { text } => ContentPart::Text { text },
            KnownPart::Think { think, encrypted } => ContentPart::Think { think, encrypted },
            KnownPart::ImageUrl { image_url } => ContentPart::ImageUrl { image_url },
            KnownPart::AudioUrl { audio_url } => ContentPart::AudioUrl { audio_url },
        }
    }
}

/// Tags accepted by [`ContentPart`] deserialization
pub const CONTENT_PART_KINDS: [&str; 4] = ["text", "think", "image_url", "audio_url"];

impl<'de> Deserialize<'de> for ContentPart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let kind = match value.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            Some(other) => {
                return Err(de::Error::invalid_type(unexpected(other), &"a string part type"))
            }
            None => return Err(de::Error::missing_field("type")),
        };

        if !CONTENT_PART_KINDS.contains(&kind.as_str()) {
            return Ok(ContentPart::Unknown { kind });
        }

        KnownPart::deserialize(value)
            .map(ContentPart::from)
            .map_err(de::Error::custom)
    }
}

fn unexpected(value: &Value) -> de::Unexpected<'_> {
    match value {
        Value::Null => de::Unexpected::Unit,
        Value::Bool(b) => de::Unexpected::Bool(*b),
        Value::Number(_) => de::Unexpected::Other("number"),
        Value::String(s) => de::Unexpected::Str(s),
        Value::Array(_) => de::Unexpected::Seq,
        Value::Object(_) => de::Unexpected::Map,
    }
}

impl ContentPart {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    /// Create an unsigned reasoning part
    pub fn think(think: impl Into<String>) -> Self {
        ContentPart::Think {
            think: think.into(),
            encrypted: None,
        }
    }

    /// Create a reasoning part carrying an opaque signature
    pub fn signed_think(think: impl Into<String>, encrypted: impl Into<String>) -> Self {
        ContentPart::Think {
            think: think.into(),
            encrypted: Some(encrypted.into()),
        }
    }

    /// Create an image part
    pub fn image_url(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: MediaUrl {
                url: url.into(),
                id: None,
            },
        }
    }

    /// Create an audio part
    pub fn audio_url(url: impl Into<String>) -> Self {
        ContentPart::AudioUrl {
            audio_url: MediaUrl {
                url: url.into(),
                id: None,
            },
        }
    }

    /// Attach a media id; no-op for non-media parts
    pub fn with_media_id(mut self, media_id: impl Into<String>) -> Self {
        match &mut self {
            ContentPart::ImageUrl { image_url: media } | ContentPart::AudioUrl { audio_url: media } => {
                media.id = Some(media_id.into());
            }
            _ => {}
        }
        self
    }

    /// The `type` tag of this part
    pub fn kind(&self) -> &str {
        match self {
            ContentPart::Text { .. } => "text",
            ContentPart::Think { .. } => "think",
            ContentPart::ImageUrl { .. } => "image_url",
            ContentPart::AudioUrl { .. } => "audio_url",
            ContentPart::Unknown { kind } => kind,
        }
    }

    /// Media reference of image/audio parts
    pub fn media(&self) -> Option<&MediaUrl> {
        match self {
            ContentPart::ImageUrl { image_url } => Some(image_url),
            ContentPart::AudioUrl { audio_url } => Some(audio_url),
            _ => None,
        }
    }
}

/// Function name and serialized arguments of a tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionBody {
    /// Name of the function to call
    pub name: String,

    /// Serialized JSON arguments; `None` means "not streamed yet"
    #[serde(default)]
    pub arguments: Option<String>,
}

/// One function-call proposal made by the assistant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Type of tool (always "function")
    #[serde(rename = "type", default = "default_tool_type")]
    pub tool_type: String,

    /// Correlation key referenced by a later tool message
    pub id: String,

    /// Function information
    pub function: FunctionBody,

    /// Provider-specific metadata preserved for round-trips
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<Map<String, Value>>,
}

fn default_tool_type() -> String {
    "function".to_string()
}

impl ToolCall {
    /// Create a tool call with serialized arguments
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            tool_type: default_tool_type(),
            id: id.into(),
            function: FunctionBody {
                name: name.into(),
                arguments: Some(arguments.into()),
            },
            extras: None,
        }
    }

    /// Create a tool call whose arguments have not arrived yet
    pub fn pending(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            tool_type: default_tool_type(),
            id: id.into(),
            function: FunctionBody {
                name: name.into(),
                arguments: None,
            },
            extras: None,
        }
    }

    /// Add a provider-specific extra
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extras
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
        self
    }

    /// Look up a provider-specific extra
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extras.as_ref().and_then(|extras| extras.get(key))
    }
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,

    /// Optional speaker label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Content of the message
    #[serde(default)]
    pub content: MessageContent,

    /// Tool calls proposed by an assistant message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,

    /// Back-reference from a tool message to the call it answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Marks a message that is still being produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial: Option<bool>,
}

/// A tool the model may call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Function name
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// JSON Schema of the arguments object
    #[serde(default = "empty_object_schema")]
    pub parameters: Value,
}

fn empty_object_schema() -> Value {
    serde_json::json!({"type": "object", "properties": {}})
}

impl ToolDefinition {
    /// Create a tool definition
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// Conversation context handed to the encoders
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Conversation {
    /// System prompt placed in each provider's dedicated slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// Tools offered to the model
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,

    /// Conversation history in order
    #[serde(default)]
    pub messages: Vec<Message>,
}

// ============================================================================
// Builder and convenience traits
// ============================================================================

/// Trait for converting types into messages
pub trait IntoMessage {
    /// Convert self into a Message
    fn into_message(self) -> Message;
}

impl IntoMessage for Message {
    fn into_message(self) -> Message {
        self
    }
}

impl IntoMessage for String {
    fn into_message(self) -> Message {
        Message::user(self)
    }
}

impl IntoMessage for &str {
    fn into_message(self) -> Message {
        Message::user(self)
    }
}

/// Builder for constructing messages
pub struct MessageBuilder {
    role: MessageRole,
    content: MessageContent,
    name: Option<String>,
    tool_calls: Option<Vec<ToolCall>>,
    tool_call_id: Option<String>,
    partial: Option<bool>,
}

impl MessageBuilder {
    /// Create a new message builder with role and text content
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self::from_content(role, MessageContent::Text(content.into()))
    }

    /// Create a new message builder with role and typed parts
    pub fn with_parts(role: MessageRole, parts: Vec<ContentPart>) -> Self {
        Self::from_content(role, MessageContent::Parts(parts))
    }

    fn from_content(role: MessageRole, content: MessageContent) -> Self {
        Self {
            role,
            content,
            name: None,
            tool_calls: None,
            tool_call_id: None,
            partial: None,
        }
    }

    /// Set the speaker name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append a tool call
    pub fn with_tool_call(mut self, tool_call: ToolCall) -> Self {
        self.tool_calls.get_or_insert_with(Vec::new).push(tool_call);
        self
    }

    /// Set the tool call back-reference
    pub fn with_tool_call_id(mut self, tool_call_id: impl Into<String>) -> Self {
        self.tool_call_id = Some(tool_call_id.into());
        self
    }

    /// Mark the message as partial
    pub fn partial(mut self) -> Self {
        self.partial = Some(true);
        self
    }

    /// Build the message
    pub fn build(self) -> Message {
        Message {
            role: self.role,
            name: self.name,
            content: self.content,
            tool_calls: self.tool_calls,
            tool_call_id: self.tool_call_id,
            partial: self.partial,
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl Message {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        MessageBuilder::new(MessageRole::System, content).build()
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        MessageBuilder::new(MessageRole::User, content).build()
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        MessageBuilder::new(MessageRole::Assistant, content).build()
    }

    /// Create a tool result message
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        MessageBuilder::new(MessageRole::Tool, content)
            .with_tool_call_id(tool_call_id)
            .build()
    }

    /// Whether the message is flagged partial
    pub fn is_partial(&self) -> bool {
        self.partial.unwrap_or(false)
    }
}

impl MessageContent {
    /// Check if content is empty
    pub fn is_empty(&self) -> bool {
        match self {
            MessageContent::Text(s) => s.is_empty(),
            MessageContent::Parts(parts) => parts.is_empty(),
        }
    }

    /// Get text representation of shorthand content
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(s) => Some(s.as_str()),
            MessageContent::Parts(_) => None,
        }
    }
}

impl Conversation {
    /// Create a conversation from its history
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            system_prompt: None,
            tools: Vec::new(),
            messages,
        }
    }

    /// Set the system prompt
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    /// Offer a tool to the model
    pub fn with_tool(mut self, tool: ToolDefinition) -> Self {
        self.tools.push(tool);
        self
    }
}

impl From<Message> for Conversation {
    fn from(message: Message) -> Self {
        Conversation::new(vec![message])
    }
}
