//! Integration tests for the canonical message model and normalization

use chatwire_core::protocol::*;
use serde_json::json;

#[test]
fn test_string_content_deserializes_as_text() {
    let message: Message =
        serde_json::from_value(json!({"role": "user", "content": "Hello, world!"})).unwrap();
    assert_eq!(message.role, MessageRole::User);
    assert_eq!(message.content, MessageContent::Text("Hello, world!".to_string()));
    assert!(!message.is_partial());
}

#[test]
fn test_missing_content_defaults_to_empty_text() {
    let message: Message = serde_json::from_value(json!({"role": "assistant"})).unwrap();
    let normalized = normalize_message(&message).unwrap();
    assert_eq!(normalized.parts, vec![ContentPart::text("")]);
}

#[test]
fn test_parts_deserialize_in_order() {
    let message: Message = serde_json::from_value(json!({
        "role": "assistant",
        "content": [
            {"type": "think", "think": "plan", "encrypted": "sig-1"},
            {"type": "text", "text": "A"},
            {"type": "image_url", "image_url": {"url": "https://example.com/b.png", "id": "img-1"}},
            {"type": "audio_url", "audio_url": {"url": "https://example.com/c.mp3"}}
        ]
    }))
    .unwrap();

    let normalized = normalize_message(&message).unwrap();
    assert_eq!(
        normalized.parts,
        vec![
            ContentPart::signed_think("plan", "sig-1"),
            ContentPart::text("A"),
            ContentPart::image_url("https://example.com/b.png").with_media_id("img-1"),
            ContentPart::audio_url("https://example.com/c.mp3"),
        ]
    );
}

#[test]
fn test_tool_calls_deserialize_with_defaults() {
    let message: Message = serde_json::from_value(json!({
        "role": "assistant",
        "content": "",
        "tool_calls": [
            {"id": "call_1", "function": {"name": "add", "arguments": "{\"a\":2}"}},
            {"id": "call_2", "function": {"name": "sub", "arguments": null}, "extras": {"thought_signature": "ts"}}
        ],
        "partial": true
    }))
    .unwrap();

    let calls = message.tool_calls.as_ref().unwrap();
    assert_eq!(calls[0].tool_type, "function");
    assert_eq!(calls[0].function.arguments.as_deref(), Some("{\"a\":2}"));
    assert!(calls[1].function.arguments.is_none());
    assert_eq!(calls[1].extra("thought_signature"), Some(&json!("ts")));
    assert!(message.is_partial());
}

#[test]
fn test_unknown_part_kind_fails_normalization() {
    let message: Message = serde_json::from_value(json!({
        "role": "user",
        "content": [
            {"type": "text", "text": "hi"},
            {"type": "video_url", "video_url": {"url": "https://example.com/v.mp4"}}
        ]
    }))
    .unwrap();

    let err = normalize_message(&message).unwrap_err();
    assert_eq!(err.field_path, "content[1].type");
    assert_eq!(
        err.kind,
        ValidationErrorKind::UnknownContentPartKind {
            kind: "video_url".to_string()
        }
    );
}

#[test]
fn test_part_without_type_is_a_decode_error() {
    let result = serde_json::from_value::<Message>(json!({
        "role": "user",
        "content": [{"text": "hi"}]
    }));
    assert!(result.is_err());
}

#[test]
fn test_unpadded_data_url_normalizes() {
    let message = MessageBuilder::with_parts(
        MessageRole::User,
        vec![ContentPart::image_url("data:image/png;base64,aGVsbG8")],
    )
    .build();
    let normalized = normalize_message(&message).unwrap();
    assert_eq!(
        normalized.parts,
        vec![ContentPart::image_url("data:image/png;base64,aGVsbG8")]
    );
}

#[test]
fn test_invalid_data_url_fails_normalization() {
    let message = MessageBuilder::with_parts(
        MessageRole::User,
        vec![ContentPart::image_url("data:image/png;base64,@@@")],
    )
    .build();
    let err = normalize_message(&message).unwrap_err();
    assert_eq!(err.field_path, "content[0].image_url.url");
    assert!(matches!(err.kind, ValidationErrorKind::InvalidDataUrl { .. }));
}

#[test]
fn test_conversation_paths_are_prefixed() {
    let conversation = Conversation::new(vec![
        Message::user("hi"),
        MessageBuilder::with_parts(MessageRole::User, vec![ContentPart::image_url("")]).build(),
    ]);
    let err = normalize_conversation(&conversation).unwrap_err();
    assert_eq!(err.field_path, "messages[1].content[0].image_url.url");
    assert!(err.to_string().contains("messages[1].content[0].image_url.url"));
}

#[test]
fn test_duplicate_tool_call_ids_rejected() {
    let conversation = Conversation::new(vec![
        MessageBuilder::new(MessageRole::Assistant, "")
            .with_tool_call(ToolCall::new("call_1", "add", "{}"))
            .build(),
        MessageBuilder::new(MessageRole::Assistant, "")
            .with_tool_call(ToolCall::new("call_1", "sub", "{}"))
            .build(),
    ]);
    let err = normalize_conversation(&conversation).unwrap_err();
    assert_eq!(err.field_path, "messages[1].tool_calls[0].id");
    assert_eq!(
        err.kind,
        ValidationErrorKind::DuplicateToolCallId {
            id: "call_1".to_string()
        }
    );
}

#[test]
fn test_tool_call_index_records_origin() {
    let conversation = Conversation::new(vec![
        Message::user("add 2 and 3"),
        MessageBuilder::new(MessageRole::Assistant, "")
            .with_tool_call(ToolCall::new("call_1", "add", "{\"a\":2,\"b\":3}"))
            .build(),
        Message::tool("call_1", "5"),
    ]);
    let normalized = normalize_conversation(&conversation).unwrap();
    assert_eq!(normalized.tool_calls.len(), 1);
    let indexed = normalized.tool_calls.get("call_1").unwrap();
    assert_eq!(indexed.message_index, 1);
    assert_eq!(indexed.call.function.name, "add");
}

#[test]
fn test_input_is_not_mutated() {
    let message = MessageBuilder::with_parts(
        MessageRole::Assistant,
        vec![ContentPart::think("x"), ContentPart::text("y")],
    )
    .with_name("bot")
    .build();
    let before = message.clone();
    let _ = normalize_message(&message).unwrap();
    assert_eq!(message, before);
}

#[test]
fn test_message_serializes_canonical_shape() {
    let message = MessageBuilder::with_parts(
        MessageRole::User,
        vec![ContentPart::text("hi"), ContentPart::image_url("https://example.com/a.png")],
    )
    .build();
    assert_eq!(
        serde_json::to_value(&message).unwrap(),
        json!({
            "role": "user",
            "content": [
                {"type": "text", "text": "hi"},
                {"type": "image_url", "image_url": {"url": "https://example.com/a.png"}}
            ]
        })
    );
}
