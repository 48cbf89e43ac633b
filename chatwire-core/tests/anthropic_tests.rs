//! Integration tests for the Anthropic Messages encoder

use chatwire_core::config::{ProviderSettings, SecretString};
use chatwire_core::protocol::*;
use chatwire_core::providers::{AnthropicEncoder, ConvertError, EncodedRequest, Encoder};
use serde_json::json;

fn no_cache() -> ProviderSettings {
    ProviderSettings {
        prompt_caching: Some(false),
        ..Default::default()
    }
}

fn encode(settings: Option<&ProviderSettings>, conversation: Conversation) -> Result<EncodedRequest, ConvertError> {
    let normalized = normalize_conversation(&conversation)?;
    AnthropicEncoder::from_settings(settings).encode(&normalized)
}

#[test]
fn test_simple_user_message() {
    let encoded = encode(None, Message::user("Hello, world!").into()).unwrap();
    let request = &encoded.request;

    assert_eq!(request.url, "https://api.anthropic.com/v1/messages");
    assert_eq!(request.headers.get("anthropic-version"), Some("2023-06-01"));
    assert_eq!(request.headers.get("Content-Type"), Some("application/json"));
    assert!(!request.headers.contains("x-api-key"));
    assert_eq!(
        request.body,
        json!({
            "model": "claude-3-5-sonnet-20241022",
            "max_tokens": 1024,
            "messages": [{
                "role": "user",
                "content": [{
                    "type": "text",
                    "text": "Hello, world!",
                    "cache_control": {"type": "ephemeral"}
                }]
            }]
        })
    );
    assert!(!encoded.is_lossy());
}

#[test]
fn test_tool_round_trip_merges_results() {
    let conversation = Conversation::new(vec![
        Message::user("Add and subtract"),
        MessageBuilder::new(MessageRole::Assistant, "Calling tools")
            .with_tool_call(ToolCall::new("call_1", "add", "{\"a\":2,\"b\":3}"))
            .with_tool_call(ToolCall::new("call_2", "sub", ""))
            .build(),
        Message::tool("call_1", "5"),
        Message::tool("call_2", ""),
    ])
    .with_tool(ToolDefinition::new(
        "add",
        "Add two numbers",
        json!({"type": "object", "properties": {"a": {"type": "number"}, "b": {"type": "number"}}}),
    ));

    let encoded = encode(Some(&no_cache()), conversation).unwrap();
    assert_eq!(
        encoded.request.body,
        json!({
            "model": "claude-3-5-sonnet-20241022",
            "max_tokens": 1024,
            "messages": [
                {"role": "user", "content": [{"type": "text", "text": "Add and subtract"}]},
                {"role": "assistant", "content": [
                    {"type": "text", "text": "Calling tools"},
                    {"type": "tool_use", "id": "call_1", "name": "add", "input": {"a": 2, "b": 3}},
                    {"type": "tool_use", "id": "call_2", "name": "sub", "input": {}}
                ]},
                {"role": "user", "content": [
                    {"type": "tool_result", "tool_use_id": "call_1", "content": [{"type": "text", "text": "5"}]},
                    {"type": "tool_result", "tool_use_id": "call_2", "content": []}
                ]}
            ],
            "tools": [{
                "name": "add",
                "description": "Add two numbers",
                "input_schema": {"type": "object", "properties": {"a": {"type": "number"}, "b": {"type": "number"}}}
            }]
        })
    );
}

#[test]
fn test_empty_assistant_text_before_tool_use_is_skipped() {
    let conversation = Conversation::new(vec![
        Message::user("What is 2+3?"),
        MessageBuilder::new(MessageRole::Assistant, "")
            .with_tool_call(ToolCall::new("call_1", "add", "{\"a\":2}"))
            .build(),
    ]);

    let encoded = encode(Some(&no_cache()), conversation).unwrap();
    assert_eq!(
        encoded.request.body["messages"][1],
        json!({"role": "assistant", "content": [
            {"type": "tool_use", "id": "call_1", "name": "add", "input": {"a": 2}}
        ]})
    );
}

#[test]
fn test_signed_thinking_passes_through() {
    let conversation = Conversation::new(vec![
        Message::user("Why?"),
        MessageBuilder::with_parts(
            MessageRole::Assistant,
            vec![
                ContentPart::signed_think("Because...", "sig-1=="),
                ContentPart::think("unsigned scratch"),
                ContentPart::text("Done"),
            ],
        )
        .build(),
    ]);

    let encoded = encode(Some(&no_cache()), conversation).unwrap();
    assert_eq!(
        encoded.request.body["messages"][1]["content"],
        json!([
            {"type": "thinking", "thinking": "Because...", "signature": "sig-1=="},
            {"type": "text", "text": "Done"}
        ])
    );
    assert_eq!(
        encoded.lossy_reasons,
        vec!["messages[1].content[1]: reasoning.unsigned_omitted".to_string()]
    );
}

#[test]
fn test_system_prompt_and_system_messages() {
    let conversation = Conversation::new(vec![Message::system("Be brief"), Message::user("Hi")])
        .with_system_prompt("You are helpful");

    let encoded = encode(None, conversation).unwrap();
    assert_eq!(
        encoded.request.body["system"],
        json!([{"type": "text", "text": "You are helpful", "cache_control": {"type": "ephemeral"}}])
    );
    assert_eq!(
        encoded.request.body["messages"][0],
        json!({"role": "user", "content": [{"type": "text", "text": "<system>Be brief</system>"}]})
    );
}

#[test]
fn test_inline_image_and_order() {
    let conversation = Conversation::new(vec![MessageBuilder::with_parts(
        MessageRole::User,
        vec![
            ContentPart::text("A"),
            ContentPart::image_url("data:image/jpeg;base64,aGVsbG8="),
            ContentPart::text("C"),
        ],
    )
    .build()]);

    let encoded = encode(Some(&no_cache()), conversation).unwrap();
    assert_eq!(
        encoded.request.body["messages"][0]["content"],
        json!([
            {"type": "text", "text": "A"},
            {"type": "image", "source": {"type": "base64", "media_type": "image/jpeg", "data": "aGVsbG8="}},
            {"type": "text", "text": "C"}
        ])
    );
}

#[test]
fn test_settings_and_headers() {
    let mut settings = no_cache();
    settings.api_key = Some(SecretString::new("sk-ant-test"));
    settings.model = Some("claude-sonnet-4".to_string());
    settings.max_tokens = Some(4096);
    settings.temperature = Some(0.2);
    settings.headers.insert("Anthropic-Beta".to_string(), "tools-2024".to_string());

    let encoded = encode(Some(&settings), Message::user("Hi").into()).unwrap();
    let request = encoded.request;
    assert_eq!(request.headers.get("x-api-key"), Some("sk-ant-test"));
    assert_eq!(request.headers.get("anthropic-beta"), Some("tools-2024"));
    assert_eq!(request.body["model"], "claude-sonnet-4");
    assert_eq!(request.body["max_tokens"], 4096);
    assert_eq!(request.body["temperature"], 0.2);
}

#[test]
fn test_partial_assistant_is_prefill() {
    let conversation = Conversation::new(vec![
        Message::user("Count to three"),
        MessageBuilder::new(MessageRole::Assistant, "One, two,").partial().build(),
    ]);
    let encoded = encode(Some(&no_cache()), conversation).unwrap();
    assert_eq!(
        encoded.request.body["messages"][1],
        json!({"role": "assistant", "content": [{"type": "text", "text": "One, two,"}]})
    );
}

#[test]
fn test_malformed_arguments_are_a_validation_error() {
    let conversation = Conversation::new(vec![MessageBuilder::new(MessageRole::Assistant, "")
        .with_tool_call(ToolCall::new("call_1", "add", "{not json"))
        .build()]);

    match encode(None, conversation) {
        Err(ConvertError::Validation(e)) => {
            assert_eq!(e.field_path, "messages[0].tool_calls[0].function.arguments");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_null_arguments_under_partial_unsupported() {
    let conversation = Conversation::new(vec![
        Message::user("go"),
        MessageBuilder::new(MessageRole::Assistant, "")
            .with_tool_call(ToolCall::pending("call_1", "add"))
            .partial()
            .build(),
    ]);
    assert!(matches!(
        encode(None, conversation),
        Err(ConvertError::UnsupportedFeature { .. })
    ));
}
