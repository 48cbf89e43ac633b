//! Integration tests for the OpenAI Responses encoder

use chatwire_core::config::ProviderSettings;
use chatwire_core::protocol::*;
use chatwire_core::providers::{ConvertError, EncodedRequest, Encoder, OpenAIResponsesEncoder};
use serde_json::json;

fn encode(settings: Option<&ProviderSettings>, conversation: Conversation) -> Result<EncodedRequest, ConvertError> {
    let normalized = normalize_conversation(&conversation)?;
    OpenAIResponsesEncoder::from_settings(settings).encode(&normalized)
}

#[test]
fn test_simple_user_message() {
    let encoded = encode(None, Message::user("Hello, world!").into()).unwrap();
    assert_eq!(encoded.request.url, "https://api.openai.com/v1/responses");
    assert_eq!(
        encoded.request.body,
        json!({
            "model": "gpt-4.1",
            "input": [{
                "type": "message",
                "role": "user",
                "content": [{"type": "input_text", "text": "Hello, world!"}]
            }],
            "store": false
        })
    );
}

#[test]
fn test_assistant_turn_splits_into_items() {
    let conversation = Conversation::new(vec![
        Message::user("What is 2+3?"),
        MessageBuilder::with_parts(
            MessageRole::Assistant,
            vec![
                ContentPart::signed_think("Need to add", "enc-1"),
                ContentPart::text("Let me compute."),
            ],
        )
        .with_tool_call(ToolCall::new("call_1", "add", "{\"a\":2,\"b\":3}"))
        .build(),
        Message::tool("call_1", "5"),
    ]);

    let encoded = encode(None, conversation).unwrap();
    assert_eq!(
        encoded.request.body["input"],
        json!([
            {"type": "message", "role": "user", "content": [{"type": "input_text", "text": "What is 2+3?"}]},
            {
                "type": "reasoning",
                "summary": [{"type": "summary_text", "text": "Need to add"}],
                "encrypted_content": "enc-1"
            },
            {
                "type": "message",
                "role": "assistant",
                "content": [{"type": "output_text", "text": "Let me compute.", "annotations": []}]
            },
            {"type": "function_call", "arguments": "{\"a\":2,\"b\":3}", "call_id": "call_1", "name": "add"},
            {"type": "function_call_output", "call_id": "call_1", "output": "5"}
        ])
    );
}

#[test]
fn test_multimodal_order() {
    let conversation = Conversation::new(vec![MessageBuilder::with_parts(
        MessageRole::User,
        vec![
            ContentPart::text("A"),
            ContentPart::image_url("https://example.com/b.png"),
            ContentPart::text("C"),
            ContentPart::audio_url("data:audio/wav;base64,UklGRg=="),
        ],
    )
    .build()]);

    let encoded = encode(None, conversation).unwrap();
    assert_eq!(
        encoded.request.body["input"][0]["content"],
        json!([
            {"type": "input_text", "text": "A"},
            {"type": "input_image", "detail": "auto", "image_url": "https://example.com/b.png"},
            {"type": "input_text", "text": "C"},
            {"type": "input_audio", "input_audio": {"data": "UklGRg==", "format": "wav"}}
        ])
    );
}

#[test]
fn test_unsupported_inline_audio_type() {
    let conversation = Conversation::new(vec![MessageBuilder::with_parts(
        MessageRole::User,
        vec![ContentPart::audio_url("data:audio/ogg;base64,T2dnUw==")],
    )
    .build()]);
    let err = encode(None, conversation).unwrap_err();
    assert_eq!(err.kind(), "unsupported_feature");
    assert!(err.to_string().contains("audio/ogg"));
}

#[test]
fn test_reasoning_effort_requests_encrypted_content() {
    let settings = ProviderSettings {
        reasoning_effort: Some("medium".to_string()),
        max_tokens: Some(512),
        ..Default::default()
    };
    let encoded = encode(Some(&settings), Message::user("hi").into()).unwrap();
    let body = &encoded.request.body;
    assert_eq!(body["reasoning"], json!({"effort": "medium", "summary": "auto"}));
    assert_eq!(body["include"], json!(["reasoning.encrypted_content"]));
    assert_eq!(body["max_output_tokens"], 512);
}

#[test]
fn test_tools_and_system_prompt() {
    let conversation = Conversation::new(vec![Message::user("hi")])
        .with_system_prompt("Be terse")
        .with_tool(ToolDefinition::new("ping", "Ping a host", json!({"type": "object", "properties": {}})));

    let encoded = encode(None, conversation).unwrap();
    let body = &encoded.request.body;
    assert_eq!(
        body["input"][0],
        json!({"type": "message", "role": "system", "content": [{"type": "input_text", "text": "Be terse"}]})
    );
    assert_eq!(
        body["tools"],
        json!([{
            "type": "function",
            "name": "ping",
            "description": "Ping a host",
            "parameters": {"type": "object", "properties": {}},
            "strict": false
        }])
    );
}

#[test]
fn test_image_tool_output_is_item_list() {
    let conversation = Conversation::new(vec![
        MessageBuilder::new(MessageRole::Assistant, "")
            .with_tool_call(ToolCall::new("call_1", "screenshot", ""))
            .build(),
        MessageBuilder::with_parts(
            MessageRole::Tool,
            vec![ContentPart::text("here"), ContentPart::image_url("https://example.com/s.png")],
        )
        .with_tool_call_id("call_1")
        .build(),
    ]);

    let encoded = encode(None, conversation).unwrap();
    assert_eq!(
        encoded.request.body["input"],
        json!([
            {"type": "function_call", "arguments": "{}", "call_id": "call_1", "name": "screenshot"},
            {
                "type": "function_call_output",
                "call_id": "call_1",
                "output": [
                    {"type": "input_text", "text": "here"},
                    {"type": "input_image", "image_url": "https://example.com/s.png"}
                ]
            }
        ])
    );
}
