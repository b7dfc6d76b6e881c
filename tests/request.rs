use openrouter_client::{
    ChatOptions, Message, MessageContent, OpenRouterError, ReasoningConfig, ReasoningEffort,
    ResponsesRequest,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};

fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("object literal")
}

#[test]
fn message_serializes_role_content_and_optional_provider_options() {
    let plain = serde_json::to_value(Message::user("hello")).expect("serialize");
    assert_eq!(plain, json!({"role": "user", "content": "hello"}));

    let blocks = Message::user(vec![json!({"type": "input_text", "text": "look"})])
        .with_provider_options(object(json!({"cache": true})));
    let blocks = serde_json::to_value(blocks).expect("serialize");
    assert_eq!(
        blocks,
        json!({
            "role": "user",
            "content": [{"type": "input_text", "text": "look"}],
            "provider_options": {"cache": true},
        })
    );
}

#[test]
fn reasoning_config_serializes_only_present_fields() {
    let empty = serde_json::to_value(ReasoningConfig::new()).expect("serialize");
    assert_eq!(empty, json!({}));

    let partial = ReasoningConfig::new().with_effort(ReasoningEffort::High);
    assert_eq!(
        serde_json::to_value(partial).expect("serialize"),
        json!({"effort": "high"})
    );
}

#[test]
fn request_payload_matches_model_messages_and_reasoning() {
    let request = ResponsesRequest::new(
        "anthropic/claude-3.7-sonnet:thinking",
        vec![Message::system("be brief"), Message::user("5 - 2?")],
    )
    .with_reasoning(
        ReasoningConfig::new()
            .with_max_tokens(500)
            .with_effort(ReasoningEffort::Medium)
            .with_encrypted(false),
    );

    let payload = request.to_payload().expect("payload");
    assert_eq!(
        payload,
        json!({
            "model": "anthropic/claude-3.7-sonnet:thinking",
            "messages": [
                {"role": "system", "content": "be brief"},
                {"role": "user", "content": "5 - 2?"},
            ],
            "reasoning": {"max_tokens": 500, "effort": "medium", "encrypted": false},
        })
    );
    assert!(payload.get("stream").is_none());
}

#[test]
fn stream_flag_is_only_serialized_when_true() {
    let request = ResponsesRequest::new("m", vec![Message::user("x")]).with_stream(true);
    let payload = request.to_payload().expect("payload");
    assert_eq!(payload["stream"], json!(true));
}

#[test]
fn provider_options_override_extra_body_which_overrides_base_fields() {
    let extra_body = object(json!({"temperature": 0.1, "model": "extra-model", "top_p": 0.9}));
    let provider_options = object(json!({"temperature": 0.7, "provider": {"order": ["a"]}}));
    let request = ResponsesRequest::new("base-model", vec![Message::user("x")])
        .with_extra_body(extra_body)
        .with_provider_options(provider_options);

    let payload = request.to_payload().expect("payload");
    assert_eq!(payload["model"], json!("extra-model"));
    assert_eq!(payload["temperature"], json!(0.7));
    assert_eq!(payload["top_p"], json!(0.9));
    assert_eq!(payload["provider"], json!({"order": ["a"]}));
}

#[test]
fn reasoning_mapping_is_normalized_on_entry() {
    let options = ChatOptions::new().with_reasoning(object(json!({
        "max_tokens": 64,
        "effort": "extreme",
        "encrypted": "yes",
    })));

    assert_eq!(
        options.reasoning,
        Some(ReasoningConfig {
            max_tokens: Some(64),
            effort: None,
            encrypted: None,
        })
    );
}

#[test]
fn request_from_options_carries_every_option() {
    let options = ChatOptions::new()
        .with_reasoning(ReasoningConfig::new().with_effort(ReasoningEffort::Low))
        .insert_extra("max_output_tokens", 128)
        .insert_provider_option("transforms", json!(["middle-out"]))
        .with_stream(true);

    let request = ResponsesRequest::from_options("m", vec![Message::user("x")], options);
    assert!(request.is_stream());
    assert_eq!(request.extra_body()["max_output_tokens"], json!(128));
    assert_eq!(
        request.provider_options()["transforms"],
        json!(["middle-out"])
    );
    assert_eq!(
        request.reasoning().and_then(|r| r.effort),
        Some(ReasoningEffort::Low)
    );
}

#[test]
fn request_from_value_reads_raw_mapping() {
    let request = ResponsesRequest::from_value(&json!({
        "model": "openai/gpt-4o",
        "messages": [
            {"role": "user", "content": [{"type": "input_text", "text": "hi"}]},
            {"role": "assistant", "content": null, "provider_options": {"a": 1}},
        ],
        "extra_body": {"seed": 7},
        "stream": true,
        "reasoning": {"effort": "low"},
    }))
    .expect("request");

    assert_eq!(request.model(), "openai/gpt-4o");
    assert_eq!(request.messages().len(), 2);
    assert!(matches!(
        request.messages()[0].content(),
        MessageContent::Blocks(blocks) if blocks.len() == 1
    ));
    assert_eq!(
        request.messages()[1].content(),
        &MessageContent::Text(String::new())
    );
    assert_eq!(request.messages()[1].provider_options()["a"], json!(1));
    assert_eq!(request.extra_body()["seed"], json!(7));
    assert!(request.is_stream());
    assert!(request.provider_options().is_empty());
}

#[test]
fn request_from_value_requires_model() {
    let error = ResponsesRequest::from_value(&json!({"messages": []})).expect_err("no model");
    assert!(matches!(error, OpenRouterError::InvalidRequest(_)));
}

#[test]
fn message_from_value_rejects_non_text_content() {
    let error = Message::from_value(&json!({"role": "user", "content": 5})).expect_err("number");
    assert!(matches!(error, OpenRouterError::InvalidRequest(_)));
}
