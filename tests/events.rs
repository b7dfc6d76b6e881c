use openrouter_client::{StreamEvent, TextAccumulator};
use serde_json::json;

fn delta(value: serde_json::Value) -> Option<String> {
    StreamEvent::new(value).text_delta().map(ToOwned::to_owned)
}

#[test]
fn text_delta_reads_known_shapes() {
    assert_eq!(
        delta(json!({"output_text_delta": "a"})).as_deref(),
        Some("a")
    );
    assert_eq!(delta(json!({"output_text": "b"})).as_deref(), Some("b"));
    assert_eq!(
        delta(json!({"output": [{"content": [{"text": "c"}]}]})).as_deref(),
        Some("c")
    );
    assert_eq!(
        delta(json!({"choices": [{"delta": {"content": "d"}}]})).as_deref(),
        Some("d")
    );
    assert_eq!(
        delta(json!({"type": "response.output_text.delta", "delta": "e"})).as_deref(),
        Some("e")
    );
}

#[test]
fn text_delta_follows_priority_order() {
    let event = json!({
        "output_text": "second",
        "output_text_delta": "first",
        "choices": [{"delta": {"content": "fourth"}}],
    });
    assert_eq!(delta(event).as_deref(), Some("first"));

    let event = json!({
        "output": [{"content": [{"text": "third"}]}],
        "choices": [{"delta": {"content": "fourth"}}],
    });
    assert_eq!(delta(event).as_deref(), Some("third"));
}

#[test]
fn text_delta_is_none_for_unrelated_events() {
    assert_eq!(delta(json!({"type": "response.created"})), None);
    let reasoning = json!({"type": "response.reasoning.delta", "delta": "x"});
    assert_eq!(delta(reasoning), None);
    let role_only = json!({"choices": [{"delta": {"role": "assistant"}}]});
    assert_eq!(delta(role_only), None);
    assert_eq!(delta(json!({"output_text_delta": 5})), None);
    assert_eq!(delta(json!([1, 2])), None);
}

#[test]
fn event_type_and_value_accessors() {
    let event = StreamEvent::from(json!({"type": "response.completed", "n": 1}));
    assert_eq!(event.event_type(), Some("response.completed"));
    assert_eq!(event.as_value()["n"], 1);
    assert_eq!(
        serde_json::to_value(&event).expect("serialize"),
        json!({"type": "response.completed", "n": 1})
    );
}

#[test]
fn accumulator_concatenates_deltas() {
    let mut accumulator = TextAccumulator::default();
    for value in [
        json!({"output_text_delta": "1, "}),
        json!({"type": "response.in_progress"}),
        json!({"choices": [{"delta": {"content": "2"}}]}),
    ] {
        accumulator.push(&StreamEvent::new(value));
    }
    assert_eq!(accumulator.text, "1, 2");
    assert_eq!(accumulator.events, 3);
}

#[test]
fn accumulator_returns_delta_borrowed_from_event() {
    let mut accumulator = TextAccumulator::default();
    let events: Vec<StreamEvent> = ["a", "b"]
        .into_iter()
        .map(|text| StreamEvent::new(json!({"output_text_delta": text})))
        .collect();

    let mut deltas = Vec::new();
    for event in &events {
        if let Some(delta) = accumulator.push(event) {
            deltas.push(delta);
        }
    }
    assert_eq!(accumulator.push(&events[0]), Some("a"));

    assert_eq!(deltas, ["a", "b"]);
    assert_eq!(accumulator.text, "aba");
    assert_eq!(accumulator.events, 3);
}
