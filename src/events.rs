use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `type` of the typed text delta frames emitted by the responses API.
pub const OUTPUT_TEXT_DELTA_TYPE: &str = "response.output_text.delta";

/// One decoded SSE `data:` payload. The schema is open; callers inspect it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamEvent(Value);

type DeltaSource = fn(&Value) -> Option<&str>;

/// Text delta locations, highest priority first.
const TEXT_DELTA_SOURCES: [DeltaSource; 5] = [
    flat_output_text_delta,
    flat_output_text,
    first_output_block_text,
    first_choice_delta,
    typed_output_text_delta,
];

fn flat_output_text_delta(value: &Value) -> Option<&str> {
    value.get("output_text_delta")?.as_str()
}

fn flat_output_text(value: &Value) -> Option<&str> {
    value.get("output_text")?.as_str()
}

fn first_output_block_text(value: &Value) -> Option<&str> {
    value.pointer("/output/0/content/0/text")?.as_str()
}

fn first_choice_delta(value: &Value) -> Option<&str> {
    value.pointer("/choices/0/delta/content")?.as_str()
}

fn typed_output_text_delta(value: &Value) -> Option<&str> {
    if value.get("type")?.as_str()? != OUTPUT_TEXT_DELTA_TYPE {
        return None;
    }
    value.get("delta")?.as_str()
}

impl StreamEvent {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Incremental text carried by this event, if any known shape matches.
    pub fn text_delta(&self) -> Option<&str> {
        TEXT_DELTA_SOURCES.iter().find_map(|source| source(&self.0))
    }

    /// The `type` discriminator, for providers that tag their frames.
    pub fn event_type(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for StreamEvent {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Concatenates text deltas as events arrive.
#[derive(Debug, Clone, Default)]
pub struct TextAccumulator {
    pub text: String,
    pub events: usize,
}

impl TextAccumulator {
    /// Record `event` and return its text delta, borrowed from the event.
    pub fn push<'a>(&mut self, event: &'a StreamEvent) -> Option<&'a str> {
        self.events += 1;
        let delta = event.text_delta()?;
        self.text.push_str(delta);
        Some(delta)
    }
}
