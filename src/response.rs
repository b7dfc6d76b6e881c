//! Shape-tolerant normalization of responses endpoint payloads.
//!
//! Providers answer with the legacy `choices[].message` layout, the block
//! structured `output[]` layout, a flat `output_text`, or a mix of them.
//! [`Response::from_value`] folds all of these into one value and never fails:
//! anything it cannot read becomes an absent or default field.

use serde_json::{Map, Value};

const DEFAULT_ROLE: &str = "assistant";
const OUTPUT_TYPE_MESSAGE: &str = "message";

/// Token accounting reported by the API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    /// Request cost in USD, when the provider reports it.
    pub cost: Option<f64>,
}

impl Usage {
    /// Returns `None` unless `value` is an object; missing counters default to 0.
    pub fn from_value(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;
        let counter = |key: &str| fields.get(key).and_then(Value::as_u64).unwrap_or(0);
        Some(Self {
            prompt_tokens: counter("prompt_tokens"),
            completion_tokens: counter("completion_tokens"),
            total_tokens: counter("total_tokens"),
            cost: fields.get("cost").and_then(Value::as_f64),
        })
    }
}

/// One candidate or output message of a response.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub id: String,
    pub role: String,
    /// Text fragments of the content, newline-joined.
    pub content: Option<String>,
    pub finish_reason: Option<String>,
    pub metadata: Map<String, Value>,
    /// The original content value as a list, kept for non-text blocks.
    pub raw_content: Vec<Value>,
}

impl Choice {
    /// Accepts both `{message: {role, content}, finish_reason}` and flat
    /// `{role, content, status}` items.
    pub fn from_value(item: &Value) -> Self {
        let message = item.get("message").filter(|message| !message.is_null());

        let (role, content) = match message {
            Some(message) => (
                str_field(message, "role").or_else(|| str_field(item, "role")),
                message.get("content"),
            ),
            None => (str_field(item, "role"), item.get("content")),
        };

        Self {
            id: str_field(item, "id").unwrap_or_default(),
            role: role.unwrap_or_else(|| DEFAULT_ROLE.to_owned()),
            content: stringify_content(content),
            finish_reason: str_field(item, "finish_reason").or_else(|| str_field(item, "status")),
            metadata: object_field(item, "metadata"),
            raw_content: normalize_raw_content(content),
        }
    }
}

/// Canonical response of the responses endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub id: String,
    /// Source `choices`, or choices synthesized from `output` message blocks.
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
    pub metadata: Map<String, Value>,
    pub output_text: Option<String>,
    pub output: Vec<Value>,
    /// The decoded payload as received.
    pub raw_response: Value,
}

impl Response {
    pub fn from_value(raw_response: Value) -> Self {
        let output = match raw_response.get("output") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };

        let choices = match raw_response.get("choices") {
            Some(Value::Array(items)) if !items.is_empty() => {
                items.iter().map(Choice::from_value).collect()
            }
            _ => output
                .iter()
                .filter(|item| is_output_message(item))
                .map(Choice::from_value)
                .collect(),
        };

        Self {
            id: str_field(&raw_response, "id").unwrap_or_default(),
            choices,
            usage: raw_response.get("usage").and_then(Usage::from_value),
            metadata: object_field(&raw_response, "metadata"),
            output_text: str_field(&raw_response, "output_text"),
            output,
            raw_response,
        }
    }

    /// Best available text: a non-empty `output_text`, then the first non-empty
    /// `output` message, then the first choice.
    pub fn content(&self) -> Option<String> {
        if let Some(text) = self.output_text.as_deref().filter(|text| !text.is_empty()) {
            return Some(text.to_owned());
        }

        self.output_message_text().or_else(|| {
            self.choices
                .first()
                .and_then(|choice| choice.content.clone())
        })
    }

    pub fn first_choice(&self) -> Option<&Choice> {
        self.choices.first()
    }

    /// Text of the first non-empty `output` message block, regardless of choices.
    pub fn output_message_text(&self) -> Option<String> {
        self.output
            .iter()
            .filter(|item| is_output_message(item))
            .filter_map(|item| stringify_content(item.get("content")))
            .find(|text| !text.is_empty())
    }
}

/// Flatten a content value into newline-joined text.
///
/// Strings are returned verbatim. Lists are scanned depth-first: non-empty
/// strings, string `text` fields and non-empty nested `content` values each
/// contribute one fragment. Returns `None` when nothing contributes.
pub fn stringify_content(content: Option<&Value>) -> Option<String> {
    let items = match content? {
        Value::String(text) => return Some(text.clone()),
        Value::Array(items) => items,
        _ => return None,
    };

    let mut parts = Vec::new();
    for item in items {
        match item {
            Value::String(text) if !text.is_empty() => parts.push(text.clone()),
            Value::Object(fields) => {
                if let Some(Value::String(text)) = fields.get("text") {
                    parts.push(text.clone());
                } else if let Some(nested) = stringify_content(fields.get("content")) {
                    if !nested.is_empty() {
                        parts.push(nested);
                    }
                }
            }
            _ => {}
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}

/// Lists pass through, a bare string becomes a one-element list, anything else is empty.
pub fn normalize_raw_content(content: Option<&Value>) -> Vec<Value> {
    match content {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::String(text)) => vec![Value::String(text.clone())],
        _ => Vec::new(),
    }
}

fn is_output_message(item: &Value) -> bool {
    item.get("type").and_then(Value::as_str) == Some(OUTPUT_TYPE_MESSAGE)
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}

fn object_field(value: &Value, key: &str) -> Map<String, Value> {
    value
        .get(key)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}
