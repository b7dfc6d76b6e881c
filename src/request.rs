//! Request-side value objects for the responses endpoint.
//!
//! Everything here is built once and then only read. The payload sent over the
//! wire is produced by [`ResponsesRequest::to_payload`], which applies the
//! shallow merge of `extra_body` and `provider_options` on top of the base fields.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::OpenRouterError;

pub const ROLE_SYSTEM: &str = "system";
pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";

/// Message content: plain text or an ordered list of content blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<Value>),
}

impl From<&str> for MessageContent {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for MessageContent {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<Value>> for MessageContent {
    fn from(value: Vec<Value>) -> Self {
        Self::Blocks(value)
    }
}

/// One conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    role: String,
    content: MessageContent,
    #[serde(skip_serializing_if = "Map::is_empty")]
    provider_options: Map<String, Value>,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<MessageContent>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            provider_options: Map::new(),
        }
    }

    pub fn system(content: impl Into<MessageContent>) -> Self {
        Self::new(ROLE_SYSTEM, content)
    }

    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self::new(ROLE_USER, content)
    }

    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self::new(ROLE_ASSISTANT, content)
    }

    pub fn with_provider_options(mut self, provider_options: Map<String, Value>) -> Self {
        self.provider_options = provider_options;
        self
    }

    /// Build a message from a raw `{role, content, provider_options}` mapping.
    ///
    /// `role` is required; missing or null `content` becomes an empty string.
    pub fn from_value(value: &Value) -> Result<Self, OpenRouterError> {
        let role = value
            .get("role")
            .and_then(Value::as_str)
            .ok_or_else(|| OpenRouterError::InvalidRequest("message 'role' is required".into()))?;

        let content = match value.get("content") {
            None | Some(Value::Null) => MessageContent::Text(String::new()),
            Some(Value::String(text)) => MessageContent::Text(text.clone()),
            Some(Value::Array(blocks)) => MessageContent::Blocks(blocks.clone()),
            Some(other) => {
                return Err(OpenRouterError::InvalidRequest(format!(
                    "message 'content' must be a string or a list, got {}",
                    value_type_name(other)
                )))
            }
        };

        Ok(Self {
            role: role.to_owned(),
            content,
            provider_options: object_or_empty(value.get("provider_options")),
        })
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn content(&self) -> &MessageContent {
        &self.content
    }

    pub fn provider_options(&self) -> &Map<String, Value> {
        &self.provider_options
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Low,
    Medium,
    High,
}

impl ReasoningEffort {
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Provider-side parameters for the extended thinking phase.
///
/// Only the fields that are set are serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReasoningConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effort: Option<ReasoningEffort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted: Option<bool>,
}

impl ReasoningConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_tokens(mut self, max_tokens: u64) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_effort(mut self, effort: ReasoningEffort) -> Self {
        self.effort = Some(effort);
        self
    }

    pub fn with_encrypted(mut self, encrypted: bool) -> Self {
        self.encrypted = Some(encrypted);
        self
    }

    /// Read a raw reasoning mapping. Fields of the wrong type or unknown effort
    /// levels are treated as absent.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            max_tokens: map.get("max_tokens").and_then(Value::as_u64),
            effort: map
                .get("effort")
                .and_then(Value::as_str)
                .and_then(ReasoningEffort::parse),
            encrypted: map.get("encrypted").and_then(Value::as_bool),
        }
    }
}

impl From<Map<String, Value>> for ReasoningConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self::from_map(&map)
    }
}

/// Full request for the responses endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponsesRequest {
    model: String,
    messages: Vec<Message>,
    extra_body: Map<String, Value>,
    stream: bool,
    reasoning: Option<ReasoningConfig>,
    provider_options: Map<String, Value>,
}

impl ResponsesRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            extra_body: Map::new(),
            stream: false,
            reasoning: None,
            provider_options: Map::new(),
        }
    }

    /// Combine a model, messages and a normalized options bag.
    pub fn from_options(
        model: impl Into<String>,
        messages: Vec<Message>,
        options: ChatOptions,
    ) -> Self {
        Self {
            model: model.into(),
            messages,
            extra_body: options.extra_body,
            stream: options.stream,
            reasoning: options.reasoning,
            provider_options: options.provider_options,
        }
    }

    /// Build a request from a raw mapping with `model`, `messages`, `extra_body`,
    /// `stream`, `reasoning` and `provider_options` keys.
    pub fn from_value(value: &Value) -> Result<Self, OpenRouterError> {
        let model = value
            .get("model")
            .and_then(Value::as_str)
            .ok_or_else(|| OpenRouterError::InvalidRequest("'model' is required".into()))?;

        let messages = match value.get("messages") {
            Some(Value::Array(items)) => items
                .iter()
                .map(Message::from_value)
                .collect::<Result<Vec<_>, _>>()?,
            _ => Vec::new(),
        };

        let reasoning = value
            .get("reasoning")
            .and_then(Value::as_object)
            .map(ReasoningConfig::from_map);

        Ok(Self {
            model: model.to_owned(),
            messages,
            extra_body: object_or_empty(value.get("extra_body")),
            stream: value
                .get("stream")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            reasoning,
            provider_options: object_or_empty(value.get("provider_options")),
        })
    }

    pub fn with_extra_body(mut self, extra_body: Map<String, Value>) -> Self {
        self.extra_body = extra_body;
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<ReasoningConfig>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    pub fn with_provider_options(mut self, provider_options: Map<String, Value>) -> Self {
        self.provider_options = provider_options;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn extra_body(&self) -> &Map<String, Value> {
        &self.extra_body
    }

    pub fn is_stream(&self) -> bool {
        self.stream
    }

    pub fn reasoning(&self) -> Option<&ReasoningConfig> {
        self.reasoning.as_ref()
    }

    pub fn provider_options(&self) -> &Map<String, Value> {
        &self.provider_options
    }

    pub(crate) fn validate(&self) -> Result<(), OpenRouterError> {
        if self.model.trim().is_empty() {
            return Err(OpenRouterError::InvalidRequest(
                "'model' must be a non-empty identifier".to_owned(),
            ));
        }
        Ok(())
    }

    /// Wire payload: base fields, then `extra_body`, then `provider_options`.
    /// Later sources win on key collisions.
    pub fn to_payload(&self) -> Result<Value, OpenRouterError> {
        let mut payload = Map::new();
        payload.insert("model".to_owned(), Value::String(self.model.clone()));
        payload.insert("messages".to_owned(), serde_json::to_value(&self.messages)?);
        if self.stream {
            payload.insert("stream".to_owned(), Value::Bool(true));
        }
        if let Some(reasoning) = &self.reasoning {
            payload.insert("reasoning".to_owned(), serde_json::to_value(reasoning)?);
        }

        for (key, value) in &self.extra_body {
            payload.insert(key.clone(), value.clone());
        }
        for (key, value) in &self.provider_options {
            payload.insert(key.clone(), value.clone());
        }

        Ok(Value::Object(payload))
    }
}

/// Options bag accepted by the chat helpers. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOptions {
    pub reasoning: Option<ReasoningConfig>,
    pub extra_body: Map<String, Value>,
    pub stream: bool,
    pub provider_options: Map<String, Value>,
}

impl ChatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts a [`ReasoningConfig`] or a raw mapping.
    pub fn with_reasoning(mut self, reasoning: impl Into<ReasoningConfig>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    pub fn with_extra_body(mut self, extra_body: Map<String, Value>) -> Self {
        self.extra_body = extra_body;
        self
    }

    pub fn insert_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_body.insert(key.into(), value.into());
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn with_provider_options(mut self, provider_options: Map<String, Value>) -> Self {
        self.provider_options = provider_options;
        self
    }

    pub fn insert_provider_option(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.provider_options.insert(key.into(), value.into());
        self
    }
}

/// Conversation input for the chat helpers.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatMessages {
    /// A single user turn.
    Text(String),
    Messages(Vec<Message>),
    /// Raw `{role, content}` mappings, converted with [`Message::from_value`].
    Raw(Vec<Value>),
}

impl ChatMessages {
    pub fn into_messages(self) -> Result<Vec<Message>, OpenRouterError> {
        match self {
            Self::Text(text) => Ok(vec![Message::user(text)]),
            Self::Messages(messages) => Ok(messages),
            Self::Raw(values) => values.iter().map(Message::from_value).collect(),
        }
    }
}

impl From<&str> for ChatMessages {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ChatMessages {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Message> for ChatMessages {
    fn from(value: Message) -> Self {
        Self::Messages(vec![value])
    }
}

impl From<Vec<Message>> for ChatMessages {
    fn from(value: Vec<Message>) -> Self {
        Self::Messages(value)
    }
}

impl From<&[Message]> for ChatMessages {
    fn from(value: &[Message]) -> Self {
        Self::Messages(value.to_vec())
    }
}

impl From<Vec<Value>> for ChatMessages {
    fn from(value: Vec<Value>) -> Self {
        Self::Raw(value)
    }
}

fn object_or_empty(value: Option<&Value>) -> Map<String, Value> {
    value
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
