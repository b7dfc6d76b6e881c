use std::error::Error as StdError;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Message used when an error body carries no `error.message`.
pub const UNKNOWN_API_ERROR: &str = "Unknown API error";

pub type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Error)]
pub enum OpenRouterError {
    /// The remote side rejected the request or answered with an unusable body.
    #[error("{message}")]
    Api {
        message: String,
        code: i64,
        details: Option<Value>,
    },
    /// Transport fault before an application response was obtainable.
    #[error("Network error occurred: {message}")]
    Network {
        message: String,
        #[source]
        cause: BoxError,
    },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    #[error("request was cancelled")]
    Cancelled,
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl OpenRouterError {
    pub fn api(message: impl Into<String>, code: i64, details: Option<Value>) -> Self {
        Self::Api {
            message: message.into(),
            code,
            details,
        }
    }

    pub fn network(cause: impl Into<BoxError>) -> Self {
        let cause = cause.into();
        Self::Network {
            message: cause.to_string(),
            cause,
        }
    }

    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Numeric API error code, when this is an [`OpenRouterError::Api`].
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Structured `error` object returned by the API, if any.
    pub fn details(&self) -> Option<&Value> {
        match self {
            Self::Api { details, .. } => details.as_ref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for OpenRouterError {
    fn from(error: reqwest::Error) -> Self {
        Self::network(error)
    }
}

/// Classify an error response body into [`OpenRouterError::Api`].
///
/// `error.message` (or a bare string `error`) becomes the message, `error.code`
/// the code when it is an integer, and the whole `error` value the details.
/// Missing pieces fall back to [`UNKNOWN_API_ERROR`] and the HTTP status.
pub fn parse_api_error(status: StatusCode, body: &str) -> OpenRouterError {
    let fallback_code = i64::from(status.as_u16());
    let error = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|mut value| value.get_mut("error").map(Value::take))
        .filter(|error| !error.is_null());

    let Some(error) = error else {
        return OpenRouterError::api(UNKNOWN_API_ERROR, fallback_code, None);
    };

    let message = match &error {
        Value::String(message) => Some(message.clone()),
        Value::Object(fields) => fields
            .get("message")
            .and_then(Value::as_str)
            .map(ToString::to_string),
        _ => None,
    }
    .unwrap_or_else(|| UNKNOWN_API_ERROR.to_string());

    let code = error
        .get("code")
        .and_then(error_code)
        .unwrap_or(fallback_code);

    OpenRouterError::api(message, code, Some(error))
}

fn error_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
