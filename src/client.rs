use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::OpenRouterConfig;
use crate::error::{parse_api_error, OpenRouterError};
use crate::headers::build_headers;
use crate::request::{ChatMessages, ChatOptions, ResponsesRequest};
use crate::response::Response;
use crate::stream::{await_or_cancel, CancellationSignal, EventStream};
use crate::url::{resolve_endpoint, RESPONSES_PATH};

/// Client for the OpenRouter responses endpoint.
///
/// Holds only immutable configuration; every call is an independent request.
/// Errors are returned as they happen, nothing is retried.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    http: Client,
    config: OpenRouterConfig,
}

impl OpenRouterClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, OpenRouterError> {
        Self::from_config(OpenRouterConfig::new(api_key))
    }

    /// Like [`OpenRouterClient::new`] with an optional base URL override.
    pub fn new_with_base_url(
        api_key: impl Into<String>,
        base_url: Option<&str>,
    ) -> Result<Self, OpenRouterError> {
        let mut config = OpenRouterConfig::new(api_key);
        if let Some(base_url) = base_url {
            config = config.with_base_url(base_url);
        }
        Self::from_config(config)
    }

    pub fn from_config(config: OpenRouterConfig) -> Result<Self, OpenRouterError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let http = builder.build().map_err(OpenRouterError::from)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &OpenRouterConfig {
        &self.config
    }

    pub fn endpoint(&self, path: &str) -> String {
        resolve_endpoint(&self.config.base_url, path)
    }

    pub fn build_headers(&self, stream: bool) -> Result<HeaderMap, OpenRouterError> {
        let headers = build_headers(&self.config, stream)?;
        let mut out = HeaderMap::new();
        for (key, value) in headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| invalid_header("invalid header key", &key))?;
            let value = HeaderValue::from_str(&value)
                .map_err(|_| invalid_header("invalid header value for", &key))?;
            out.insert(name, value);
        }
        Ok(out)
    }

    /// Build the POST for `path`. Only non-streaming requests get the total
    /// timeout; streams may run as long as chunks keep arriving.
    pub fn build_request(
        &self,
        path: &str,
        payload: &Value,
        stream: bool,
    ) -> Result<reqwest::RequestBuilder, OpenRouterError> {
        let headers = self.build_headers(stream)?;
        let mut builder = self
            .http
            .post(self.endpoint(path))
            .headers(headers)
            .json(payload);
        if !stream {
            if let Some(timeout) = self.config.timeout {
                builder = builder.timeout(timeout);
            }
        }
        Ok(builder)
    }

    /// POST a JSON body and decode the JSON answer.
    pub async fn post(&self, path: &str, payload: &Value) -> Result<Value, OpenRouterError> {
        let response = self.build_request(path, payload, false)?.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(path, status = status.as_u16(), "received response");

        if status.as_u16() >= 400 {
            warn!(path, status = status.as_u16(), "error status from API");
            return Err(parse_api_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|error| {
            OpenRouterError::api(format!("Invalid JSON response from API: {error}"), 0, None)
        })
    }

    /// POST a JSON body and expose the answer as an SSE [`EventStream`].
    ///
    /// Error statuses are read and classified here, before any event is produced.
    pub async fn post_stream(
        &self,
        path: &str,
        payload: &Value,
        cancellation: Option<&CancellationSignal>,
    ) -> Result<EventStream, OpenRouterError> {
        let request = self.build_request(path, payload, true)?;
        let response = await_or_cancel(request.send(), cancellation).await??;
        let status = response.status();
        debug!(path, status = status.as_u16(), "stream opened");

        if status.as_u16() >= 400 {
            let body = await_or_cancel(response.text(), cancellation).await??;
            warn!(path, status = status.as_u16(), "error status from API");
            return Err(parse_api_error(status, &body));
        }

        let mut events = EventStream::from_byte_stream(response.bytes_stream());
        if let Some(cancellation) = cancellation {
            events = events.with_cancellation(cancellation.clone());
        }
        if let Some(idle) = self.config.stream_idle_timeout {
            events = events.with_idle_timeout(idle);
        }
        Ok(events)
    }

    /// Send a fully built request to the responses endpoint.
    pub async fn responses(&self, request: &ResponsesRequest) -> Result<Response, OpenRouterError> {
        request.validate()?;
        debug!(
            model = request.model(),
            messages = request.messages().len(),
            stream = request.is_stream(),
            "sending responses request"
        );
        let payload = request.to_payload()?;
        let value = self.post(RESPONSES_PATH, &payload).await?;
        Ok(Response::from_value(value))
    }

    /// Stream a fully built request; the payload always carries `stream: true`.
    pub async fn responses_stream(
        &self,
        request: &ResponsesRequest,
        cancellation: Option<&CancellationSignal>,
    ) -> Result<EventStream, OpenRouterError> {
        request.validate()?;
        let request = request.clone().with_stream(true);
        debug!(
            model = request.model(),
            messages = request.messages().len(),
            "sending streaming responses request"
        );
        let payload = request.to_payload()?;
        self.post_stream(RESPONSES_PATH, &payload, cancellation)
            .await
    }

    /// One-call chat: `messages` is a single user string or a list of messages.
    pub async fn chat(
        &self,
        model: &str,
        messages: impl Into<ChatMessages>,
        options: ChatOptions,
    ) -> Result<Response, OpenRouterError> {
        let request = chat_request(model, messages, options)?;
        self.responses(&request).await
    }

    /// Streaming counterpart of [`OpenRouterClient::chat`]; `options.stream` is ignored.
    pub async fn chat_stream(
        &self,
        model: &str,
        messages: impl Into<ChatMessages>,
        options: ChatOptions,
    ) -> Result<EventStream, OpenRouterError> {
        let request = chat_request(model, messages, options)?;
        self.responses_stream(&request, None).await
    }

    /// [`OpenRouterClient::chat_stream`] that stops once `cancellation` is set.
    pub async fn chat_stream_with_cancellation(
        &self,
        model: &str,
        messages: impl Into<ChatMessages>,
        options: ChatOptions,
        cancellation: &CancellationSignal,
    ) -> Result<EventStream, OpenRouterError> {
        let request = chat_request(model, messages, options)?;
        self.responses_stream(&request, Some(cancellation)).await
    }
}

fn invalid_header(context: &str, key: &str) -> OpenRouterError {
    OpenRouterError::InvalidHeader(format!("{context}: {key}"))
}

fn chat_request(
    model: &str,
    messages: impl Into<ChatMessages>,
    options: ChatOptions,
) -> Result<ResponsesRequest, OpenRouterError> {
    let messages = messages.into().into_messages()?;
    Ok(ResponsesRequest::from_options(model, messages, options))
}
