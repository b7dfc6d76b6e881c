//! Client for the OpenRouter `/api/v1/responses` endpoint.
//!
//! Requests are typed value objects; answers are normalized into one
//! [`Response`] shape whether the provider used the legacy `choices` layout, the
//! block structured `output` layout or a flat `output_text`.
//!
//! Streaming calls return an [`EventStream`]: a pull-based sequence of decoded
//! SSE `data:` payloads that ends at the `[DONE]` sentinel. Malformed frames are
//! dropped instead of failing the stream. Use [`StreamEvent::text_delta`] to
//! pull the incremental text out of any supported event shape.
//!
//! # Example
//! ```no_run
//! use openrouter_client::{ChatOptions, OpenRouterClient};
//!
//! # async fn run() -> Result<(), openrouter_client::OpenRouterError> {
//! let client = OpenRouterClient::new("sk-or-...")?;
//! let response = client
//!     .chat("openai/gpt-4o", "Say hi", ChatOptions::default())
//!     .await?;
//! println!("{}", response.content().unwrap_or_default());
//!
//! let mut events = client
//!     .chat_stream("openai/gpt-4o", "Count to 5", ChatOptions::default())
//!     .await?;
//! while let Some(event) = events.next_event().await {
//!     if let Some(delta) = event?.text_delta() {
//!         print!("{delta}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod headers;
pub mod request;
pub mod response;
pub mod sse;
pub mod stream;
pub mod url;

pub use client::OpenRouterClient;
pub use config::OpenRouterConfig;
pub use error::{parse_api_error, OpenRouterError};
pub use events::{StreamEvent, TextAccumulator};
pub use request::{
    ChatMessages, ChatOptions, Message, MessageContent, ReasoningConfig, ReasoningEffort,
    ResponsesRequest,
};
pub use response::{normalize_raw_content, stringify_content, Choice, Response, Usage};
pub use sse::SseStreamParser;
pub use stream::{ByteSource, CancellationSignal, EventStream};
pub use url::resolve_endpoint;
