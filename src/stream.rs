use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::{self, BoxStream};
use futures_util::{Stream, StreamExt};
use tracing::debug;

use crate::error::OpenRouterError;
use crate::events::{StreamEvent, TextAccumulator};
use crate::sse::SseStreamParser;

/// Optional cancellation signal shared between the caller and a running stream.
pub type CancellationSignal = Arc<AtomicBool>;

/// Byte chunks of a response body, in arrival order.
pub type ByteSource = BoxStream<'static, Result<Bytes, OpenRouterError>>;

const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Pull-based sequence of decoded SSE events.
///
/// Reads from the byte source only when no complete event is buffered. The
/// source (and with it the HTTP connection) is dropped as soon as the stream
/// ends, hits the `[DONE]` sentinel, fails, is cancelled, or is itself dropped.
pub struct EventStream {
    source: Option<ByteSource>,
    parser: SseStreamParser,
    cancellation: Option<CancellationSignal>,
    idle_timeout: Option<Duration>,
}

impl std::fmt::Debug for EventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream")
            .field("open", &self.source.is_some())
            .field("parser", &self.parser)
            .field("idle_timeout", &self.idle_timeout)
            .finish()
    }
}

impl EventStream {
    pub fn new(source: ByteSource) -> Self {
        Self {
            source: Some(source),
            parser: SseStreamParser::default(),
            cancellation: None,
            idle_timeout: None,
        }
    }

    /// Wrap any stream of byte chunks.
    pub fn from_byte_stream<S, B, E>(source: S) -> Self
    where
        S: Stream<Item = Result<B, E>> + Send + 'static,
        B: Into<Bytes>,
        E: Into<OpenRouterError>,
    {
        Self::new(
            source
                .map(|chunk| {
                    chunk
                        .map(Into::<Bytes>::into)
                        .map_err(Into::<OpenRouterError>::into)
                })
                .boxed(),
        )
    }

    pub fn with_cancellation(mut self, cancellation: CancellationSignal) -> Self {
        self.cancellation = Some(cancellation);
        self
    }

    /// Fail with a network error when no chunk arrives within `timeout`.
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    /// Whether the byte source is still held.
    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    /// Pull the next event. `None` means the stream is over; an error also
    /// ends the stream.
    pub async fn next_event(&mut self) -> Option<Result<StreamEvent, OpenRouterError>> {
        loop {
            if self.source.is_some() && is_cancelled(self.cancellation.as_ref()) {
                self.release("cancelled");
                return Some(Err(OpenRouterError::Cancelled));
            }

            if let Some(event) = self.parser.next_event() {
                return Some(Ok(event));
            }
            if self.parser.is_done() {
                self.release("done sentinel");
                return None;
            }
            if self.source.is_none() {
                return None;
            }

            match self.read_chunk().await {
                Ok(Some(chunk)) => self.parser.push(&chunk),
                Ok(None) => {
                    self.release("source exhausted");
                    return self.parser.finish().map(Ok);
                }
                Err(error) => {
                    self.release("read failed");
                    return Some(Err(error));
                }
            }
        }
    }

    /// Adapt into a [`Stream`] of events.
    pub fn into_stream(self) -> impl Stream<Item = Result<StreamEvent, OpenRouterError>> + Send {
        stream::unfold(self, |mut events| async move {
            let item = events.next_event().await?;
            Some((item, events))
        })
    }

    /// Drain the stream and concatenate every text delta.
    pub async fn collect_text(mut self) -> Result<String, OpenRouterError> {
        let mut accumulator = TextAccumulator::default();
        while let Some(event) = self.next_event().await {
            accumulator.push(&event?);
        }
        Ok(accumulator.text)
    }

    async fn read_chunk(&mut self) -> Result<Option<Bytes>, OpenRouterError> {
        let Self {
            source,
            cancellation,
            idle_timeout,
            ..
        } = self;
        let Some(source) = source.as_mut() else {
            return Ok(None);
        };

        let next = match idle_timeout {
            Some(limit) => {
                let limit = *limit;
                let read = tokio::time::timeout(limit, source.next());
                await_or_cancel(read, cancellation.as_ref())
                    .await?
                    .map_err(|elapsed| OpenRouterError::Network {
                        message: format!("no stream data received within {limit:?}"),
                        cause: Box::new(elapsed),
                    })?
            }
            None => await_or_cancel(source.next(), cancellation.as_ref()).await?,
        };

        next.transpose()
    }

    fn release(&mut self, reason: &'static str) {
        if self.source.take().is_some() {
            debug!(reason, "closing event stream");
        }
    }
}

pub(crate) fn is_cancelled(cancel: Option<&CancellationSignal>) -> bool {
    cancel.is_some_and(|token| token.load(Ordering::Acquire))
}

pub(crate) async fn await_or_cancel<F>(
    future: F,
    cancellation: Option<&CancellationSignal>,
) -> Result<F::Output, OpenRouterError>
where
    F: Future,
{
    if cancellation.is_none() {
        return Ok(future.await);
    }

    let mut future = Box::pin(future);

    loop {
        if is_cancelled(cancellation) {
            return Err(OpenRouterError::Cancelled);
        }

        if let Ok(output) = tokio::time::timeout(CANCEL_POLL_INTERVAL, &mut future).await {
            if is_cancelled(cancellation) {
                return Err(OpenRouterError::Cancelled);
            }
            return Ok(output);
        }
    }
}
