use memchr::memchr;
use serde_json::Value;
use tracing::{debug, trace};

use crate::events::StreamEvent;

pub const DATA_PREFIX: &str = "data: ";
pub const DONE_SENTINEL: &str = "[DONE]";

/// Incremental line-oriented parser for SSE byte streams.
///
/// Bytes are buffered until a full line is available, so chunk boundaries may
/// fall anywhere, including inside a multi-byte character. Only `data: ` lines
/// produce events; undecodable payloads are dropped. After a `data: [DONE]`
/// line the parser is finished and ignores everything else.
#[derive(Debug, Default)]
pub struct SseStreamParser {
    buffer: Vec<u8>,
    /// Start of the unconsumed bytes in `buffer`.
    cursor: usize,
    done: bool,
}

enum Line {
    Event(StreamEvent),
    Done,
    Skip,
}

impl SseStreamParser {
    /// Append raw bytes without decoding anything.
    ///
    /// Consumed lines are compacted away here, once per chunk.
    pub fn push(&mut self, bytes: &[u8]) {
        if self.done {
            return;
        }
        if self.cursor > 0 {
            self.buffer.drain(..self.cursor);
            self.cursor = 0;
        }
        self.buffer.extend_from_slice(bytes);
    }

    /// Decode the next event from complete buffered lines.
    ///
    /// Returns `None` when more bytes are needed or the sentinel was seen.
    pub fn next_event(&mut self) -> Option<StreamEvent> {
        while !self.done {
            let pending = &self.buffer[self.cursor..];
            let newline = memchr(b'\n', pending)?;
            let line = process_line(&pending[..newline]);
            self.cursor += newline + 1;
            match line {
                Line::Event(event) => return Some(event),
                Line::Done => self.mark_done(),
                Line::Skip => {}
            }
        }
        None
    }

    /// Treat the remaining partial line as final once the source is exhausted.
    pub fn finish(&mut self) -> Option<StreamEvent> {
        if let Some(event) = self.next_event() {
            return Some(event);
        }
        if self.done || self.cursor >= self.buffer.len() {
            return None;
        }

        let line = process_line(&self.buffer[self.cursor..]);
        self.buffer.clear();
        self.cursor = 0;
        match line {
            Line::Event(event) => Some(event),
            Line::Done => {
                self.mark_done();
                None
            }
            Line::Skip => None,
        }
    }

    /// Feed arbitrary bytes into the parser and drain complete events.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<StreamEvent> {
        self.push(bytes);
        std::iter::from_fn(|| self.next_event()).collect()
    }

    /// Parse a complete SSE payload string in one shot, including a trailing
    /// line without newline.
    pub fn parse_frames(input: &str) -> Vec<StreamEvent> {
        let mut parser = Self::default();
        let mut events = parser.feed(input.as_bytes());
        events.extend(parser.finish());
        events
    }

    /// Whether the `[DONE]` sentinel has been seen.
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn is_empty_buffer(&self) -> bool {
        self.buffer[self.cursor..]
            .iter()
            .all(u8::is_ascii_whitespace)
    }

    fn mark_done(&mut self) {
        debug!("SSE stream reached [DONE] sentinel");
        self.done = true;
        self.buffer.clear();
        self.cursor = 0;
    }
}

fn process_line(raw: &[u8]) -> Line {
    let decoded = String::from_utf8_lossy(raw);
    let line = decoded.trim_end();
    if line.is_empty() {
        return Line::Skip;
    }

    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        trace!(line, "ignoring non-data SSE line");
        return Line::Skip;
    };

    if payload.trim() == DONE_SENTINEL {
        return Line::Done;
    }

    match serde_json::from_str::<Value>(payload) {
        Ok(Value::Null) => Line::Skip,
        Ok(value) => Line::Event(StreamEvent::new(value)),
        Err(error) => {
            debug!(%error, "dropping malformed SSE frame");
            Line::Skip
        }
    }
}
