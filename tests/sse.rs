use openrouter_client::{SseStreamParser, StreamEvent};
use serde_json::{json, Value};

const TRANSCRIPT: &str = concat!(
    ": keep-alive comment\n",
    "data: {\"output_text_delta\":\"Hel\"}\r\n",
    "\n",
    "event: message\n",
    "data: {\"choices\":[{\"delta\":{\"content\":\"ló wörld\"}}]}\n",
    "data: {broken\n",
    "data: {\"output\":[{\"content\":[{\"text\":\"!\"}]}]}\n",
    "data: [DONE]\n",
    "data: {\"after\":\"done\"}\n",
);

fn values(events: Vec<StreamEvent>) -> Vec<Value> {
    events.into_iter().map(StreamEvent::into_value).collect()
}

fn parse_in_chunks(bytes: &[u8], size: usize) -> Vec<Value> {
    let mut parser = SseStreamParser::default();
    let mut events = Vec::new();
    for chunk in bytes.chunks(size) {
        events.extend(parser.feed(chunk));
    }
    events.extend(parser.finish());
    values(events)
}

#[test]
fn sse_framing_yields_data_lines_until_done() {
    let events = values(SseStreamParser::parse_frames(TRANSCRIPT));
    assert_eq!(
        events,
        vec![
            json!({"output_text_delta": "Hel"}),
            json!({"choices": [{"delta": {"content": "ló wörld"}}]}),
            json!({"output": [{"content": [{"text": "!"}]}]}),
        ]
    );
}

#[test]
fn sse_events_are_independent_of_chunk_boundaries() {
    let expected = values(SseStreamParser::parse_frames(TRANSCRIPT));
    let bytes = TRANSCRIPT.as_bytes();
    for size in 1..=bytes.len() {
        assert_eq!(parse_in_chunks(bytes, size), expected, "chunk size {size}");
    }
}

#[test]
fn sse_parser_drops_malformed_frame_and_keeps_going() {
    let frames = "data: {not valid json\ndata: {\"x\":1}\n";
    let events = values(SseStreamParser::parse_frames(frames));
    assert_eq!(events, vec![json!({"x": 1})]);
}

#[test]
fn sse_parser_handles_split_payload_incrementally() {
    let mut parser = SseStreamParser::default();
    assert!(parser.feed(b"data: {\"output_text_delta\":\"ab").is_empty());
    assert!(!parser.is_empty_buffer());
    let events = parser.feed(b"c\"}\n");
    assert_eq!(values(events), vec![json!({"output_text_delta": "abc"})]);
    assert!(parser.is_empty_buffer());
}

#[test]
fn sse_parser_flushes_trailing_line_without_newline() {
    let mut parser = SseStreamParser::default();
    assert!(parser.feed(b"data: {\"x\":2}  ").is_empty());
    assert_eq!(
        parser.finish().map(StreamEvent::into_value),
        Some(json!({"x": 2}))
    );
    assert!(parser.finish().is_none());
}

#[test]
fn sse_parser_honours_trailing_done_without_newline() {
    let mut parser = SseStreamParser::default();
    parser.push(b"data:  [DONE] ");
    assert!(parser.finish().is_none());
    assert!(parser.is_done());
}

#[test]
fn sse_parser_requires_data_prefix_with_space() {
    let events = SseStreamParser::parse_frames("data:{\"x\":1}\nid: 4\nretry: 10\n");
    assert!(events.is_empty());
}
