//! Server-Sent Events (SSE) streaming parser.
//!
//! Gemini's `streamGenerateContent?alt=sse` endpoint delivers one JSON
//! response per event. The parser works over any `AsyncBufRead`, so it is
//! driven by a reqwest body in production and by byte slices in tests.

use futures_util::stream::{self, BoxStream, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::AiError;

/// A single SSE event parsed from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// The event type, when the server names one.
    pub event: Option<String>,
    /// The event data; multiple `data:` lines are joined with `\n`.
    pub data: String,
}

struct ParserState<R> {
    lines: Lines<R>,
    event: Option<String>,
    data: String,
    finished: bool,
}

impl<R> ParserState<R> {
    /// Feed one line; returns a completed event on the blank separator line.
    fn push_line(&mut self, line: &str) -> Option<SseEvent> {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            let event = self.event.take();
            if self.data.is_empty() {
                return None;
            }
            return Some(SseEvent {
                event,
                data: std::mem::take(&mut self.data),
            });
        }

        if let Some(event_type) = field_value(line, "event") {
            self.event = Some(event_type.to_string());
        } else if let Some(data) = field_value(line, "data") {
            if !self.data.is_empty() {
                self.data.push('\n');
            }
            self.data.push_str(data);
        }
        // Ignore other fields (id:, retry:, comments)
        None
    }

    fn flush(&mut self) -> Option<SseEvent> {
        if self.data.is_empty() {
            return None;
        }
        Some(SseEvent {
            event: self.event.take(),
            data: std::mem::take(&mut self.data),
        })
    }
}

fn field_value<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(name)?.strip_prefix(':')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

/// Parse an SSE byte stream into events, pulled one at a time.
pub fn sse_events<R>(reader: R) -> BoxStream<'static, Result<SseEvent, AiError>>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let state = ParserState {
        lines: reader.lines(),
        event: None,
        data: String::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        if state.finished {
            return None;
        }
        loop {
            match state.lines.next_line().await {
                Ok(Some(line)) => {
                    if let Some(event) = state.push_line(&line) {
                        return Some((Ok(event), state));
                    }
                }
                Ok(None) => {
                    state.finished = true;
                    let last = state.flush();
                    return last.map(|event| (Ok(event), state));
                }
                Err(e) => {
                    state.finished = true;
                    return Some((Err(AiError::Network(e.to_string())), state));
                }
            }
        }
    })
    .boxed()
}

/// Adapt an SSE stream of JSON payloads into decoded JSON values.
pub fn json_events<R>(reader: R) -> BoxStream<'static, Result<serde_json::Value, AiError>>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    sse_events(reader)
        .filter_map(|event| async move {
            match event {
                Ok(event) if event.data.trim() == "[DONE]" => None,
                Ok(event) => Some(
                    serde_json::from_str(&event.data).map_err(|e| AiError::Parse(e.to_string())),
                ),
                Err(e) => Some(Err(e)),
            }
        })
        .boxed()
}
