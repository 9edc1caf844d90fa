//! Two-tier dispatch: a streaming attempt, then at most one non-streaming
//! fallback.
//!
//! The streaming attempt delivers partial text to the caller as it
//! arrives. If it fails, times out, or ends without usable text, the same
//! request is issued once without streaming. A fault of that fallback is
//! reported as `TransportError` and never retried here.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::time::{timeout_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cleanup::clean_answer;
use crate::decode::{self, Decoded};
use crate::{AiError, GenerationClient, GenerationRequest, GenerationResult};

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// How the streaming attempt ended.
#[derive(Debug)]
enum StreamOutcome {
    Text(String),
    Blocked(String),
    /// Failed, timed out, or produced no usable text: eligible for fallback.
    NoText,
    Cancelled,
}

pub struct Dispatcher {
    client: Arc<dyn GenerationClient>,
    call_timeout: Duration,
    artifacts: Vec<String>,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self {
            client,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            artifacts: Vec::new(),
        }
    }

    /// Deadline applied separately to the streaming call and to the fallback.
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Literal strings stripped from successful answers.
    pub fn with_artifacts(mut self, artifacts: Vec<String>) -> Self {
        self.artifacts = artifacts;
        self
    }

    /// Produce a final result for `request`.
    ///
    /// `on_partial` receives the accumulated text after every chunk that
    /// added text, so each call sees a strictly longer string than the last.
    /// Cancelling `cancel` drops the open connection and returns
    /// `TransportError` without a fallback.
    pub async fn dispatch<F>(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
        mut on_partial: F,
    ) -> GenerationResult
    where
        F: FnMut(&str) + Send,
    {
        match self.stream_attempt(request, cancel, &mut on_partial).await {
            StreamOutcome::Text(text) => GenerationResult::Success { text },
            StreamOutcome::Blocked(reason) => {
                info!(%reason, "Streaming response blocked by provider");
                GenerationResult::Blocked { reason }
            }
            StreamOutcome::Cancelled => cancelled(),
            StreamOutcome::NoText => {
                debug!("Falling back to non-streaming call");
                self.fallback(request, cancel).await
            }
        }
    }

    async fn stream_attempt(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
        on_partial: &mut (dyn FnMut(&str) + Send),
    ) -> StreamOutcome {
        let deadline = Instant::now() + self.call_timeout;

        let opened = tokio::select! {
            biased;
            _ = cancel.cancelled() => return StreamOutcome::Cancelled,
            opened = timeout_at(deadline, self.client.generate_stream(request)) => opened,
        };
        let mut stream = match opened {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                warn!(error = %e, "Streaming call failed to open");
                return StreamOutcome::NoText;
            }
            Err(_) => {
                warn!(timeout = ?self.call_timeout, "Streaming call timed out before first byte");
                return StreamOutcome::NoText;
            }
        };

        let mut accumulated = String::new();
        let mut block = None;
        let mut chunks = 0usize;

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(chunks, "Streaming call cancelled by caller");
                    return StreamOutcome::Cancelled;
                }
                next = timeout_at(deadline, stream.next()) => next,
            };

            match next {
                Ok(Some(Ok(chunk))) => {
                    chunks += 1;
                    if let Some(text) = decode::extract_text(&chunk) {
                        accumulated.push_str(&text);
                        on_partial(&accumulated);
                    } else if accumulated.is_empty() && block.is_none() {
                        block = decode::block_reason(&chunk);
                    }
                }
                Ok(Some(Err(e))) => {
                    warn!(error = %e, chunks, "Streaming call failed mid-stream");
                    return StreamOutcome::NoText;
                }
                Ok(None) => break,
                Err(_) => {
                    warn!(timeout = ?self.call_timeout, chunks, "Streaming call timed out");
                    return StreamOutcome::NoText;
                }
            }
        }

        debug!(chunks, chars = accumulated.len(), "Stream finished");
        // Judge emptiness after cleanup: an artifact-only stream still falls back.
        let text = clean_answer(&accumulated, &self.artifacts);
        if !text.is_empty() {
            StreamOutcome::Text(text)
        } else if let Some(reason) = block {
            StreamOutcome::Blocked(reason)
        } else {
            StreamOutcome::NoText
        }
    }

    async fn fallback(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> GenerationResult {
        let deadline = Instant::now() + self.call_timeout;

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return cancelled(),
            response = timeout_at(deadline, self.client.generate(request)) => response,
        };

        match response {
            Ok(Ok(payload)) => match decode::decode_response(&payload) {
                Decoded::Text(text) => self.finish(text),
                Decoded::Blocked(reason) => {
                    info!(%reason, "Response blocked by provider");
                    GenerationResult::Blocked { reason }
                }
                Decoded::Empty => {
                    warn!("Provider returned no text");
                    GenerationResult::Empty
                }
            },
            Ok(Err(e)) => {
                warn!(error = %e, "Fallback call failed");
                GenerationResult::TransportError {
                    detail: e.to_string(),
                }
            }
            Err(_) => {
                warn!(timeout = ?self.call_timeout, "Fallback call timed out");
                GenerationResult::TransportError {
                    detail: AiError::Timeout.to_string(),
                }
            }
        }
    }

    fn finish(&self, text: String) -> GenerationResult {
        let text = clean_answer(&text, &self.artifacts);
        if text.is_empty() {
            GenerationResult::Empty
        } else {
            GenerationResult::Success { text }
        }
    }
}

fn cancelled() -> GenerationResult {
    GenerationResult::TransportError {
        detail: AiError::Cancelled.to_string(),
    }
}

#[cfg(test)]
mod tests;
