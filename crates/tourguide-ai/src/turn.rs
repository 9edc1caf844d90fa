//! One visitor turn: rate check, dispatch, record.
//!
//! `Idle -> RateCheck -> {Rejected | Dispatching} -> result -> Recorded`.
//! Only a successful answer is written to history; rejected and failed
//! turns leave the conversation untouched and are rendered by the caller.

use std::time::Instant;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::dispatcher::Dispatcher;
use crate::rate_limit::RateLimiter;
use crate::session::ConversationState;
use crate::{GenerationRequest, GenerationResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Over the rate ceiling; no provider call was made.
    Rejected { retry_after_secs: u64 },
    Completed(GenerationResult),
}

pub struct TurnRunner {
    dispatcher: Dispatcher,
    limiter: RateLimiter,
}

impl TurnRunner {
    pub fn new(dispatcher: Dispatcher, limiter: RateLimiter) -> Self {
        Self {
            dispatcher,
            limiter,
        }
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub async fn run<F>(
        &self,
        state: &Mutex<ConversationState>,
        request: &GenerationRequest,
        cancel: &CancellationToken,
        on_partial: F,
    ) -> TurnOutcome
    where
        F: FnMut(&str) + Send,
    {
        // Purge, count and append under one lock so two in-flight requests
        // cannot both take the last slot.
        let rejected = {
            let mut guard = state.lock().await;
            let now = Instant::now();
            if self.limiter.check(&mut guard, now) {
                None
            } else {
                Some(
                    self.limiter
                        .retry_after(&guard, now)
                        .map(|d| d.as_secs().max(1))
                        .unwrap_or(1),
                )
            }
        };
        if let Some(retry_after_secs) = rejected {
            info!(retry_after_secs, "Turn rejected by rate limit");
            return TurnOutcome::Rejected { retry_after_secs };
        }

        let result = self.dispatcher.dispatch(request, cancel, on_partial).await;
        debug!(status = result.status(), "Dispatch finished");

        if let GenerationResult::Success { text } = &result {
            state.lock().await.record_turn(request.user_text(), text.as_str());
        }
        TurnOutcome::Completed(result)
    }
}
