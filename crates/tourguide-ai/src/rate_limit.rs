//! Sliding-log rate limiter.
//!
//! Every admitted dispatch attempt leaves its instant in the session's log.
//! Before counting, entries at least one window old are purged, so the log
//! only ever holds instants inside the trailing window. The count is exact:
//! there is no burst credit beyond the ceiling.

use std::time::{Duration, Instant};

use crate::session::ConversationState;

pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiter {
    ceiling: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(ceiling: usize) -> Self {
        Self {
            ceiling,
            window: DEFAULT_WINDOW,
        }
    }

    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admit or reject an attempt at `now`.
    ///
    /// A rejected attempt leaves the log untouched apart from the purge, so
    /// it does not count against later attempts.
    pub fn check(&self, state: &mut ConversationState, now: Instant) -> bool {
        let log = &mut state.request_timestamps;
        while let Some(&oldest) = log.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                log.pop_front();
            } else {
                break;
            }
        }

        if log.len() >= self.ceiling {
            return false;
        }
        log.push_back(now);
        true
    }

    /// Time until the oldest logged attempt leaves the window.
    pub fn retry_after(&self, state: &ConversationState, now: Instant) -> Option<Duration> {
        if state.request_timestamps.len() < self.ceiling {
            return None;
        }
        let oldest = *state.request_timestamps.front()?;
        Some(self.window.saturating_sub(now.saturating_duration_since(oldest)))
    }
}
