//! Per-session request ceiling.

use serde::{Deserialize, Serialize};

/// Sliding-log rate limit applied before any provider call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Dispatch attempts admitted per window (valid range: 1-100).
    pub max_requests_per_window: u32,
    /// Window length in seconds (valid range: 1-3600).
    pub window_secs: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests_per_window: 5,
            window_secs: 60,
        }
    }
}
