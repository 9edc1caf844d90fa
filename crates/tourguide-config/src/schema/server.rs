//! Chat endpoint settings.

use serde::{Deserialize, Serialize};

/// WebSocket listener and session lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Sessions idle longer than this are destroyed (valid range: 60-86400).
    pub session_idle_secs: u32,
    /// How long a new connection may take to send its hello.
    pub hello_timeout_secs: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 8080,
            session_idle_secs: 1800,
            hello_timeout_secs: 10,
        }
    }
}
