//! Generation provider settings.

use serde::{Deserialize, Serialize};

/// Text-generation endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub model: String,
    /// Upper bound on generated tokens; `None` leaves the provider default.
    pub max_output_tokens: Option<u32>,
    /// Deadline for the streaming call and for the fallback call (valid range: 1-300).
    pub timeout_secs: u32,
    /// Overrides the Generative Language API base URL (tests, proxies).
    pub base_url: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".into(),
            max_output_tokens: None,
            timeout_secs: 30,
            base_url: None,
            api_key_env: "GEMINI_API_KEY".into(),
        }
    }
}
