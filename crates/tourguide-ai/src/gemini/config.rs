//! Gemini API client configuration.

use std::time::Duration;

use crate::AiError;

pub(crate) const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini API client configuration.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    /// Deadline for a whole non-streaming request.
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: GEMINI_API_BASE.to_string(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Read the API key from `var`, falling back to `GOOGLE_API_KEY`.
    pub fn from_env(var: &str) -> Result<Self, AiError> {
        [var, "GOOGLE_API_KEY"]
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()))
            .map(|key| Self::new(key.trim()))
            .ok_or_else(|| {
                AiError::Auth(format!(
                    "Gemini API not configured. Set {var} (or GOOGLE_API_KEY)."
                ))
            })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_key() {
        let config = GeminiConfig::new("super-secret");
        let dbg = format!("{config:?}");
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("[REDACTED]"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = GeminiConfig::new("k").with_base_url("http://localhost:9000/models/");
        assert_eq!(config.base_url, "http://localhost:9000/models");
    }

    #[test]
    fn from_env_reports_missing_key() {
        let err = GeminiConfig::from_env("TOURGUIDE_TEST_UNSET_KEY_VAR");
        if std::env::var("GOOGLE_API_KEY").is_err() {
            assert!(matches!(err, Err(AiError::Auth(_))));
        }
    }
}
