//! Gemini API client struct, URLs, request bodies and status mapping.

use crate::{AiError, GenerationRequest};

use super::config::GeminiConfig;

/// Gemini API client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| AiError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub(crate) fn api_url(&self, model: &str, stream: bool) -> String {
        if stream {
            format!("{}/{}:streamGenerateContent?alt=sse", self.config.base_url, model)
        } else {
            format!("{}/{}:generateContent", self.config.base_url, model)
        }
    }

    /// Build the JSON request body. The assembled prompt goes in as a single
    /// user turn.
    pub(crate) fn build_request_body(&self, request: &GenerationRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.contents() }]
            }]
        });

        if let Some(max) = request.max_output_tokens() {
            body["generationConfig"] = serde_json::json!({ "maxOutputTokens": max });
        }

        body
    }

    pub(crate) async fn post(
        &self,
        request: &GenerationRequest,
        stream: bool,
    ) -> Result<reqwest::Response, AiError> {
        let url = self.api_url(request.model_id(), stream);
        let mut builder = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(&self.build_request_body(request));
        if !stream {
            builder = builder.timeout(self.config.request_timeout);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                AiError::Timeout
            } else {
                AiError::Network(e.to_string())
            }
        })?;

        check_status(response).await
    }
}

/// Map non-success HTTP statuses onto `AiError`.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(match status {
        reqwest::StatusCode::TOO_MANY_REQUESTS => AiError::RateLimited,
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            AiError::Auth(format!("HTTP {status}: {body}"))
        }
        _ => AiError::Api {
            status: status.as_u16(),
            body,
        },
    })
}
