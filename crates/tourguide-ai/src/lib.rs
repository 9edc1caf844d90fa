//! Answer dispatcher for the tour guide chat.
//!
//! Turns a visitor question plus a small context bundle into a finalized
//! answer:
//! - Prompt assembly with an optional token-aware context budget
//! - Per-session sliding-window rate limiting
//! - Streaming (SSE) call with a single non-streaming fallback
//! - Normalization of the provider's response shapes into [`GenerationResult`]
//! - Conversation state and a session store with explicit lifecycle

pub mod cleanup;
pub mod decode;
pub mod dispatcher;
pub mod gemini;
pub mod prompt;
pub mod rate_limit;
pub mod session;
pub mod streaming;
pub mod turn;

use async_trait::async_trait;
use futures_util::stream::BoxStream;

pub use decode::{decode_response, Decoded};
pub use dispatcher::Dispatcher;
pub use gemini::{GeminiClient, GeminiConfig};
pub use prompt::{build_prompt, PromptTemplate};
pub use rate_limit::RateLimiter;
pub use session::{ChatTurn, ConversationState, Role, SessionStore, SharedState};
pub use turn::{TurnOutcome, TurnRunner};

/// Incremental provider payloads, in arrival order.
pub type ChunkStream = BoxStream<'static, Result<serde_json::Value, AiError>>;

/// A text-generation endpoint with a streaming and a non-streaming mode.
///
/// Implementations return raw payloads; interpreting them is the job of
/// [`decode`], so every provider shape goes through the same priority rules.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Issue one non-streaming call and return the whole response payload.
    async fn generate(&self, request: &GenerationRequest) -> Result<serde_json::Value, AiError>;

    /// Open a streaming call. Dropping the returned stream closes the connection.
    async fn generate_stream(&self, request: &GenerationRequest) -> Result<ChunkStream, AiError>;
}

/// Everything needed for one provider call. Built per call, never mutated.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    system_prompt: String,
    context_text: Option<String>,
    user_text: String,
    model_id: String,
    max_output_tokens: Option<u32>,
    contents: String,
}

impl GenerationRequest {
    pub fn new(
        template: &PromptTemplate,
        system_prompt: impl Into<String>,
        context_text: Option<String>,
        user_text: impl Into<String>,
        model_id: impl Into<String>,
        max_output_tokens: Option<u32>,
    ) -> Self {
        let system_prompt = system_prompt.into();
        let user_text = user_text.into();
        let contents = template.build(&system_prompt, context_text.as_deref(), &user_text);
        Self {
            system_prompt,
            context_text,
            user_text,
            model_id: model_id.into(),
            max_output_tokens,
            contents,
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn context_text(&self) -> Option<&str> {
        self.context_text.as_deref()
    }

    pub fn user_text(&self) -> &str {
        &self.user_text
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn max_output_tokens(&self) -> Option<u32> {
        self.max_output_tokens
    }

    /// The assembled prompt sent as the call's contents.
    pub fn contents(&self) -> &str {
        &self.contents
    }
}

/// Final outcome of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Success { text: String },
    Blocked { reason: String },
    Empty,
    TransportError { detail: String },
}

impl GenerationResult {
    /// Stable lowercase name used on the wire and in logs.
    pub fn status(&self) -> &'static str {
        match self {
            GenerationResult::Success { .. } => "success",
            GenerationResult::Blocked { .. } => "blocked",
            GenerationResult::Empty => "empty",
            GenerationResult::TransportError { .. } => "transport_error",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Success { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AiError {
    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Rate limited by provider")]
    RateLimited,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Timeout")]
    Timeout,
    #[error("Request cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_assembles_contents_once() {
        let template = PromptTemplate::default();
        let request = GenerationRequest::new(
            &template,
            "Bạn là hướng dẫn viên.",
            Some("Núi Bà Đen cao 986 m.".into()),
            "Núi Bà Đen cao bao nhiêu?",
            "gemini-2.5-flash",
            Some(256),
        );
        assert_eq!(
            request.contents(),
            build_prompt(
                "Bạn là hướng dẫn viên.",
                Some("Núi Bà Đen cao 986 m."),
                "Núi Bà Đen cao bao nhiêu?"
            )
        );
        assert_eq!(request.model_id(), "gemini-2.5-flash");
        assert_eq!(request.max_output_tokens(), Some(256));
        assert_eq!(request.context_text(), Some("Núi Bà Đen cao 986 m."));
    }

    #[test]
    fn result_status_names() {
        assert_eq!(
            GenerationResult::Success { text: "hi".into() }.status(),
            "success"
        );
        assert_eq!(
            GenerationResult::Blocked {
                reason: "SAFETY".into()
            }
            .status(),
            "blocked"
        );
        assert_eq!(GenerationResult::Empty.status(), "empty");
        assert_eq!(
            GenerationResult::TransportError {
                detail: "dns".into()
            }
            .status(),
            "transport_error"
        );
    }

    #[test]
    fn ai_error_display() {
        let err = AiError::Api {
            status: 500,
            body: "internal".into(),
        };
        assert_eq!(err.to_string(), "API error: HTTP 500: internal");
        assert_eq!(AiError::Timeout.to_string(), "Timeout");
        assert_eq!(AiError::Cancelled.to_string(), "Request cancelled");
    }
}
