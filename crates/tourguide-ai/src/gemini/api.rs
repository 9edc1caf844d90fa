//! GenerationClient implementation for GeminiClient.

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio_util::io::StreamReader;
use tracing::debug;

use crate::streaming::json_events;
use crate::{AiError, ChunkStream, GenerationClient, GenerationRequest};

use super::client::GeminiClient;

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<serde_json::Value, AiError> {
        debug!(model = %request.model_id(), "Gemini API request");

        let response = self.post(request, false).await?;
        response
            .json()
            .await
            .map_err(|e| AiError::Parse(e.to_string()))
    }

    async fn generate_stream(&self, request: &GenerationRequest) -> Result<ChunkStream, AiError> {
        debug!(model = %request.model_id(), "Gemini API streaming request");

        let response = self.post(request, true).await?;
        let byte_stream = response
            .bytes_stream()
            .map(|result| result.map_err(std::io::Error::other));
        let reader = tokio::io::BufReader::new(StreamReader::new(byte_stream));

        Ok(json_events(reader))
    }
}
