//! Dispatcher tests against a scripted in-memory client.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use super::*;
use crate::{ChunkStream, PromptTemplate};

#[derive(Clone)]
enum StreamScript {
    OpenError(AiError),
    Chunks(Vec<Result<Value, AiError>>),
    Hang,
}

struct FakeClient {
    stream: StreamScript,
    fallback: Result<Value, AiError>,
    stream_calls: AtomicUsize,
    generate_calls: AtomicUsize,
}

impl FakeClient {
    fn new(stream: StreamScript, fallback: Result<Value, AiError>) -> Arc<Self> {
        Arc::new(Self {
            stream,
            fallback,
            stream_calls: AtomicUsize::new(0),
            generate_calls: AtomicUsize::new(0),
        })
    }

    fn stream_calls(&self) -> usize {
        self.stream_calls.load(Ordering::SeqCst)
    }

    fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationClient for FakeClient {
    async fn generate(&self, _request: &GenerationRequest) -> Result<Value, AiError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.fallback.clone()
    }

    async fn generate_stream(&self, _request: &GenerationRequest) -> Result<ChunkStream, AiError> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        match self.stream.clone() {
            StreamScript::OpenError(e) => Err(e),
            StreamScript::Chunks(chunks) => Ok(stream::iter(chunks).boxed()),
            StreamScript::Hang => Ok(stream::pending().boxed()),
        }
    }
}

fn request() -> GenerationRequest {
    GenerationRequest::new(
        &PromptTemplate::default(),
        "Bạn là hướng dẫn viên du lịch Tây Ninh.",
        None,
        "Xin chào",
        "gemini-2.5-flash",
        None,
    )
}

fn parts(text: &str) -> Value {
    json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
}

async fn run(client: Arc<FakeClient>) -> (GenerationResult, Vec<String>) {
    let dispatcher = Dispatcher::new(client).with_call_timeout(Duration::from_millis(200));
    let mut partials = Vec::new();
    let result = dispatcher
        .dispatch(&request(), &CancellationToken::new(), |p| {
            partials.push(p.to_string())
        })
        .await;
    (result, partials)
}

#[tokio::test]
async fn streaming_success_skips_fallback() {
    let client = FakeClient::new(
        StreamScript::Chunks(vec![Ok(json!({ "text": "Xin " })), Ok(parts("chào"))]),
        Ok(json!({ "text": "unused" })),
    );
    let (result, partials) = run(client.clone()).await;

    assert_eq!(
        result,
        GenerationResult::Success {
            text: "Xin chào".into()
        }
    );
    assert_eq!(partials, vec!["Xin ", "Xin chào"]);
    assert_eq!(client.generate_calls(), 0);
}

#[tokio::test]
async fn partial_delivery_is_monotonic() {
    let client = FakeClient::new(
        StreamScript::Chunks(vec![
            Ok(parts("Tòa Thánh ")),
            Ok(json!({ "usageMetadata": { "promptTokenCount": 12 } })),
            Ok(parts("Tây Ninh ")),
            Ok(parts("")),
            Ok(parts("rất đẹp.")),
        ]),
        Ok(json!({})),
    );
    let (_, partials) = run(client).await;

    assert_eq!(partials.len(), 3);
    for pair in partials.windows(2) {
        assert!(pair[1].len() > pair[0].len());
        assert!(pair[1].starts_with(&pair[0]));
    }
    assert_eq!(partials.last().unwrap(), "Tòa Thánh Tây Ninh rất đẹp.");
}

#[tokio::test]
async fn empty_stream_falls_back_exactly_once() {
    let client = FakeClient::new(StreamScript::Chunks(vec![]), Ok(json!({ "text": "Xin chào" })));
    let (result, partials) = run(client.clone()).await;

    assert_eq!(
        result,
        GenerationResult::Success {
            text: "Xin chào".into()
        }
    );
    assert!(partials.is_empty());
    assert_eq!(client.stream_calls(), 1);
    assert_eq!(client.generate_calls(), 1);
}

#[tokio::test]
async fn whitespace_only_stream_falls_back() {
    let client = FakeClient::new(
        StreamScript::Chunks(vec![Ok(parts("\n"))]),
        Ok(parts("Có.")),
    );
    let (result, _) = run(client.clone()).await;
    assert_eq!(result, GenerationResult::Success { text: "Có.".into() });
    assert_eq!(client.generate_calls(), 1);
}

#[tokio::test]
async fn open_failure_falls_back() {
    let client = FakeClient::new(
        StreamScript::OpenError(AiError::Network("connection reset".into())),
        Ok(parts("Xin chào")),
    );
    let (result, _) = run(client.clone()).await;
    assert!(result.is_success());
    assert_eq!(client.generate_calls(), 1);
}

#[tokio::test]
async fn mid_stream_failure_uses_fallback_answer() {
    let client = FakeClient::new(
        StreamScript::Chunks(vec![
            Ok(parts("Núi Bà")),
            Err(AiError::Network("eof".into())),
        ]),
        Ok(parts("Núi Bà Đen cao 986 m.")),
    );
    let (result, partials) = run(client.clone()).await;

    assert_eq!(partials, vec!["Núi Bà"]);
    assert_eq!(
        result,
        GenerationResult::Success {
            text: "Núi Bà Đen cao 986 m.".into()
        }
    );
    assert_eq!(client.generate_calls(), 1);
}

#[tokio::test]
async fn safety_block_in_fallback_is_not_retried() {
    let client = FakeClient::new(
        StreamScript::Chunks(vec![]),
        Ok(json!({ "promptFeedback": { "blockReason": "SAFETY" } })),
    );
    let (result, _) = run(client.clone()).await;

    assert_eq!(
        result,
        GenerationResult::Blocked {
            reason: "SAFETY".into()
        }
    );
    assert_eq!(client.stream_calls(), 1);
    assert_eq!(client.generate_calls(), 1);
}

#[tokio::test]
async fn block_seen_while_streaming_is_terminal() {
    let client = FakeClient::new(
        StreamScript::Chunks(vec![Ok(json!({ "promptFeedback": { "blockReason": "SAFETY" } }))]),
        Ok(json!({ "text": "should not be used" })),
    );
    let (result, _) = run(client.clone()).await;

    assert_eq!(
        result,
        GenerationResult::Blocked {
            reason: "SAFETY".into()
        }
    );
    assert_eq!(client.generate_calls(), 0);
}

#[tokio::test]
async fn empty_fallback_maps_to_empty() {
    let client = FakeClient::new(StreamScript::Chunks(vec![]), Ok(json!({ "candidates": [] })));
    let (result, _) = run(client.clone()).await;
    assert_eq!(result, GenerationResult::Empty);
    assert_eq!(client.generate_calls(), 1);
}

#[tokio::test]
async fn fallback_fault_is_transport_error() {
    let client = FakeClient::new(StreamScript::Chunks(vec![]), Err(AiError::RateLimited));
    let (result, _) = run(client.clone()).await;

    assert_eq!(
        result,
        GenerationResult::TransportError {
            detail: "Rate limited by provider".into()
        }
    );
    assert_eq!(client.generate_calls(), 1);
}

#[tokio::test]
async fn stalled_stream_times_out_into_fallback() {
    let client = FakeClient::new(StreamScript::Hang, Ok(json!({ "text": "Xin chào" })));
    let (result, _) = run(client.clone()).await;
    assert!(result.is_success());
    assert_eq!(client.generate_calls(), 1);
}

#[tokio::test]
async fn cancellation_before_dispatch_makes_no_fallback() {
    let client = FakeClient::new(StreamScript::Hang, Ok(json!({ "text": "x" })));
    let dispatcher = Dispatcher::new(client.clone());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = dispatcher.dispatch(&request(), &cancel, |_| {}).await;

    assert_eq!(
        result,
        GenerationResult::TransportError {
            detail: "Request cancelled".into()
        }
    );
    assert_eq!(client.generate_calls(), 0);
}

#[tokio::test]
async fn cancellation_mid_stream_stops_promptly() {
    let client = FakeClient::new(StreamScript::Hang, Ok(json!({ "text": "x" })));
    let dispatcher = Dispatcher::new(client.clone()).with_call_timeout(Duration::from_secs(30));
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let result = dispatcher.dispatch(&request(), &cancel, |_| {}).await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(result.status(), "transport_error");
    assert_eq!(client.stream_calls(), 1);
    assert_eq!(client.generate_calls(), 0);
}

#[tokio::test]
async fn configured_artifacts_are_stripped() {
    let client = FakeClient::new(
        StreamScript::Chunks(vec![Ok(parts("Chào bạn! [ad](https://ads.example)"))]),
        Ok(json!({})),
    );
    let dispatcher = Dispatcher::new(client)
        .with_artifacts(vec!["[ad](https://ads.example)".into()]);
    let result = dispatcher
        .dispatch(&request(), &CancellationToken::new(), |_| {})
        .await;
    assert_eq!(
        result,
        GenerationResult::Success {
            text: "Chào bạn!".into()
        }
    );
}

#[tokio::test]
async fn artifact_only_stream_falls_back_once() {
    let client = FakeClient::new(
        StreamScript::Chunks(vec![Ok(parts("[ad](https://ads.example)"))]),
        Ok(json!({ "text": "Xin chào" })),
    );
    let dispatcher = Dispatcher::new(client.clone())
        .with_artifacts(vec!["[ad](https://ads.example)".into()]);
    let result = dispatcher
        .dispatch(&request(), &CancellationToken::new(), |_| {})
        .await;
    assert_eq!(
        result,
        GenerationResult::Success {
            text: "Xin chào".into()
        }
    );
    assert_eq!(client.stream_calls(), 1);
    assert_eq!(client.generate_calls(), 1);
}
