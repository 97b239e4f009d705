use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use gistify::api::create_router;
use gistify::config::Config;
use gistify::language::{LanguageDetectionError, LanguageDetector, LanguageRouter};
use gistify::processing::normalize::TextNormalizer;
use gistify::processing::{
    ChunkSummarizer, PipelineError, PipelineSettings, ReductionPipeline, SummarizeError,
    SummaryOutcome, SummaryService,
};
use gistify::summarization::{
    SummarizationClient, SummarizationClientError, SummarizationRequest, get_summarization_client,
};
use httpmock::{Method::POST, MockServer};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Replies `summary <n>` and fails on the configured call index.
struct CountingClient {
    requests: Mutex<Vec<SummarizationRequest>>,
    fail_at: Option<usize>,
}

impl CountingClient {
    fn new(fail_at: Option<usize>) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            fail_at,
        })
    }

    fn requests(&self) -> Vec<SummarizationRequest> {
        self.requests.lock().expect("lock").clone()
    }
}

#[async_trait]
impl SummarizationClient for CountingClient {
    async fn summarize(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError> {
        let call = {
            let mut requests = self.requests.lock().expect("lock");
            requests.push(request);
            requests.len() - 1
        };
        if self.fail_at == Some(call) {
            return Err(SummarizationClientError::ProviderUnavailable(
                "connection reset".into(),
            ));
        }
        Ok(format!("summary {call}"))
    }

    fn max_input_tokens(&self) -> usize {
        1024
    }
}

struct SilentDetector;

impl LanguageDetector for SilentDetector {
    fn detect(&self, _text: &str) -> Result<String, LanguageDetectionError> {
        Err(LanguageDetectionError::Undetectable)
    }
}

fn pipeline(client: Arc<CountingClient>) -> ReductionPipeline {
    let settings = PipelineSettings::default();
    let summarizer = ChunkSummarizer::new(
        client,
        LanguageRouter::new(Arc::new(SilentDetector)),
        settings.min_summary_length,
        settings.max_summary_length,
    );
    ReductionPipeline::new(summarizer, TextNormalizer::default(), settings)
}

#[tokio::test]
async fn short_text_is_summarized_once() {
    let client = CountingClient::new(None);
    let outcome = pipeline(client.clone())
        .summarize_long("Kısa bir paragraf.")
        .await
        .expect("summary");

    let SummaryOutcome::Completed(report) = outcome else {
        panic!("expected a summary");
    };
    assert_eq!(report.chunk_count, 1);
    assert!(!report.second_pass);
    assert_eq!(report.text, "summary 0");

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].text, "Kısa bir paragraf.");
    assert_eq!(requests[0].source_language, "en_XX");
}

#[tokio::test]
async fn failure_stops_the_pipeline_at_the_failing_chunk() {
    let text = (0..5)
        .map(|index| format!("Paragraph {index} ").repeat(200))
        .collect::<Vec<_>>()
        .join("\n\n");
    let client = CountingClient::new(Some(2));

    let error = pipeline(client.clone())
        .summarize_long(&text)
        .await
        .expect_err("failure");

    assert_eq!(client.requests().len(), 3);
    assert!(matches!(
        error,
        PipelineError::Summarize(SummarizeError::Summarization(ref message)) if message.contains("connection reset")
    ));
}

#[tokio::test]
async fn http_surface_runs_against_ollama() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(200).json_body(json!({
                "response": "Toplantıda bütçe onaylandı.",
                "done": true
            }));
        })
        .await;

    let config = Config {
        ollama_url: Some(server.base_url()),
        summarization_model: Some("llama3".into()),
        ..Config::default()
    };
    let service = Arc::new(SummaryService::new(ReductionPipeline::from_config(
        &config,
        get_summarization_client(&config),
    )));
    let app = create_router(service.clone(), Duration::from_secs(10));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/summarize")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "text": "Toplantıda bütçe konuşuldu ve onaylandı." }).to_string(),
                ))
                .expect("request"),
        )
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json: Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["summary"], "Toplantıda bütçe onaylandı.");
    assert_eq!(json["chunk_count"], 1);

    mock.assert_async().await;
    assert_eq!(service.metrics_snapshot().documents_summarized, 1);
}

#[tokio::test]
async fn missing_model_is_reported_as_configuration_error() {
    let config = Config::default();
    let service = Arc::new(SummaryService::new(ReductionPipeline::from_config(
        &config,
        get_summarization_client(&config),
    )));
    let app = create_router(service, Duration::from_secs(10));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/summarize")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "text": "Bir metin." }).to_string()))
                .expect("request"),
        )
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json: Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(json["kind"], "configuration_error");
}
