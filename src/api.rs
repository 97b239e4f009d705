//! HTTP surface for gistify.
//!
//! This module exposes a compact Axum router with a handful of endpoints:
//!
//! - `POST /summarize` – Summarize raw text supplied in the request body.
//! - `POST /summarize_file` – Extract a `.txt`, `.pdf`, or `.docx` file on the server host and
//!   summarize it.
//! - `GET /metrics` – Observe summary counters.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.
//!
//! The HTTP surface shares the same service with the CLI, so behavior is identical across
//! interfaces. Every summarization call is bounded by the configured request timeout.

use crate::extraction::ExtractionError;
use crate::processing::{FailureKind, PipelineError, SummaryApi, SummaryOutcome};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const EMPTY_MESSAGE: &str = "There is no text to summarize.";

struct AppState<S> {
    service: Arc<S>,
    timeout: Duration,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            timeout: self.timeout,
        }
    }
}

/// Build the HTTP router exposing the summarization API surface.
pub fn create_router<S>(service: Arc<S>, timeout: Duration) -> Router
where
    S: SummaryApi + 'static,
{
    Router::new()
        .route("/summarize", post(summarize_text::<S>))
        .route("/summarize_file", post(summarize_file::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .with_state(AppState { service, timeout })
}

/// Request body for the `POST /summarize` endpoint.
#[derive(Deserialize)]
struct SummarizeTextRequest {
    /// Raw text to summarize.
    text: String,
}

/// Request body for the `POST /summarize_file` endpoint.
#[derive(Deserialize)]
struct SummarizeFileRequest {
    /// Path of the document on the server host.
    file_path: PathBuf,
}

/// Success response shared by both summarization endpoints.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum SummarizeResponse {
    Ok {
        summary: String,
        chunk_count: usize,
        second_pass: bool,
    },
    Empty {
        kind: FailureKind,
        message: &'static str,
    },
}

impl From<SummaryOutcome> for SummarizeResponse {
    fn from(outcome: SummaryOutcome) -> Self {
        match outcome {
            SummaryOutcome::Completed(report) => Self::Ok {
                summary: report.text,
                chunk_count: report.chunk_count,
                second_pass: report.second_pass,
            },
            SummaryOutcome::NoContent => Self::Empty {
                kind: FailureKind::EmptyInput,
                message: EMPTY_MESSAGE,
            },
        }
    }
}

/// Summarize text supplied in the request body.
async fn summarize_text<S>(
    State(state): State<AppState<S>>,
    Json(request): Json<SummarizeTextRequest>,
) -> Result<Json<SummarizeResponse>, AppError>
where
    S: SummaryApi,
{
    let outcome = with_timeout(state.timeout, state.service.summarize_text(request.text)).await?;
    Ok(Json(outcome.into()))
}

/// Extract and summarize a document stored on the server host.
async fn summarize_file<S>(
    State(state): State<AppState<S>>,
    Json(request): Json<SummarizeFileRequest>,
) -> Result<Json<SummarizeResponse>, AppError>
where
    S: SummaryApi,
{
    tracing::info!(path = %request.file_path.display(), "Summarize file request");
    let outcome =
        with_timeout(state.timeout, state.service.summarize_file(request.file_path)).await?;
    Ok(Json(outcome.into()))
}

async fn with_timeout<F>(timeout: Duration, call: F) -> Result<SummaryOutcome, AppError>
where
    F: Future<Output = Result<SummaryOutcome, PipelineError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result.map_err(AppError::from),
        Err(_) => {
            tracing::warn!(timeout_secs = timeout.as_secs(), "Summarize request timed out");
            Err(AppError::Timeout(timeout))
        }
    }
}

/// Return a snapshot of summary counters.
async fn get_metrics<S>(State(state): State<AppState<S>>) -> Json<MetricsResponse>
where
    S: SummaryApi,
{
    let snapshot = state.service.metrics_snapshot();
    Json(MetricsResponse {
        documents_summarized: snapshot.documents_summarized,
        chunks_summarized: snapshot.chunks_summarized,
        second_passes: snapshot.second_passes,
        failures: snapshot.failures,
    })
}

/// Response body for `GET /metrics`.
#[derive(Serialize)]
struct MetricsResponse {
    documents_summarized: u64,
    chunks_summarized: u64,
    second_passes: u64,
    failures: u64,
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "summarize",
                method: "POST",
                path: "/summarize",
                description: "Chunk raw text, summarize each chunk, and reduce the summaries. Response returns { \"status\": \"ok\", \"summary\": string, \"chunk_count\": number, \"second_pass\": bool }.",
                request_example: Some(json!({ "text": "Document contents" })),
            },
            CommandDescriptor {
                name: "summarize_file",
                method: "POST",
                path: "/summarize_file",
                description: "Extract a .txt, .pdf, or .docx file readable by the server and summarize it.",
                request_example: Some(json!({ "file_path": "/data/report.pdf" })),
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return summary counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

enum AppError {
    Pipeline(PipelineError),
    Timeout(Duration),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Pipeline(PipelineError::Extraction(ExtractionError::NotFound(_))) => {
                StatusCode::NOT_FOUND
            }
            Self::Pipeline(error) => match error.kind() {
                FailureKind::UnsupportedFormat => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                FailureKind::Extraction | FailureKind::EmptyInput => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                FailureKind::Summarization => StatusCode::BAD_GATEWAY,
                FailureKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Pipeline(error) => error.kind().as_str(),
            Self::Timeout(_) => "timeout",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Pipeline(error) => error.to_string(),
            Self::Timeout(timeout) => format!("Request exceeded the {timeout:?} time limit"),
        };
        let body = json!({ "error": message, "kind": self.kind() });
        (self.status(), Json(body)).into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(inner: PipelineError) -> Self {
        Self::Pipeline(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::{create_router, get_commands};
    use crate::extraction::ExtractionError;
    use crate::metrics::MetricsSnapshot;
    use crate::processing::{
        FinalSummary, PipelineError, SummarizeError, SummaryApi, SummaryOutcome, SummaryReport,
    };
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{Value, json};
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    #[tokio::test]
    async fn commands_catalog_exposes_summarize_endpoint() {
        let response = get_commands().await;
        let commands = response.0.commands;
        let summarize = commands
            .iter()
            .find(|cmd| cmd.name == "summarize")
            .expect("summarize command present");

        assert_eq!(summarize.method, "POST");
        assert_eq!(summarize.path, "/summarize");
        assert!(summarize.description.to_lowercase().contains("chunk"));
        assert!(commands.iter().any(|cmd| cmd.path == "/summarize_file"));
    }

    #[tokio::test]
    async fn summarize_route_returns_report() {
        let service = Arc::new(StubSummaryService::answering(Ok(SummaryOutcome::Completed(
            SummaryReport {
                text: "S1\n\nS2".into(),
                chunk_count: 2,
                second_pass: false,
            },
        ))));
        let app = create_router(service.clone(), Duration::from_secs(5));

        let (status, json) = post(app, "/summarize", json!({ "text": "Document body" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["summary"], "S1\n\nS2");
        assert_eq!(json["chunk_count"], 2);
        assert_eq!(json["second_pass"], false);
        assert_eq!(service.recorded_calls().await, vec!["text:Document body"]);
    }

    #[tokio::test]
    async fn empty_outcome_is_not_an_error() {
        let service = Arc::new(StubSummaryService::answering(Ok(SummaryOutcome::NoContent)));
        let app = create_router(service, Duration::from_secs(5));

        let (status, json) = post(app, "/summarize", json!({ "text": "   " })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "empty");
        assert_eq!(json["kind"], "empty_input");
        assert!(json["message"].as_str().is_some());
    }

    #[tokio::test]
    async fn file_errors_map_to_status_codes() {
        let cases = vec![
            (
                PipelineError::from(ExtractionError::NotFound("/missing.txt".into())),
                StatusCode::NOT_FOUND,
                "extraction_error",
            ),
            (
                PipelineError::from(ExtractionError::UnsupportedFormat(".xlsx".into())),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "unsupported_format",
            ),
            (
                PipelineError::from(ExtractionError::Pdf("broken xref".into())),
                StatusCode::UNPROCESSABLE_ENTITY,
                "extraction_error",
            ),
            (
                PipelineError::from(SummarizeError::Summarization("connection refused".into())),
                StatusCode::BAD_GATEWAY,
                "summarization_error",
            ),
            (
                PipelineError::from(SummarizeError::Configuration("model not set".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
                "configuration_error",
            ),
        ];

        for (error, expected_status, expected_kind) in cases {
            let service = Arc::new(StubSummaryService::answering(Err(error)));
            let app = create_router(service.clone(), Duration::from_secs(5));
            let (status, json) =
                post(app, "/summarize_file", json!({ "file_path": "/data/a.txt" })).await;

            assert_eq!(status, expected_status);
            assert_eq!(json["kind"], expected_kind);
            assert!(json["error"].as_str().is_some_and(|error| !error.is_empty()));
            assert_eq!(service.recorded_calls().await, vec!["file:/data/a.txt"]);
        }
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let service = Arc::new(
            StubSummaryService::answering(Ok(SummaryOutcome::NoContent))
                .with_delay(Duration::from_secs(30)),
        );
        let app = create_router(service, Duration::from_millis(50));

        let (status, json) = post(app, "/summarize", json!({ "text": "slow" })).await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(json["kind"], "timeout");
    }

    #[tokio::test]
    async fn metrics_route_reports_counters() {
        let service = Arc::new(StubSummaryService::answering(Ok(SummaryOutcome::NoContent)));
        let app = create_router(service, Duration::from_secs(5));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/metrics")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["documents_summarized"], 3);
        assert_eq!(json["chunks_summarized"], 7);
        assert_eq!(json["second_passes"], 1);
        assert_eq!(json["failures"], 0);
    }

    async fn post(app: axum::Router, uri: &str, payload: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router response");

        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        (status, serde_json::from_slice(&body).expect("json body"))
    }

    struct StubSummaryService {
        calls: Arc<Mutex<Vec<String>>>,
        answer: Mutex<Option<FinalSummary>>,
        delay: Option<Duration>,
    }

    impl StubSummaryService {
        fn answering(answer: FinalSummary) -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
                answer: Mutex::new(Some(answer)),
                delay: None,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        async fn recorded_calls(&self) -> Vec<String> {
            self.calls.lock().await.clone()
        }

        async fn respond(&self, call: String) -> FinalSummary {
            self.calls.lock().await.push(call);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.answer
                .lock()
                .await
                .take()
                .unwrap_or(Ok(SummaryOutcome::NoContent))
        }
    }

    #[async_trait]
    impl SummaryApi for StubSummaryService {
        async fn summarize_text(&self, text: String) -> FinalSummary {
            self.respond(format!("text:{text}")).await
        }

        async fn summarize_file(&self, path: PathBuf) -> FinalSummary {
            self.respond(format!("file:{}", path.display())).await
        }

        fn metrics_snapshot(&self) -> MetricsSnapshot {
            MetricsSnapshot {
                documents_summarized: 3,
                chunks_summarized: 7,
                second_passes: 1,
                failures: 0,
            }
        }
    }
}
