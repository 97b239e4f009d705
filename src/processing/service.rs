use crate::config::Config;
use crate::extraction;
use crate::metrics::{MetricsSnapshot, SummaryMetrics};
use crate::summarization::get_summarization_client;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use super::pipeline::ReductionPipeline;
use super::types::{FinalSummary, PipelineError, SummaryOutcome};

/// Operations the front ends need from the summarization service.
#[async_trait]
pub trait SummaryApi: Send + Sync {
    /// Summarize text supplied directly by the caller.
    async fn summarize_text(&self, text: String) -> FinalSummary;

    /// Extract text from `path` and summarize it.
    async fn summarize_file(&self, path: PathBuf) -> FinalSummary;

    /// Current activity counters.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

/// Front-end facade over the reduction pipeline.
///
/// Owns the pipeline and the metrics registry so the HTTP surface and the CLI share the same
/// behavior. Construct it once near process start and share it through an `Arc`.
pub struct SummaryService {
    pipeline: ReductionPipeline,
    metrics: Arc<SummaryMetrics>,
}

impl SummaryService {
    /// Wrap an assembled pipeline.
    pub fn new(pipeline: ReductionPipeline) -> Self {
        Self {
            pipeline,
            metrics: Arc::new(SummaryMetrics::new()),
        }
    }

    /// Build the production service: Ollama-backed model, `whatlang` detection.
    pub fn from_config(config: &Config) -> Self {
        tracing::info!(
            model = ?config.summarization_model,
            "Initializing summarization client"
        );
        let client = get_summarization_client(config);
        Self::new(ReductionPipeline::from_config(config, client))
    }

    /// The pipeline behind this service.
    pub fn pipeline(&self) -> &ReductionPipeline {
        &self.pipeline
    }

    /// Summarize text supplied directly by the caller.
    pub async fn summarize_text(&self, text: &str) -> FinalSummary {
        let span = tracing::info_span!("summarize", request_id = %Uuid::new_v4(), source = "text");
        async {
            tracing::info!(chars = text.chars().count(), "Summarizing text");
            let result = self.pipeline.summarize_long(text).await;
            self.record(&result);
            result
        }
        .instrument(span)
        .await
    }

    /// Extract text from `path` and summarize it.
    ///
    /// Files that yield no text end in [`SummaryOutcome::NoContent`].
    pub async fn summarize_file(&self, path: &Path) -> FinalSummary {
        let span = tracing::info_span!(
            "summarize",
            request_id = %Uuid::new_v4(),
            source = %path.display()
        );
        async {
            let result = match extraction::extract_text_blocking(path.to_path_buf()).await {
                Ok(text) => self.pipeline.summarize_long(&text).await,
                Err(error) => {
                    tracing::warn!(error = %error, "Failed to extract document text");
                    Err(PipelineError::from(error))
                }
            };
            self.record(&result);
            result
        }
        .instrument(span)
        .await
    }

    /// Return the current metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn record(&self, result: &FinalSummary) {
        match result {
            Ok(SummaryOutcome::Completed(report)) => {
                tracing::info!(
                    chunks = report.chunk_count,
                    second_pass = report.second_pass,
                    chars = report.text.chars().count(),
                    "Summary completed"
                );
                self.metrics
                    .record_summary(report.chunk_count as u64, report.second_pass);
            }
            Ok(SummaryOutcome::NoContent) => {}
            Err(error) => {
                tracing::warn!(kind = error.kind().as_str(), error = %error, "Summary failed");
                self.metrics.record_failure();
            }
        }
    }
}

#[async_trait]
impl SummaryApi for SummaryService {
    async fn summarize_text(&self, text: String) -> FinalSummary {
        SummaryService::summarize_text(self, &text).await
    }

    async fn summarize_file(&self, path: PathBuf) -> FinalSummary {
        SummaryService::summarize_file(self, &path).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        SummaryService::metrics_snapshot(self)
    }
}
