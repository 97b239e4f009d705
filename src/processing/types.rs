//! Core data types and error definitions for the summarization pipeline.

use crate::{config::Config, extraction::ExtractionError};
use serde::Serialize;
use thiserror::Error;

/// Failure categories reported to front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    /// The document could not be read or parsed.
    #[serde(rename = "extraction_error")]
    Extraction,
    /// The file extension is not one of `.txt`, `.pdf`, `.docx`.
    #[serde(rename = "unsupported_format")]
    UnsupportedFormat,
    /// There was no text to summarize. Reported as [`SummaryOutcome::NoContent`], never as an error.
    #[serde(rename = "empty_input")]
    EmptyInput,
    /// The summarization model failed while producing a summary.
    #[serde(rename = "summarization_error")]
    Summarization,
    /// The summarization model is not set up (missing model, bad credentials).
    #[serde(rename = "configuration_error")]
    Configuration,
}

impl FailureKind {
    /// Stable snake_case name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Extraction => "extraction_error",
            Self::UnsupportedFormat => "unsupported_format",
            Self::EmptyInput => "empty_input",
            Self::Summarization => "summarization_error",
            Self::Configuration => "configuration_error",
        }
    }
}

/// Typed failure of a single summarization call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummarizeError {
    /// The model raised while summarizing; the message carries the cause.
    #[error("Summarization failed: {0}")]
    Summarization(String),
    /// The model could not be used because of its configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SummarizeError {
    /// Category of this failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Summarization(_) => FailureKind::Summarization,
            Self::Configuration(_) => FailureKind::Configuration,
        }
    }
}

/// Result of summarizing one chunk.
pub type ChunkSummary = Result<String, SummarizeError>;

/// Errors that end a summarization request.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Document text could not be obtained.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    /// A chunk or second-pass summary failed; the whole request is aborted.
    #[error(transparent)]
    Summarize(#[from] SummarizeError),
}

impl PipelineError {
    /// Category of this failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Extraction(error) => error.kind(),
            Self::Summarize(error) => error.kind(),
        }
    }
}

/// Successful pipeline output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryReport {
    /// Final normalized summary.
    pub text: String,
    /// Number of chunks the document was split into.
    pub chunk_count: usize,
    /// Whether the joined chunk summaries were summarized again.
    pub second_pass: bool,
}

/// Terminal states of a request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// A summary was produced.
    Completed(SummaryReport),
    /// The input contained no text.
    NoContent,
}

/// Either a terminal outcome or the failure that stopped the pipeline.
pub type FinalSummary = Result<SummaryOutcome, PipelineError>;

/// Tunables for chunking, model length bounds, and the second reduction pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    /// Soft character budget per chunk.
    pub max_chars: usize,
    /// Characters of the previous chunk prepended as context.
    pub overlap_chars: usize,
    /// Multiplier on `max_chars` above which the combined summary is summarized again.
    pub second_pass_factor: f64,
    /// Advisory lower bound on each model summary.
    pub min_summary_length: usize,
    /// Advisory upper bound on each model summary.
    pub max_summary_length: usize,
}

impl PipelineSettings {
    /// Character length above which the combined summary gets a second pass.
    pub fn second_pass_threshold(&self) -> f64 {
        self.max_chars as f64 * self.second_pass_factor
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            max_chars: config.chunk_max_chars,
            overlap_chars: config.chunk_overlap_chars,
            second_pass_factor: config.second_pass_factor,
            min_summary_length: config.summary_min_length,
            max_summary_length: config.summary_max_length,
        }
    }
}
