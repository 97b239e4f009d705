//! Summarization pipeline: chunking, per-chunk summaries, normalization, and reduction.

pub mod chunking;
pub mod normalize;
mod pipeline;
mod service;
mod summarize;
#[cfg(test)]
mod test_support;
pub mod types;

pub use pipeline::ReductionPipeline;
pub use service::{SummaryApi, SummaryService};
pub use summarize::{CHARS_PER_TOKEN, ChunkSummarizer};
pub use types::{
    ChunkSummary, FailureKind, FinalSummary, PipelineError, PipelineSettings, SummarizeError,
    SummaryOutcome, SummaryReport,
};
