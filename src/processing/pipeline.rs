//! Map-then-reduce summarization of long documents.
//!
//! Chunks are summarized one at a time in order and each summary is normalized. The normalized
//! summaries are joined with blank lines; if that still exceeds the second-pass threshold it is
//! summarized once more. Any failing call aborts the request and discards earlier summaries.

use crate::config::Config;
use crate::language::LanguageRouter;
use crate::summarization::SummarizationClient;
use std::sync::Arc;

use super::chunking;
use super::normalize::{DEFAULT_BLOCKLIST, TextNormalizer};
use super::summarize::ChunkSummarizer;
use super::types::{FinalSummary, PipelineSettings, SummaryOutcome, SummaryReport};

const SUMMARY_SEPARATOR: &str = "\n\n";

/// Chunk, summarize, normalize, and reduce.
pub struct ReductionPipeline {
    summarizer: ChunkSummarizer,
    normalizer: TextNormalizer,
    settings: PipelineSettings,
}

impl ReductionPipeline {
    /// Assemble a pipeline from its parts.
    pub fn new(
        summarizer: ChunkSummarizer,
        normalizer: TextNormalizer,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            summarizer,
            normalizer,
            settings,
        }
    }

    /// Build the production pipeline around `client` using `whatlang` detection.
    pub fn from_config(config: &Config, client: Arc<dyn SummarizationClient>) -> Self {
        let settings = PipelineSettings::from(config);
        let normalizer = match &config.normalizer_blocklist {
            Some(words) => TextNormalizer::new(config.normalizer_alphabet, words),
            None => TextNormalizer::new(config.normalizer_alphabet, DEFAULT_BLOCKLIST),
        };
        let summarizer = ChunkSummarizer::new(
            client,
            LanguageRouter::default(),
            settings.min_summary_length,
            settings.max_summary_length,
        );
        Self::new(summarizer, normalizer, settings)
    }

    /// Settings this pipeline runs with.
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Summarize `text` of any length.
    ///
    /// Returns [`SummaryOutcome::NoContent`] when the text has nothing to chunk.
    pub async fn summarize_long(&self, text: &str) -> FinalSummary {
        let chunks = chunking::split(text, self.settings.max_chars, self.settings.overlap_chars);
        if chunks.is_empty() {
            tracing::info!("No text to summarize");
            return Ok(SummaryOutcome::NoContent);
        }

        let total = chunks.len();
        tracing::info!(
            chunks = total,
            max_chars = self.settings.max_chars,
            "Split document into chunks"
        );

        let mut summaries = Vec::with_capacity(total);
        for chunk in &chunks {
            tracing::info!(chunk = chunk.index + 1, total, "Summarizing chunk");
            let summary = self
                .summarizer
                .summarize(&chunk.model_input())
                .await
                .inspect_err(|error| {
                    tracing::warn!(
                        chunk = chunk.index + 1,
                        total,
                        kind = error.kind().as_str(),
                        error = %error,
                        "Chunk summarization failed; aborting"
                    );
                })?;
            summaries.push(self.normalizer.clean(&summary));
        }

        let combined = summaries.join(SUMMARY_SEPARATOR);
        let combined_len = combined.chars().count();
        tracing::debug!(combined_len, combined = %combined, "Combined chunk summaries");

        let threshold = self.settings.second_pass_threshold();
        if combined_len as f64 <= threshold {
            return Ok(SummaryOutcome::Completed(SummaryReport {
                text: combined,
                chunk_count: total,
                second_pass: false,
            }));
        }

        tracing::info!(
            combined_len,
            threshold,
            "Combined summary too long; summarizing the summaries"
        );
        let summary = self
            .summarizer
            .summarize(&combined)
            .await
            .inspect_err(|error| {
                tracing::warn!(
                    kind = error.kind().as_str(),
                    error = %error,
                    "Second-pass summarization failed"
                );
            })?;

        Ok(SummaryOutcome::Completed(SummaryReport {
            text: self.normalizer.clean(&summary),
            chunk_count: total,
            second_pass: true,
        }))
    }
}
