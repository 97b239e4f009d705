//! Single-chunk summarization at the model boundary.
//!
//! This is the one place where raw provider errors are turned into text: every
//! [`SummarizationClientError`] becomes a typed [`SummarizeError`] and travels upward as such.

use crate::language::LanguageRouter;
use crate::summarization::{SummarizationClient, SummarizationClientError, SummarizationRequest};
use std::sync::Arc;

use super::types::{ChunkSummary, SummarizeError};

/// Approximate characters per model token used to bound the model input.
pub const CHARS_PER_TOKEN: usize = 4;

impl From<SummarizationClientError> for SummarizeError {
    fn from(error: SummarizationClientError) -> Self {
        match error {
            SummarizationClientError::Configuration(_) => Self::Configuration(error.to_string()),
            other => Self::Summarization(other.to_string()),
        }
    }
}

/// Summarizes one piece of text with a per-call language hint.
pub struct ChunkSummarizer {
    client: Arc<dyn SummarizationClient>,
    router: LanguageRouter,
    min_length: usize,
    max_length: usize,
}

impl ChunkSummarizer {
    /// Wrap `client`, routing languages through `router` and requesting summaries between
    /// `min_length` and `max_length`.
    pub fn new(
        client: Arc<dyn SummarizationClient>,
        router: LanguageRouter,
        min_length: usize,
        max_length: usize,
    ) -> Self {
        Self {
            client,
            router,
            min_length,
            max_length,
        }
    }

    /// Summarize `text`, truncating it to what the model accepts.
    pub async fn summarize(&self, text: &str) -> ChunkSummary {
        let source_language = self.router.detect_and_map(text);
        let limit = self.client.max_input_tokens().saturating_mul(CHARS_PER_TOKEN);
        let input = truncate_chars(text, limit);
        if input.len() < text.len() {
            tracing::debug!(limit, "Truncated chunk to model input limit");
        }

        let request = SummarizationRequest {
            text: input.to_string(),
            source_language: source_language.to_string(),
            min_length: self.min_length,
            max_length: self.max_length,
        };
        let summary = self.client.summarize(request).await?;
        Ok(summary.trim().to_string())
    }
}

/// First `limit` characters of `text`; a limit of zero means unbounded.
fn truncate_chars(text: &str, limit: usize) -> &str {
    if limit == 0 {
        return text;
    }
    text.char_indices()
        .nth(limit)
        .map_or(text, |(offset, _)| &text[..offset])
}
