//! Abstractions for generating abstractive summaries via local providers.
//!
//! The pipeline only sees the [`SummarizationClient`] trait: text in, short text out, with the
//! source-language hint and length bounds carried on every request. The Ollama-backed client
//! issues non-streaming HTTP requests to the runtime with sampling disabled.

use crate::config::Config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Errors surfaced while attempting abstractive summarization.
#[derive(Debug, Error)]
pub enum SummarizationClientError {
    /// Provider was unreachable.
    #[error("Summarization provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
    /// Provider is reachable but the model or credentials are not set up.
    #[error("Summarization provider misconfigured: {0}")]
    Configuration(String),
}

/// Request payload passed to the summarization provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizationRequest {
    /// Text to condense.
    pub text: String,
    /// Model-specific locale tag describing the input language (e.g. `tr_TR`).
    pub source_language: String,
    /// Advisory lower bound on the summary length in words.
    pub min_length: usize,
    /// Advisory upper bound on the summary length in words.
    pub max_length: usize,
}

/// Interface implemented by abstractive summarization providers.
#[async_trait]
pub trait SummarizationClient: Send + Sync {
    /// Generate a summary of `request.text` using deterministic decoding.
    async fn summarize(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError>;

    /// Largest input the model accepts, in tokens.
    fn max_input_tokens(&self) -> usize;
}

/// Build the summarization client described by the configuration.
pub fn get_summarization_client(config: &Config) -> Arc<dyn SummarizationClient> {
    let base_url = config
        .ollama_url
        .clone()
        .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
    Arc::new(OllamaSummarizationClient::new(
        base_url,
        config.summarization_model.clone(),
        config.summarization_max_input_tokens,
    ))
}

/// Summarization client backed by the Ollama `/api/generate` endpoint.
pub struct OllamaSummarizationClient {
    http: Client,
    base_url: String,
    model: Option<String>,
    max_input_tokens: usize,
}

impl OllamaSummarizationClient {
    /// Create a client for the runtime at `base_url`.
    ///
    /// A missing `model` is not rejected here; every call reports it as a configuration error
    /// so front ends can surface it per request.
    pub fn new(base_url: String, model: Option<String>, max_input_tokens: usize) -> Self {
        Self {
            http: Client::builder()
                .user_agent("gistify/summary")
                .build()
                .unwrap_or_default(),
            base_url,
            model,
            max_input_tokens,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    done: bool,
}

fn build_prompt(request: &SummarizationRequest) -> String {
    format!(
        "Summarize the following text. The text is written in the language with locale tag {}; \
         write the summary in that same language. Use between {} and {} words. Return only the \
         summary as plain prose.\n\n{}",
        request.source_language, request.min_length, request.max_length, request.text
    )
}

#[async_trait]
impl SummarizationClient for OllamaSummarizationClient {
    async fn summarize(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError> {
        let Some(model) = self.model.as_deref().filter(|name| !name.trim().is_empty()) else {
            return Err(SummarizationClientError::Configuration(
                "SUMMARIZATION_MODEL is not set".into(),
            ));
        };

        let payload = json!({
            "model": model,
            "prompt": build_prompt(&request),
            "stream": false,
            "options": {
                "temperature": 0.0,
                "seed": 0,
                // Roughly two tokens per word leaves room for the upper bound.
                "num_predict": request.max_length.saturating_mul(2),
            }
        });

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::Configuration(format!(
                "model '{model}' is not available at {}: {body}",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::GenerationFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: OllamaResponse = response.json().await.map_err(|error| {
            SummarizationClientError::InvalidResponse(format!(
                "failed to decode Ollama response: {error}"
            ))
        })?;

        if !body.done {
            return Err(SummarizationClientError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        Ok(body.response.trim().to_string())
    }

    fn max_input_tokens(&self) -> usize {
        self.max_input_tokens
    }
}
