//! Scripted stand-ins for the model and language capabilities.

use crate::language::{LanguageDetectionError, LanguageDetector, LanguageRouter};
use crate::summarization::{SummarizationClient, SummarizationClientError, SummarizationRequest};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

type Script = Box<dyn Fn(usize) -> Result<String, SummarizationClientError> + Send + Sync>;

/// Summarization client that answers from a script and records every request.
pub(crate) struct ScriptedClient {
    script: Script,
    requests: Mutex<Vec<SummarizationRequest>>,
    max_input_tokens: usize,
}

impl ScriptedClient {
    fn new(script: Script) -> Self {
        Self {
            script,
            requests: Mutex::new(Vec::new()),
            max_input_tokens: 1024,
        }
    }

    /// Reply with `replies` in order, repeating the last one once exhausted.
    pub(crate) fn replying<const N: usize>(replies: [&str; N]) -> Self {
        let replies: Vec<String> = replies.iter().map(|reply| reply.to_string()).collect();
        Self::new(Box::new(move |call| {
            Ok(replies[call.min(replies.len() - 1)].clone())
        }))
    }

    /// Reply with the output of `reply` for each call index.
    pub(crate) fn replying_with(reply: impl Fn(usize) -> String + Send + Sync + 'static) -> Self {
        Self::new(Box::new(move |call| Ok(reply(call))))
    }

    /// Succeed until call `index`, which fails with `error`.
    pub(crate) fn failing_at(index: usize, error: SummarizationClientError) -> Self {
        Self::failing_at_with(index, error, |call| format!("summary {call}"))
    }

    /// Reply with `reply` until call `index`, which fails with `error`.
    pub(crate) fn failing_at_with(
        index: usize,
        error: SummarizationClientError,
        reply: impl Fn(usize) -> String + Send + Sync + 'static,
    ) -> Self {
        let error = Mutex::new(Some(error));
        Self::new(Box::new(move |call| {
            if call < index {
                return Ok(reply(call));
            }
            Err(error.lock().expect("script lock").take().unwrap_or_else(|| {
                SummarizationClientError::GenerationFailed("called after failure".into())
            }))
        }))
    }

    pub(crate) fn with_max_input_tokens(mut self, tokens: usize) -> Self {
        self.max_input_tokens = tokens;
        self
    }

    pub(crate) fn requests(&self) -> Vec<SummarizationRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }
}

#[async_trait]
impl SummarizationClient for ScriptedClient {
    async fn summarize(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError> {
        let call = {
            let mut requests = self.requests.lock().expect("requests lock");
            requests.push(request);
            requests.len() - 1
        };
        (self.script)(call)
    }

    fn max_input_tokens(&self) -> usize {
        self.max_input_tokens
    }
}

/// Detector that always reports the same short code.
pub(crate) struct FixedDetector(pub(crate) &'static str);

impl FixedDetector {
    pub(crate) fn router(code: &'static str) -> LanguageRouter {
        LanguageRouter::new(Arc::new(Self(code)))
    }
}

impl LanguageDetector for FixedDetector {
    fn detect(&self, _text: &str) -> Result<String, LanguageDetectionError> {
        Ok(self.0.to_string())
    }
}
