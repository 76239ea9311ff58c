use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use tally_core::error::{InferenceError, Result};
use tally_core::model::{InferenceProvider, InferenceRequest};

/// A provider that replays preset responses and tracks call counts.
///
/// Responses cycle; `None` entries stand for a backend that produced no
/// output. The first `failures` calls fail with a request error.
pub struct ScriptedProvider {
    responses: Vec<Option<String>>,
    call_count: AtomicUsize,
    failures: AtomicUsize,
}

impl ScriptedProvider {
    /// Create a provider that cycles through the given responses.
    pub fn new(responses: Vec<Option<String>>) -> Self {
        Self {
            responses,
            call_count: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
        }
    }

    /// Create a provider that always returns the same response.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self::new(vec![Some(response.into())])
    }

    /// Create a provider that cycles through the given texts.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(texts.into_iter().map(|t| Some(t.into())).collect())
    }

    /// Fail the next `n` calls before answering.
    pub fn with_failures(self, n: usize) -> Self {
        self.failures.store(n, Ordering::Relaxed);
        self
    }

    /// Get the number of times this provider has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl InferenceProvider for ScriptedProvider {
    async fn generate(&self, _request: &InferenceRequest) -> Result<Option<String>> {
        let idx = self.call_count.fetch_add(1, Ordering::Relaxed);
        if self
            .failures
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(InferenceError::Request("scripted failure".into()).into());
        }
        if self.responses.is_empty() {
            return Ok(None);
        }
        Ok(self.responses[idx % self.responses.len()].clone())
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}
