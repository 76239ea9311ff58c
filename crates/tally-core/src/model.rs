use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{GenerationParams, SamplingParams};
use crate::error::Result;
use crate::task::Task;

/// A single prompt to send to an inference backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceRequest {
    /// Backend-specific model identifier.
    pub model: String,

    pub prompt: String,

    pub params: GenerationParams,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_context_length: Option<u32>,

    /// Phrases at which the backend should stop generating.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

impl InferenceRequest {
    /// Build a request for `task`, carrying its stop words and only the
    /// parameters a backend understands.
    pub fn new(
        task: Task,
        model: impl Into<String>,
        prompt: impl Into<String>,
        params: &SamplingParams,
    ) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            params: params.generation(),
            max_context_length: params.max_context_length,
            stop: task.stop_words().iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Trait for inference backends (local runtimes or remote APIs).
///
/// `Ok(None)` means the backend produced no output; it is a valid raw
/// response that parses to the task's invalid label.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Generate a completion for the request.
    async fn generate(&self, request: &InferenceRequest) -> Result<Option<String>>;

    /// Return the provider name.
    fn provider_name(&self) -> &str;
}
