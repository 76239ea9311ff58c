use async_trait::async_trait;

use tally_core::config::{RetryPolicy, SamplingParams};
use tally_core::error::Result;
use tally_core::model::{InferenceProvider, InferenceRequest};

/// Wraps a provider so failed calls are retried with a fixed delay.
///
/// `max_attempts` counts every call, the first included. When all attempts
/// fail the wrapper answers `Ok(None)`, which parses to the task's invalid
/// label instead of aborting the run.
pub struct RetryingProvider<P> {
    inner: P,
    policy: RetryPolicy,
}

impl<P: InferenceProvider> RetryingProvider<P> {
    pub fn new(inner: P, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// Use the retry fields of a task's sampling parameters.
    pub fn from_params(inner: P, params: &SamplingParams) -> Self {
        Self::new(inner, params.retry_policy())
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

#[async_trait]
impl<P: InferenceProvider> InferenceProvider for RetryingProvider<P> {
    async fn generate(&self, request: &InferenceRequest) -> Result<Option<String>> {
        let max_attempts = self.policy.max_attempts;
        for attempt in 1..=max_attempts {
            match self.inner.generate(request).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    tracing::warn!(
                        provider = self.inner.provider_name(),
                        attempt,
                        max_attempts,
                        error = %e,
                        "inference attempt failed"
                    );
                    if attempt < max_attempts {
                        tokio::time::sleep(self.policy.delay).await;
                    }
                }
            }
        }
        tracing::warn!(
            provider = self.inner.provider_name(),
            max_attempts,
            "no response after exhausting retries"
        );
        Ok(None)
    }

    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }
}
