use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TallyError};
use crate::task::Task;

/// Sampling parameters for one task, including the retry and context
/// controls that belong to the inference layer rather than the model call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    /// Sample instead of greedy decoding.
    #[serde(default = "default_do_sample")]
    pub do_sample: bool,

    pub temperature: f64,

    pub top_p: f64,

    pub top_k: u32,

    pub max_new_tokens: u32,

    pub seed: u64,

    /// Context window to request from the backend, if it should differ from
    /// the backend default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_context_length: Option<u32>,

    /// Total attempts made by the retrying provider.
    #[serde(default = "default_max_retries")]
    pub custom_max_retries: u32,

    /// Seconds to wait between attempts.
    #[serde(default = "default_retry_delay")]
    pub custom_retry_delay: u64,
}

fn default_do_sample() -> bool {
    true
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    5
}

/// The subset of [`SamplingParams`] forwarded to an inference backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub do_sample: bool,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_new_tokens: u32,
    pub seed: u64,
}

/// How often and how patiently a failed inference call is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl SamplingParams {
    /// Defaults for a task.
    pub fn for_task(task: Task) -> Self {
        let base = Self {
            do_sample: true,
            temperature: 0.1,
            top_p: 0.9,
            top_k: 40,
            max_new_tokens: 16,
            seed: 42,
            max_context_length: None,
            custom_max_retries: default_max_retries(),
            custom_retry_delay: default_retry_delay(),
        };
        match task {
            Task::Sentiment => base,
            Task::Gold => base.with_max_new_tokens(256),
            Task::Summary => base
                .with_temperature(0.3)
                .with_max_new_tokens(512)
                .with_max_context_length(4096),
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_new_tokens(mut self, max_new_tokens: u32) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }

    pub fn with_max_context_length(mut self, length: u32) -> Self {
        self.max_context_length = Some(length);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_retries(mut self, max_retries: u32, delay_secs: u64) -> Self {
        self.custom_max_retries = max_retries;
        self.custom_retry_delay = delay_secs;
        self
    }

    /// Parameters for the model call, without retry or context controls.
    pub fn generation(&self) -> GenerationParams {
        GenerationParams {
            do_sample: self.do_sample,
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            max_new_tokens: self.max_new_tokens,
            seed: self.seed,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.custom_max_retries,
            delay: Duration::from_secs(self.custom_retry_delay),
        }
    }

    /// Reject values no backend accepts.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(TallyError::Config(format!(
                "temperature {} outside [0, 2]",
                self.temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.top_p) || self.top_p == 0.0 {
            return Err(TallyError::Config(format!(
                "top_p {} outside (0, 1]",
                self.top_p
            )));
        }
        if self.max_new_tokens == 0 {
            return Err(TallyError::Config("max_new_tokens must be positive".into()));
        }
        Ok(())
    }
}

/// Sampling parameters for every task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "sentiment_defaults")]
    pub sentiment: SamplingParams,

    #[serde(default = "gold_defaults")]
    pub gold: SamplingParams,

    #[serde(default = "summary_defaults")]
    pub summary: SamplingParams,
}

fn sentiment_defaults() -> SamplingParams {
    SamplingParams::for_task(Task::Sentiment)
}

fn gold_defaults() -> SamplingParams {
    SamplingParams::for_task(Task::Gold)
}

fn summary_defaults() -> SamplingParams {
    SamplingParams::for_task(Task::Summary)
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            sentiment: sentiment_defaults(),
            gold: gold_defaults(),
            summary: summary_defaults(),
        }
    }
}

impl QueryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_task(&self, task: Task) -> &SamplingParams {
        match task {
            Task::Sentiment => &self.sentiment,
            Task::Gold => &self.gold,
            Task::Summary => &self.summary,
        }
    }

    /// Parameters for the task a dataset name resolves to.
    pub fn for_dataset(&self, dataset_name: &str) -> Result<&SamplingParams> {
        Ok(self.for_task(Task::dispatch(dataset_name)?))
    }

    pub fn with_task(mut self, task: Task, params: SamplingParams) -> Self {
        match task {
            Task::Sentiment => self.sentiment = params,
            Task::Gold => self.gold = params,
            Task::Summary => self.summary = params,
        }
        self
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for task in Task::ALL {
            self.for_task(task)
                .validate()
                .map_err(|e| TallyError::Config(format!("{task}: {e}")))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_defaults_differ() {
        let config = QueryConfig::default();
        assert_eq!(config.sentiment.max_new_tokens, 16);
        assert_eq!(config.gold.max_new_tokens, 256);
        assert_eq!(config.summary.max_context_length, Some(4096));
        assert!(config.sentiment.max_context_length.is_none());
    }

    #[test]
    fn generation_strips_retry_and_context_fields() {
        let params = SamplingParams::for_task(Task::Summary).with_retries(7, 1);
        let generation = serde_json::to_value(params.generation()).unwrap();
        let obj = generation.as_object().unwrap();
        assert!(!obj.contains_key("custom_max_retries"));
        assert!(!obj.contains_key("custom_retry_delay"));
        assert!(!obj.contains_key("max_context_length"));
        assert_eq!(obj["max_new_tokens"], 512);
    }

    #[test]
    fn retry_policy_from_params() {
        let policy = SamplingParams::for_task(Task::Gold).with_retries(4, 2).retry_policy();
        assert_eq!(policy.max_attempts, 4);
        assert_eq!(policy.delay, Duration::from_secs(2));
    }

    #[test]
    fn for_dataset_dispatches() {
        let config = QueryConfig::default();
        let params = config.for_dataset("news_gold_v2").unwrap();
        assert_eq!(params, &config.gold);
        assert!(config.for_dataset("mnist").is_err());
    }

    #[test]
    fn with_task_replaces_one_task() {
        let config = QueryConfig::new()
            .with_task(Task::Sentiment, SamplingParams::for_task(Task::Sentiment).with_seed(7));
        assert_eq!(config.sentiment.seed, 7);
        assert_eq!(config.gold.seed, 42);
    }

    #[test]
    fn from_yaml_partial_override() {
        let yaml = r#"
sentiment:
  temperature: 0.0
  top_p: 1.0
  top_k: 1
  max_new_tokens: 4
  seed: 1
"#;
        let config = QueryConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.sentiment.temperature, 0.0);
        assert_eq!(config.sentiment.custom_max_retries, 3);
        assert!(config.sentiment.do_sample);
        assert_eq!(config.summary, SamplingParams::for_task(Task::Summary));
    }

    #[test]
    fn from_json_rejects_bad_temperature() {
        let json = r#"{"gold": {"temperature": 5.0, "top_p": 0.9, "top_k": 40, "max_new_tokens": 10, "seed": 1}}"#;
        let err = QueryConfig::from_json(json).unwrap_err();
        assert!(matches!(err, TallyError::Config(ref msg) if msg.starts_with("gold")));
    }

    #[test]
    fn serde_roundtrip() {
        let config = QueryConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back = QueryConfig::from_json(&json).unwrap();
        assert_eq!(back, config);
    }
}
