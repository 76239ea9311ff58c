use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::future::join_all;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tally_core::config::QueryConfig;
use tally_core::consensus::vote_labels;
use tally_core::error::{Result, TallyError};
use tally_core::label::Label;
use tally_core::model::{InferenceProvider, InferenceRequest};
use tally_core::task::Task;
use tally_parse::extract::parse_response_with;

use crate::dataset::Dataset;
use crate::evaluator::{EvalScore, Evaluator};
use crate::prompt::PromptBook;
use crate::tracking::{NoopSink, SampleRecord, TrackingSink};

/// One sampled response and the label parsed from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleOutcome {
    pub raw_response: Option<String>,
    pub label: Label,
}

/// Result for a single example: every sample, the vote and its scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExampleResult {
    pub example_id: String,
    pub samples: Vec<SampleOutcome>,
    pub consensus: Label,
    pub scores: Vec<EvalScore>,
    /// Wall time for drawing all samples of the example.
    pub latency_ms: u64,
}

/// Summary report of a self-consistency run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    pub run_id: Uuid,
    pub dataset_name: String,
    pub task: Task,
    pub model: String,
    pub total_examples: usize,
    pub samples_per_example: usize,
    pub results: Vec<ExampleResult>,
    pub aggregate_scores: HashMap<String, f64>,
    /// Share of individual samples that parsed to an invalid label.
    pub invalid_sample_rate: f64,
    pub mean_latency_ms: f64,
}

/// Samples each example N times, parses every response and votes.
///
/// Provider errors abort the run; wrap the provider in a
/// [`RetryingProvider`](crate::retry::RetryingProvider) to turn exhausted
/// retries into invalid samples instead.
pub struct SelfConsistencyRunner {
    provider: Arc<dyn InferenceProvider>,
    prompts: PromptBook,
    config: QueryConfig,
    evaluators: Vec<Box<dyn Evaluator>>,
    sink: Arc<dyn TrackingSink>,
    samples: usize,
    strip_prompt_echo: bool,
}

impl SelfConsistencyRunner {
    pub fn new(provider: Arc<dyn InferenceProvider>) -> Self {
        Self {
            provider,
            prompts: PromptBook::default(),
            config: QueryConfig::default(),
            evaluators: Vec::new(),
            sink: Arc::new(NoopSink),
            samples: 1,
            strip_prompt_echo: false,
        }
    }

    pub fn with_prompts(mut self, prompts: PromptBook) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn add_evaluator(mut self, eval: impl Evaluator + 'static) -> Self {
        self.evaluators.push(Box::new(eval));
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn TrackingSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Number of samples drawn per example. 1 disables voting in effect.
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Keep only the text after the task's separator when a backend echoes
    /// the prompt back.
    pub fn with_prompt_echo_stripping(mut self, strip: bool) -> Self {
        self.strip_prompt_echo = strip;
        self
    }

    /// Run the dataset through the provider and vote per example.
    pub async fn run(&self, model: &str, dataset: &Dataset) -> Result<EvalReport> {
        let task = dataset.task()?;
        if self.samples == 0 {
            return Err(TallyError::Config(
                "samples per example must be positive".into(),
            ));
        }
        let params = self.config.for_task(task);
        params.validate()?;

        let mut rng = StdRng::seed_from_u64(params.seed);
        let run_id = Uuid::new_v4();
        tracing::info!(
            %run_id,
            dataset = %dataset.name,
            %task,
            model,
            samples = self.samples,
            examples = dataset.len(),
            "starting run"
        );

        let mut results = Vec::with_capacity(dataset.len());
        let mut invalid_samples = 0usize;

        for example in &dataset.examples {
            let prompt = self.prompts.render(task, &example.input)?;
            let requests: Vec<InferenceRequest> = (0..self.samples)
                .map(|i| {
                    let sample_params = params
                        .clone()
                        .with_seed(params.seed.wrapping_add(i as u64));
                    InferenceRequest::new(task, model, prompt.clone(), &sample_params)
                })
                .collect();

            let start = Instant::now();
            let responses =
                join_all(requests.iter().map(|request| self.provider.generate(request))).await;
            let latency_ms = start.elapsed().as_millis() as u64;

            let mut samples = Vec::with_capacity(self.samples);
            for (sample_index, response) in responses.into_iter().enumerate() {
                let raw = response?;
                let raw = if self.strip_prompt_echo {
                    raw.map(|text| strip_echo(task, text))
                } else {
                    raw
                };
                let label = parse_response_with(task, raw.as_deref(), &mut rng);
                if !label.is_valid() {
                    invalid_samples += 1;
                }
                self.sink.record(&SampleRecord {
                    run_id,
                    dataset: dataset.name.clone(),
                    example_id: example.id.clone(),
                    model: model.to_string(),
                    sample_index,
                    raw_response: raw.clone(),
                    label: label.clone(),
                    recorded_at: Utc::now(),
                });
                samples.push(SampleOutcome {
                    raw_response: raw,
                    label,
                });
            }

            let labels: Vec<Label> = samples.iter().map(|s| s.label.clone()).collect();
            let consensus = vote_labels(task, &labels, &mut rng)?;
            let scores = self
                .evaluators
                .iter()
                .map(|evaluator| evaluator.evaluate(example, &consensus))
                .collect();

            results.push(ExampleResult {
                example_id: example.id.clone(),
                samples,
                consensus,
                scores,
                latency_ms,
            });
        }

        let mut aggregate_scores = HashMap::new();
        for evaluator in &self.evaluators {
            let name = evaluator.name();
            let values: Vec<f64> = results
                .iter()
                .flat_map(|r| r.scores.iter())
                .filter(|s| s.metric == name)
                .map(|s| s.value)
                .collect();
            if !values.is_empty() {
                aggregate_scores.insert(
                    name.to_string(),
                    values.iter().sum::<f64>() / values.len() as f64,
                );
            }
        }

        let total_samples = results.len() * self.samples;
        let invalid_sample_rate = if total_samples == 0 {
            0.0
        } else {
            invalid_samples as f64 / total_samples as f64
        };
        let mean_latency_ms = if results.is_empty() {
            0.0
        } else {
            results.iter().map(|r| r.latency_ms as f64).sum::<f64>() / results.len() as f64
        };

        tracing::info!(
            %run_id,
            examples = results.len(),
            invalid_sample_rate,
            "run finished"
        );

        Ok(EvalReport {
            run_id,
            dataset_name: dataset.name.clone(),
            task,
            model: model.to_string(),
            total_examples: dataset.len(),
            samples_per_example: self.samples,
            results,
            aggregate_scores,
            invalid_sample_rate,
            mean_latency_ms,
        })
    }
}

fn strip_echo(task: Task, text: String) -> String {
    match task.completion_after_separator(&text) {
        Some(completion) => completion.to_string(),
        None => text,
    }
}
