use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use tally_core::config::{QueryConfig, SamplingParams};
use tally_core::consensus::vote_labels;
use tally_core::label::Label;
use tally_core::task::Task;
use tally_parse::extract::parse_response_with;

/// Read a file, or stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Parse a JSON array of raw responses (`null` for missing output).
pub fn parse_responses(dataset: &str, input: &str, seed: u64) -> Result<Vec<Label>> {
    let task = Task::dispatch(dataset)?;
    let raw: Vec<Option<String>> =
        serde_json::from_str(input).context("expected a JSON array of responses")?;
    let mut rng = StdRng::seed_from_u64(seed);
    Ok(raw
        .iter()
        .map(|response| parse_response_with(task, response.as_deref(), &mut rng))
        .collect())
}

/// Parse each group of samples and vote one consensus per group.
pub fn vote_groups(dataset: &str, input: &str, seed: u64) -> Result<Vec<Label>> {
    let task = Task::dispatch(dataset)?;
    let groups: Vec<Vec<Option<String>>> = serde_json::from_str(input)
        .context("expected a JSON array of response arrays")?;
    let mut rng = StdRng::seed_from_u64(seed);

    groups
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let labels: Vec<Label> = group
                .iter()
                .map(|response| parse_response_with(task, response.as_deref(), &mut rng))
                .collect();
            let consensus = vote_labels(task, &labels, &mut rng)
                .with_context(|| format!("group {i}"))?;
            tracing::debug!(group = i, samples = labels.len(), "voted");
            Ok(consensus)
        })
        .collect()
}

/// Sampling parameters for a dataset, from a YAML or JSON config or the
/// built-in defaults.
pub fn resolve_params(dataset: &str, config: Option<&Path>) -> Result<SamplingParams> {
    let config = match config {
        Some(path) => QueryConfig::from_yaml(&read_input(Some(path))?)
            .with_context(|| format!("invalid config {}", path.display()))?,
        None => QueryConfig::default(),
    };
    Ok(config.for_dataset(dataset)?.clone())
}
