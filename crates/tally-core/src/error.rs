use thiserror::Error;

use crate::task::Task;

/// Top-level error type for the tally workspace.
///
/// Unparseable model output is never an error: it degrades to the task's
/// invalid label. Only the conditions below halt a caller.
#[derive(Debug, Error)]
pub enum TallyError {
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    #[error("Label mismatch: expected a {expected} label, found a {found} label")]
    LabelMismatch { expected: Task, found: Task },

    #[error("Cannot vote over an empty label collection")]
    EmptyCollection,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Template error: {0}")]
    Template(String),

    #[error("Missing variable: {0}")]
    MissingVariable(String),
}

pub type Result<T> = std::result::Result<T, TallyError>;
