pub mod config;
pub mod consensus;
pub mod error;
pub mod label;
pub mod model;
pub mod task;
pub mod vote;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{GenerationParams, QueryConfig, RetryPolicy, SamplingParams};
    pub use crate::consensus::{vote_gold, vote_labels, vote_sentiment, vote_summary};
    pub use crate::error::{InferenceError, PromptError, Result, TallyError};
    pub use crate::label::{GoldFlag, GoldKey, GoldLabel, Label, Sentiment};
    pub use crate::model::{InferenceProvider, InferenceRequest};
    pub use crate::task::Task;
    pub use crate::vote::{majority_vote, vote_per_key};
}
