pub mod dataset;
pub mod evaluator;
pub mod mock;
pub mod prompt;
pub mod retry;
pub mod runner;
pub mod tracking;

pub mod prelude {
    pub use crate::dataset::{Dataset, Example};
    pub use crate::evaluator::{
        EvalScore, Evaluator, ExactMatchEvaluator, GoldKeyAccuracyEvaluator, ValidityEvaluator,
    };
    pub use crate::mock::ScriptedProvider;
    pub use crate::prompt::PromptBook;
    pub use crate::retry::RetryingProvider;
    pub use crate::runner::{EvalReport, ExampleResult, SampleOutcome, SelfConsistencyRunner};
    pub use crate::tracking::{NoopSink, SampleRecord, TrackingSink, TracingSink};
}
