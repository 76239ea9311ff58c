use serde::{Deserialize, Serialize};

use tally_core::label::{GoldFlag, Label};

use crate::dataset::Example;

/// Score from an evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalScore {
    /// Score value, 0.0 to 1.0.
    pub value: f64,
    /// Name of the metric.
    pub metric: String,
    /// Optional explanation.
    #[serde(default)]
    pub explanation: Option<String>,
}

impl EvalScore {
    fn new(metric: &str, value: f64, explanation: impl Into<String>) -> Self {
        Self {
            value,
            metric: metric.to_string(),
            explanation: Some(explanation.into()),
        }
    }
}

/// Scores a consensus label against an example.
pub trait Evaluator: Send + Sync {
    /// Name of this evaluator.
    fn name(&self) -> &str;
    /// Evaluate the consensus label for the example.
    fn evaluate(&self, example: &Example, actual: &Label) -> EvalScore;
}

/// 1.0 when the consensus equals the reference label.
pub struct ExactMatchEvaluator;

impl Evaluator for ExactMatchEvaluator {
    fn name(&self) -> &str {
        "exact_match"
    }

    fn evaluate(&self, example: &Example, actual: &Label) -> EvalScore {
        match &example.expected {
            Some(expected) if expected == actual => EvalScore::new(self.name(), 1.0, "Exact match"),
            Some(_) => EvalScore::new(self.name(), 0.0, "No match"),
            None => EvalScore::new(self.name(), 0.0, "No expected value"),
        }
    }
}

/// Fraction of gold keys that agree with the reference, counted over the
/// keys the reference actually answers.
pub struct GoldKeyAccuracyEvaluator;

impl Evaluator for GoldKeyAccuracyEvaluator {
    fn name(&self) -> &str {
        "gold_key_accuracy"
    }

    fn evaluate(&self, example: &Example, actual: &Label) -> EvalScore {
        let (expected, actual) = match (&example.expected, actual) {
            (Some(Label::Gold(expected)), Label::Gold(actual)) => (expected, actual),
            (None, _) => return EvalScore::new(self.name(), 0.0, "No expected value"),
            _ => return EvalScore::new(self.name(), 0.0, "Not a gold label"),
        };

        let answered: Vec<_> = expected
            .iter()
            .filter(|(_, flag)| *flag != GoldFlag::Invalid)
            .collect();
        if answered.is_empty() {
            return EvalScore::new(self.name(), 0.0, "Reference has no answered keys");
        }

        let agreeing = answered
            .iter()
            .filter(|(key, flag)| actual.get(*key) == *flag)
            .count();
        let total = answered.len();
        EvalScore::new(
            self.name(),
            agreeing as f64 / total as f64,
            format!("{agreeing}/{total} keys agree"),
        )
    }
}

/// 1.0 when the consensus carries no invalid sentinel.
pub struct ValidityEvaluator;

impl Evaluator for ValidityEvaluator {
    fn name(&self) -> &str {
        "validity"
    }

    fn evaluate(&self, _example: &Example, actual: &Label) -> EvalScore {
        if actual.is_valid() {
            EvalScore::new(self.name(), 1.0, "Valid label")
        } else {
            EvalScore::new(self.name(), 0.0, "Invalid label")
        }
    }
}
