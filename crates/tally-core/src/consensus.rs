//! Task-level consensus over a collection of sampled labels.

use rand::Rng;

use crate::error::{Result, TallyError};
use crate::label::{GoldLabel, Label, Sentiment};
use crate::task::Task;
use crate::vote::{majority_vote, vote_per_key};

/// # Panics
///
/// Panics if `labels` is empty.
pub fn vote_sentiment<R: Rng>(labels: &[Sentiment], rng: &mut R) -> Sentiment {
    majority_vote(labels, rng)
}

/// Vote each of the nine gold keys independently. No consistency between
/// keys is enforced.
pub fn vote_gold<R: Rng>(labels: &[GoldLabel], rng: &mut R) -> GoldLabel {
    let winners = vote_per_key(labels.iter().map(GoldLabel::iter), rng);
    GoldLabel::from_pairs(winners)
}

/// # Panics
///
/// Panics if `summaries` is empty.
pub fn vote_summary<R: Rng>(summaries: &[String], rng: &mut R) -> String {
    majority_vote(summaries, rng)
}

/// Vote over labels of `task`.
///
/// Fails when the collection is empty or holds a label of another task.
pub fn vote_labels<R: Rng>(task: Task, labels: &[Label], rng: &mut R) -> Result<Label> {
    if labels.is_empty() {
        return Err(TallyError::EmptyCollection);
    }
    let mismatch = |found: &Label| TallyError::LabelMismatch {
        expected: task,
        found: found.task(),
    };

    let consensus = match task {
        Task::Sentiment => {
            let values = labels
                .iter()
                .map(|label| match label {
                    Label::Sentiment(s) => Ok(*s),
                    other => Err(mismatch(other)),
                })
                .collect::<Result<Vec<_>>>()?;
            Label::Sentiment(vote_sentiment(&values, rng))
        }
        Task::Gold => {
            let values = labels
                .iter()
                .map(|label| match label {
                    Label::Gold(g) => Ok(*g),
                    other => Err(mismatch(other)),
                })
                .collect::<Result<Vec<_>>>()?;
            Label::Gold(vote_gold(&values, rng))
        }
        Task::Summary => {
            let values = labels
                .iter()
                .map(|label| match label {
                    Label::Summary(text) => Ok(text.clone()),
                    other => Err(mismatch(other)),
                })
                .collect::<Result<Vec<_>>>()?;
            Label::Summary(vote_summary(&values, rng))
        }
    };

    tracing::debug!(%task, samples = labels.len(), "voted consensus label");
    Ok(consensus)
}
