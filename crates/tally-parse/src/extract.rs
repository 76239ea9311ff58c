use std::borrow::Cow;

use rand::Rng;

use tally_core::label::Label;
use tally_core::task::Task;

use crate::clean::clean_summary;
use crate::gold::extract_gold;
use crate::sentiment::extract_sentiment_with;

/// Remove task-specific boilerplate from a raw response.
///
/// Only summaries are rewritten; sentiment and gold output is handed to
/// extraction untouched. A missing response stays missing.
pub fn clean(task: Task, raw: Option<&str>) -> Option<Cow<'_, str>> {
    let raw = raw?;
    match task {
        Task::Summary => Some(Cow::Owned(clean_summary(raw))),
        Task::Sentiment | Task::Gold => Some(Cow::Borrowed(raw)),
    }
}

/// Turn cleaned output into the task's structured label.
///
/// Never fails; unreadable output becomes the task's invalid label.
pub fn extract_with<R: Rng>(task: Task, cleaned: Option<&str>, rng: &mut R) -> Label {
    match task {
        Task::Sentiment => Label::Sentiment(extract_sentiment_with(cleaned, rng)),
        Task::Gold => Label::Gold(extract_gold(cleaned)),
        Task::Summary => {
            if cleaned.is_none() {
                tracing::warn!("received no summary text");
            }
            Label::Summary(cleaned.unwrap_or_default().to_string())
        }
    }
}

/// [`extract_with`] using the thread-local RNG.
pub fn extract(task: Task, cleaned: Option<&str>) -> Label {
    extract_with(task, cleaned, &mut rand::thread_rng())
}

/// Clean and extract in one step.
pub fn parse_response_with<R: Rng>(task: Task, raw: Option<&str>, rng: &mut R) -> Label {
    let cleaned = clean(task, raw);
    extract_with(task, cleaned.as_deref(), rng)
}

/// [`parse_response_with`] using the thread-local RNG.
pub fn parse_response(task: Task, raw: Option<&str>) -> Label {
    parse_response_with(task, raw, &mut rand::thread_rng())
}
