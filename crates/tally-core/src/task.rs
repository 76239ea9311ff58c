use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TallyError};

/// The evaluation task a dataset belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    Sentiment,
    Gold,
    Summary,
}

impl Task {
    /// All tasks, in dispatch order.
    pub const ALL: [Task; 3] = [Task::Sentiment, Task::Gold, Task::Summary];

    /// Resolve a free-form dataset name to its task.
    ///
    /// Keywords are checked case-sensitively in the order `sentiment`,
    /// `gold`, `summary`; a name containing several keywords resolves to the
    /// first one in that order.
    pub fn dispatch(dataset_name: &str) -> Result<Task> {
        Self::ALL
            .into_iter()
            .find(|task| dataset_name.contains(task.keyword()))
            .ok_or_else(|| TallyError::UnknownDataset(dataset_name.to_string()))
    }

    /// The substring that identifies this task in a dataset name.
    pub fn keyword(&self) -> &'static str {
        match self {
            Task::Sentiment => "sentiment",
            Task::Gold => "gold",
            Task::Summary => "summary",
        }
    }

    /// Marker the prompt ends with; the model's answer follows it.
    pub fn prompt_separator(&self) -> &'static str {
        match self {
            Task::Sentiment => "Final Label: ",
            Task::Gold => "FINAL CLASSIFICATION: ",
            Task::Summary => "FINAL SUMMARY OF YOUR TEXT: ",
        }
    }

    /// Phrases at which generation should stop.
    pub fn stop_words(&self) -> &'static [&'static str] {
        match self {
            Task::Sentiment => &["text:"],
            Task::Gold => &["end of classification", "}"],
            Task::Summary => &["please let me know if", "i hope it is correct"],
        }
    }

    /// Return the completion that follows the prompt separator in text that
    /// echoes the prompt, or `None` when the separator is absent.
    pub fn completion_after_separator<'a>(&self, generated: &'a str) -> Option<&'a str> {
        let separator = self.prompt_separator();
        generated
            .find(separator)
            .map(|pos| generated[pos + separator.len()..].trim())
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Task {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self> {
        Task::dispatch(s)
    }
}
