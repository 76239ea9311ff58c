use serde::{Deserialize, Serialize};
use serde_json::Value;

use tally_core::error::Result;
use tally_core::label::Label;
use tally_core::task::Task;

/// A single labeled example.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Example {
    /// Unique identifier for this example.
    pub id: String,
    /// Text inserted into the task prompt (sentence, headline or article).
    pub input: String,
    /// Reference label, if the dataset is labeled.
    #[serde(default)]
    pub expected: Option<Label>,
    /// Additional metadata (source, split, etc.)
    #[serde(default)]
    pub metadata: std::collections::HashMap<String, Value>,
}

impl Example {
    pub fn new(id: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            input: input.into(),
            expected: None,
            metadata: Default::default(),
        }
    }

    pub fn with_expected(mut self, expected: impl Into<Label>) -> Self {
        self.expected = Some(expected.into());
        self
    }
}

/// A named collection of examples. The name decides the task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Dataset name, e.g. `financial_sentiment_test`.
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub examples: Vec<Example>,
}

impl Dataset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            examples: Vec::new(),
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn add_example(&mut self, example: Example) -> &mut Self {
        self.examples.push(example);
        self
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// The task this dataset's name resolves to.
    pub fn task(&self) -> Result<Task> {
        Task::dispatch(&self.name)
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
