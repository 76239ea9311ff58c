use std::collections::HashMap;

use tally_core::error::{PromptError, Result};
use tally_core::task::Task;

const SENTIMENT_TEMPLATE: &str = "Classify the sentiment of the following financial text as \
negative, neutral or positive. Answer with exactly one word.\n\n\
Text: {input}\n\n";

const GOLD_TEMPLATE: &str = "Read the news headline about gold and answer each question with 1 \
(yes) or 0 (no). Does the headline talk about the price? Does the price go up? Does it stay \
constant? Does it go down? Does it mention past prices? Future prices? Past general events? \
Future general events? Does it compare gold with another asset?\n\
Return a JSON object with exactly these keys: {{\"price_or_not\": 0, \"price_up\": 0, \
\"price_const_stable\": 0, \"price_down\": 0, \"past_price_info\": 0, \"future_price_info\": 0, \
\"past_gen_info\": 0, \"future_gen_info\": 0, \"asset_comparison\": 0}}\n\n\
Headline: {input}\n\n";

const SUMMARY_TEMPLATE: &str = "Summarize the following text in a few short sentences. \
Do not add a title or any commentary.\n\n\
Text: {input}\n\n";

/// Per-task prompt templates.
///
/// Templates use `{variable}` placeholders (`{{` and `}}` for literal
/// braces). The rendered prompt always ends with the task's separator, so a
/// backend that echoes the prompt can be cut at that point.
#[derive(Debug, Clone)]
pub struct PromptBook {
    sentiment: String,
    gold: String,
    summary: String,
}

impl Default for PromptBook {
    fn default() -> Self {
        Self {
            sentiment: SENTIMENT_TEMPLATE.to_string(),
            gold: GOLD_TEMPLATE.to_string(),
            summary: SUMMARY_TEMPLATE.to_string(),
        }
    }
}

impl PromptBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the template for one task.
    pub fn with_template(mut self, task: Task, template: impl Into<String>) -> Self {
        let template = template.into();
        match task {
            Task::Sentiment => self.sentiment = template,
            Task::Gold => self.gold = template,
            Task::Summary => self.summary = template,
        }
        self
    }

    pub fn template(&self, task: Task) -> &str {
        match task {
            Task::Sentiment => &self.sentiment,
            Task::Gold => &self.gold,
            Task::Summary => &self.summary,
        }
    }

    /// Build the prompt for one example.
    pub fn render(&self, task: Task, input: &str) -> Result<String> {
        let variables = HashMap::from([("input", input)]);
        let mut prompt = substitute(self.template(task), &variables)?;
        prompt.push_str(task.prompt_separator());
        Ok(prompt)
    }
}

fn substitute(template: &str, variables: &HashMap<&str, &str>) -> Result<String> {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                result.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                result.push('}');
            }
            '{' => {
                let mut var_name = String::new();
                let mut found_close = false;
                for next_ch in chars.by_ref() {
                    if next_ch == '}' {
                        found_close = true;
                        break;
                    }
                    var_name.push(next_ch);
                }
                if !found_close {
                    return Err(PromptError::Template("unclosed '{' in template".into()).into());
                }
                let value = variables
                    .get(var_name.as_str())
                    .ok_or_else(|| PromptError::MissingVariable(var_name.clone()))?;
                result.push_str(value);
            }
            _ => result.push(ch),
        }
    }

    Ok(result)
}
