//! Gold classification extraction.
//!
//! Model output is turned into a candidate JSON object by the first
//! strategy that succeeds, in this order:
//!
//! 1. an already structured mapping is used as is
//! 2. code fences are stripped, then each `{...}` / `[...]` span is tried in
//!    order of appearance; the first JSON object holding a gold key wins
//! 3. the whole text as JSON
//! 4. the whole text as JSON after turning `'` into `"`
//! 5. loose `key: integer` pairs
//!
//! Later stages only run when every earlier one failed. The candidate is
//! then reduced to the nine gold keys, keeping only 0/1 values.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use tally_core::label::{GoldKey, GoldLabel};

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```(?:json|python)?\s*|\s*```").expect("invalid code fence regex")
});

static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)[{\[].*?[}\]]").expect("invalid bracket regex"));

static KEY_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""?(\w+)"?\s*:\s*(-?\d+)"#).expect("invalid key/value regex")
});

/// Input accepted by [`extract_gold`].
#[derive(Debug, Clone, Copy)]
pub enum GoldInput<'a> {
    Mapping(&'a Map<String, Value>),
    Text(&'a str),
    /// No output, or a value that is neither an object nor a string.
    Missing,
}

impl<'a> From<&'a str> for GoldInput<'a> {
    fn from(text: &'a str) -> Self {
        GoldInput::Text(text)
    }
}

impl<'a> From<Option<&'a str>> for GoldInput<'a> {
    fn from(text: Option<&'a str>) -> Self {
        text.map_or(GoldInput::Missing, GoldInput::Text)
    }
}

impl<'a> From<&'a Map<String, Value>> for GoldInput<'a> {
    fn from(map: &'a Map<String, Value>) -> Self {
        GoldInput::Mapping(map)
    }
}

impl<'a> From<&'a Value> for GoldInput<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => GoldInput::Mapping(map),
            Value::String(text) => GoldInput::Text(text),
            _ => GoldInput::Missing,
        }
    }
}

/// Extract a complete nine-key gold label. Never fails: anything that
/// cannot be read leaves the affected keys at `-1`.
pub fn extract_gold<'a>(input: impl Into<GoldInput<'a>>) -> GoldLabel {
    let candidate: Cow<'_, Map<String, Value>> = match input.into() {
        GoldInput::Mapping(map) => Cow::Borrowed(map),
        GoldInput::Text(text) => Cow::Owned(parse_candidate(text)),
        GoldInput::Missing => Cow::Owned(Map::new()),
    };

    let label = GoldLabel::from_map(&candidate);
    if label.valid_count() == 0 {
        tracing::warn!("no valid gold keys found, marking all keys as invalid");
    } else if !label.is_fully_valid() {
        tracing::debug!(
            valid = label.valid_count(),
            "gold output incomplete, missing keys marked invalid"
        );
    }
    label
}

fn parse_candidate(text: &str) -> Map<String, Value> {
    let cleaned = CODE_FENCE.replace_all(text, "");

    for span in BRACKETED.find_iter(&cleaned) {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(span.as_str()) {
            if has_gold_key(&map) {
                tracing::debug!("gold candidate found in bracketed span");
                return map;
            }
        }
    }

    if let Ok(value) = serde_json::from_str::<Value>(&cleaned) {
        tracing::debug!("gold candidate parsed from whole text");
        return object_or_empty(value);
    }

    let requoted = cleaned.replace('\'', "\"");
    if let Ok(value) = serde_json::from_str::<Value>(&requoted) {
        tracing::debug!("gold candidate parsed after quote substitution");
        return object_or_empty(value);
    }

    tracing::debug!("falling back to key/value pattern extraction");
    KEY_VALUE
        .captures_iter(&requoted)
        .map(|caps| {
            let value = caps[2].parse::<i64>().map_or(Value::Null, Value::from);
            (caps[1].to_string(), value)
        })
        .collect()
}

fn has_gold_key(map: &Map<String, Value>) -> bool {
    GoldKey::ALL.iter().any(|key| map.contains_key(key.as_str()))
}

fn object_or_empty(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
