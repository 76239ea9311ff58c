use std::fmt;
use std::ops::Index;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::task::Task;

/// Sentiment class, serialized as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
    /// The output named no sentiment at all.
    Invalid,
}

impl Sentiment {
    /// The three real classes, in code order.
    pub const CLASSES: [Sentiment; 3] = [Sentiment::Negative, Sentiment::Neutral, Sentiment::Positive];

    pub fn code(self) -> i8 {
        match self {
            Sentiment::Negative => 0,
            Sentiment::Neutral => 1,
            Sentiment::Positive => 2,
            Sentiment::Invalid => -1,
        }
    }

    /// Lowercase keyword for a real class, `None` for `Invalid`.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Sentiment::Negative => Some("negative"),
            Sentiment::Neutral => Some("neutral"),
            Sentiment::Positive => Some("positive"),
            Sentiment::Invalid => None,
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Sentiment> {
        Self::CLASSES
            .into_iter()
            .find(|class| class.keyword() == Some(keyword))
    }

    pub fn is_valid(self) -> bool {
        self != Sentiment::Invalid
    }
}

impl From<Sentiment> for i8 {
    fn from(value: Sentiment) -> Self {
        value.code()
    }
}

impl TryFrom<i8> for Sentiment {
    type Error = String;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Sentiment::Negative),
            1 => Ok(Sentiment::Neutral),
            2 => Ok(Sentiment::Positive),
            -1 => Ok(Sentiment::Invalid),
            other => Err(format!("invalid sentiment code: {other}")),
        }
    }
}

/// One of the nine binary questions of the gold news classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoldKey {
    PriceOrNot,
    PriceUp,
    PriceConstStable,
    PriceDown,
    PastPriceInfo,
    FuturePriceInfo,
    PastGenInfo,
    FutureGenInfo,
    AssetComparison,
}

impl GoldKey {
    pub const ALL: [GoldKey; 9] = [
        GoldKey::PriceOrNot,
        GoldKey::PriceUp,
        GoldKey::PriceConstStable,
        GoldKey::PriceDown,
        GoldKey::PastPriceInfo,
        GoldKey::FuturePriceInfo,
        GoldKey::PastGenInfo,
        GoldKey::FutureGenInfo,
        GoldKey::AssetComparison,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GoldKey::PriceOrNot => "price_or_not",
            GoldKey::PriceUp => "price_up",
            GoldKey::PriceConstStable => "price_const_stable",
            GoldKey::PriceDown => "price_down",
            GoldKey::PastPriceInfo => "past_price_info",
            GoldKey::FuturePriceInfo => "future_price_info",
            GoldKey::PastGenInfo => "past_gen_info",
            GoldKey::FutureGenInfo => "future_gen_info",
            GoldKey::AssetComparison => "asset_comparison",
        }
    }

    pub fn from_name(name: &str) -> Option<GoldKey> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for GoldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a single gold key, serialized as `0`, `1` or `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum GoldFlag {
    No,
    Yes,
    #[default]
    Invalid,
}

impl GoldFlag {
    pub fn code(self) -> i8 {
        match self {
            GoldFlag::No => 0,
            GoldFlag::Yes => 1,
            GoldFlag::Invalid => -1,
        }
    }

    /// Interpret a parsed JSON value as a flag.
    ///
    /// Only values numerically equal to 0 or 1 count, which includes
    /// `0.0`/`1.0` and booleans. Anything else is `Invalid`.
    pub fn from_value(value: &Value) -> GoldFlag {
        match value {
            Value::Bool(true) => GoldFlag::Yes,
            Value::Bool(false) => GoldFlag::No,
            Value::Number(n) => match n.as_f64() {
                Some(v) if v == 0.0 => GoldFlag::No,
                Some(v) if v == 1.0 => GoldFlag::Yes,
                _ => GoldFlag::Invalid,
            },
            _ => GoldFlag::Invalid,
        }
    }
}

impl From<GoldFlag> for i8 {
    fn from(value: GoldFlag) -> Self {
        value.code()
    }
}

impl TryFrom<i8> for GoldFlag {
    type Error = String;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(GoldFlag::No),
            1 => Ok(GoldFlag::Yes),
            -1 => Ok(GoldFlag::Invalid),
            other => Err(format!("invalid gold flag: {other}")),
        }
    }
}

/// A gold classification. All nine keys are always present.
///
/// Deserializes from any JSON object: missing keys and values other than
/// 0/1 become `-1`, unknown keys are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct GoldLabel {
    flags: [GoldFlag; 9],
}

impl GoldLabel {
    /// A label with every key set to `-1`.
    pub fn invalid() -> Self {
        Self::default()
    }

    /// Build a label from key/flag pairs; keys not mentioned stay `-1`.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (GoldKey, GoldFlag)>) -> Self {
        let mut label = Self::invalid();
        for (key, flag) in pairs {
            label.set(key, flag);
        }
        label
    }

    /// Read the nine keys out of a JSON object. Missing keys and values
    /// other than 0/1 stay `-1`; other entries are ignored.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self::from_pairs(
            GoldKey::ALL
                .into_iter()
                .filter_map(|key| map.get(key.as_str()).map(|v| (key, GoldFlag::from_value(v)))),
        )
    }

    pub fn get(&self, key: GoldKey) -> GoldFlag {
        self.flags[key.index()]
    }

    pub fn set(&mut self, key: GoldKey, flag: GoldFlag) {
        self.flags[key.index()] = flag;
    }

    pub fn with(mut self, key: GoldKey, flag: GoldFlag) -> Self {
        self.set(key, flag);
        self
    }

    /// Iterate over all nine keys in their fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (GoldKey, GoldFlag)> + '_ {
        GoldKey::ALL.into_iter().map(move |key| (key, self.get(key)))
    }

    /// Number of keys holding a 0/1 value.
    pub fn valid_count(&self) -> usize {
        self.flags.iter().filter(|f| **f != GoldFlag::Invalid).count()
    }

    pub fn is_fully_valid(&self) -> bool {
        self.valid_count() == GoldKey::ALL.len()
    }
}

impl Index<GoldKey> for GoldLabel {
    type Output = GoldFlag;

    fn index(&self, key: GoldKey) -> &Self::Output {
        &self.flags[key.index()]
    }
}

impl From<Map<String, Value>> for GoldLabel {
    fn from(map: Map<String, Value>) -> Self {
        Self::from_map(&map)
    }
}

impl Serialize for GoldLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(GoldKey::ALL.len()))?;
        for (key, flag) in self.iter() {
            map.serialize_entry(key.as_str(), &flag)?;
        }
        map.end()
    }
}

/// A structured label of any task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Sentiment(Sentiment),
    Gold(GoldLabel),
    Summary(String),
}

impl Label {
    pub fn task(&self) -> Task {
        match self {
            Label::Sentiment(_) => Task::Sentiment,
            Label::Gold(_) => Task::Gold,
            Label::Summary(_) => Task::Summary,
        }
    }

    /// Whether the label carries no invalid sentinel (or, for summaries,
    /// any text at all).
    pub fn is_valid(&self) -> bool {
        match self {
            Label::Sentiment(s) => s.is_valid(),
            Label::Gold(g) => g.is_fully_valid(),
            Label::Summary(text) => !text.is_empty(),
        }
    }
}

impl From<Sentiment> for Label {
    fn from(value: Sentiment) -> Self {
        Label::Sentiment(value)
    }
}

impl From<GoldLabel> for Label {
    fn from(value: GoldLabel) -> Self {
        Label::Gold(value)
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Label::Summary(value)
    }
}
