//! Command types produced by the interpretation engine
//!
//! A [`ParsedCommand`] is a plain value: it is built once per utterance,
//! handed to the dispatcher by reference and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// A single recognized speech/text input plus its language tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    /// Raw transcript or typed text
    pub text: String,
    /// Loosely BCP-47 tag reported by the capture layer (e.g. `hi-IN`)
    pub language_tag: String,
}

impl Utterance {
    pub fn new(text: impl Into<String>, language_tag: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language_tag: language_tag.into(),
        }
    }
}

/// Closed set of actions a command can express
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    AddItem,
    RemoveItem,
    Search,
    #[default]
    Unknown,
}

impl Intent {
    /// Stable identifier used in logs and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddItem => "ADD_ITEM",
            Self::RemoveItem => "REMOVE_ITEM",
            Self::Search => "SEARCH",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Whether dispatching this intent changes list state
    pub fn is_state_changing(&self) -> bool {
        matches!(self, Self::AddItem | Self::RemoveItem)
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured command extracted from one utterance
///
/// Construct through [`ParsedCommand::add`], [`ParsedCommand::remove`],
/// [`ParsedCommand::search`] or [`ParsedCommand::unknown`] so the per-intent
/// slot invariants hold: `item` is non-empty for add/remove, `query` is
/// present for search and `quantity` is never below 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedCommand {
    pub intent: Intent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Price ceiling with any currency marker discarded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

impl ParsedCommand {
    /// Add `quantity` of `item`; returns an unknown command when `item` is empty
    pub fn add(item: impl Into<String>, quantity: u32) -> Self {
        let item = item.into();
        if item.is_empty() {
            return Self::unknown();
        }
        Self {
            intent: Intent::AddItem,
            item: Some(item),
            quantity: quantity.max(1),
            ..Self::unknown()
        }
    }

    /// Remove `item`; returns an unknown command when `item` is empty
    pub fn remove(item: impl Into<String>) -> Self {
        let item = item.into();
        if item.is_empty() {
            return Self::unknown();
        }
        Self {
            intent: Intent::RemoveItem,
            item: Some(item),
            ..Self::unknown()
        }
    }

    /// Search the catalog; negative or non-finite prices are dropped
    pub fn search(query: impl Into<String>, price: Option<f64>, brand: Option<String>) -> Self {
        Self {
            intent: Intent::Search,
            query: Some(query.into()),
            price: price.filter(|p| p.is_finite() && *p >= 0.0),
            brand: brand.filter(|b| !b.is_empty()),
            ..Self::unknown()
        }
    }

    /// Utterance that matched no rule; carries no slots
    pub fn unknown() -> Self {
        Self {
            intent: Intent::Unknown,
            item: None,
            quantity: 1,
            query: None,
            price: None,
            brand: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.intent == Intent::Unknown
    }
}

impl Default for ParsedCommand {
    fn default() -> Self {
        Self::unknown()
    }
}
