//! External System Integrations
//!
//! Traits for the collaborators a parsed command is dispatched to: the
//! shopping list backend and the user-facing notifier. The backend is
//! asynchronous and fallible; the notifier is fire-and-forget.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Integration errors
#[derive(Error, Debug)]
pub enum IntegrationError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Timed out after {0}ms")]
    Timeout(u64),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntegrationError {
    /// Short label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectionFailed(_) => "connection_failed",
            Self::NotFound(_) => "not_found",
            Self::InvalidRequest(_) => "invalid_request",
            Self::RateLimited => "rate_limited",
            Self::Timeout(_) => "timeout",
            Self::Storage(_) => "storage",
            Self::Internal(_) => "internal",
        }
    }
}

// ============================================================================
// Shopping list
// ============================================================================

/// Item category, assigned by keyword when an item is first added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Dairy,
    Produce,
    Snacks,
    Household,
    Grains,
    #[default]
    Other,
}

impl Category {
    const KEYWORDS: &'static [(Category, &'static [&'static str])] = &[
        (Category::Dairy, &["milk", "cheese", "butter", "yogurt", "ghee", "दूध", "पनीर", "मक्खन", "दही", "घी"]),
        (
            Category::Produce,
            &[
                "apple", "banana", "mango", "orange", "watermelon", "corn", "tomato", "onion", "potato",
                "lettuce", "आम", "केले", "केला", "सेब", "आलू", "प्याज", "टमाटर",
            ],
        ),
        (Category::Snacks, &["chips", "cookies", "chocolate", "snack", "soda", "बिस्कुट", "नमकीन"]),
        (Category::Household, &["toothpaste", "soap", "shampoo", "detergent", "साबुन", "शैम्पू", "टूथपेस्ट"]),
        (Category::Grains, &["rice", "wheat", "bread", "pasta", "चावल", "गेहूं", "आटा", "ब्रेड"]),
    ];

    /// Categorize an item name by substring keyword
    pub fn for_item(item: &str) -> Self {
        let item = item.to_lowercase();
        Self::KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| item.contains(k)))
            .map(|(category, _)| *category)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dairy => "dairy",
            Self::Produce => "produce",
            Self::Snacks => "snacks",
            Self::Household => "household",
            Self::Grains => "grains",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub item: String,
    pub quantity: u32,
    #[serde(default)]
    pub category: Category,
}

/// Catalog product returned by search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub item: String,
    pub brand: String,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Catalog search request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text query, matched against item and brand (may be empty)
    pub text: String,
    /// Price ceiling, inclusive
    pub max_price: Option<f64>,
    /// Brand filter, substring match
    pub brand: Option<String>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Why an item is being suggested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    History,
    Seasonal,
    Sale,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub item: String,
}

/// Suggestions plus a substitute map (item → healthier/available alternative)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Suggestions {
    pub suggestions: Vec<Suggestion>,
    pub substitutes: std::collections::BTreeMap<String, String>,
}

/// Shopping list backend
///
/// Mutations return the full list after the change. Removing an item that
/// is not on the list is not an error.
#[async_trait]
pub trait ShoppingListIntegration: Send + Sync {
    /// Add `quantity` of `name`, merging with an existing entry
    async fn add_item(&self, name: &str, quantity: u32) -> Result<Vec<ListItem>, IntegrationError>;

    /// Remove `name` from the list
    async fn remove_item(&self, name: &str) -> Result<Vec<ListItem>, IntegrationError>;

    /// Search the product catalog, cheapest first
    async fn search_items(&self, query: &SearchQuery) -> Result<Vec<Product>, IntegrationError>;

    /// Current list
    async fn list_items(&self) -> Result<Vec<ListItem>, IntegrationError>;

    /// Empty the list
    async fn clear(&self) -> Result<Vec<ListItem>, IntegrationError>;

    /// Shopping suggestions and substitutes
    async fn suggestions(&self) -> Result<Suggestions, IntegrationError>;
}

// ============================================================================
// Notifications
// ============================================================================

/// User-facing message sink (toast, speech, console)
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Notifier that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::info!(message = %message, "User notification");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_keywords() {
        assert_eq!(Category::for_item("almond milk"), Category::Dairy);
        assert_eq!(Category::for_item("Organic Apples"), Category::Produce);
        assert_eq!(Category::for_item("chips"), Category::Snacks);
        assert_eq!(Category::for_item("colgate toothpaste"), Category::Household);
        assert_eq!(Category::for_item("multigrain bread"), Category::Grains);
        assert_eq!(Category::for_item("batteries"), Category::Other);
        assert_eq!(Category::for_item("आम"), Category::Produce);
        assert_eq!(Category::for_item("दूध"), Category::Dairy);
    }

    #[test]
    fn test_list_item_wire_format() {
        let item = ListItem {
            item: "milk".to_string(),
            quantity: 2,
            category: Category::Dairy,
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"item": "milk", "quantity": 2, "category": "dairy"})
        );
    }

    #[test]
    fn test_suggestion_wire_format() {
        let suggestion: Suggestion =
            serde_json::from_str(r#"{"type": "seasonal", "item": "mangoes"}"#).unwrap();
        assert_eq!(suggestion.kind, SuggestionKind::Seasonal);
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(IntegrationError::Timeout(5).kind(), "timeout");
        assert_eq!(IntegrationError::Timeout(5).to_string(), "Timed out after 5ms");
    }
}
