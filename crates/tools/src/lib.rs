//! Shopping list collaborators and command dispatch
//!
//! The interpreter produces a [`ParsedCommand`](voice_shop_core::ParsedCommand);
//! this crate carries it out against a list backend:
//! - [`Dispatcher`]: one backend (or notifier) call per command
//! - [`InMemoryShoppingList`]: local list with optional JSON persistence
//! - [`HttpShoppingList`]: client for the REST list service
//! - [`Catalog`]: product search for the local backend

pub mod catalog;
pub mod dispatcher;
pub mod http;
pub mod integrations;
pub mod memory;

pub use catalog::Catalog;
pub use dispatcher::{DispatchOutcome, Dispatcher, NOT_UNDERSTOOD_MESSAGE};
pub use http::HttpShoppingList;
pub use integrations::{
    Category, IntegrationError, ListItem, Notifier, Product, SearchQuery, ShoppingListIntegration,
    Suggestion, SuggestionKind, Suggestions, TracingNotifier,
};
pub use memory::{default_suggestions, InMemoryShoppingList};
