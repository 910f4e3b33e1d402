//! Command dispatch
//!
//! Routes a [`ParsedCommand`] to exactly one collaborator call. Failures
//! are returned to the caller and never touch the command itself.

use std::sync::Arc;

use voice_shop_core::{Intent, ParsedCommand};

use crate::integrations::{
    IntegrationError, ListItem, Notifier, Product, SearchQuery, ShoppingListIntegration,
};

/// Message shown when an utterance could not be interpreted
pub const NOT_UNDERSTOOD_MESSAGE: &str = "Sorry, I couldn't understand that command.";

/// Result of a successful dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// List after the add
    Added(Vec<ListItem>),
    /// List after the remove
    Removed(Vec<ListItem>),
    /// Matching products, cheapest first
    SearchResults(Vec<Product>),
    /// The user was told the command was not understood
    NotUnderstood,
}

/// Dispatches parsed commands to the list backend and notifier
#[derive(Clone)]
pub struct Dispatcher {
    backend: Arc<dyn ShoppingListIntegration>,
    notifier: Arc<dyn Notifier>,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn ShoppingListIntegration>, notifier: Arc<dyn Notifier>) -> Self {
        Self { backend, notifier }
    }

    pub fn backend(&self) -> &Arc<dyn ShoppingListIntegration> {
        &self.backend
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub async fn dispatch(&self, command: &ParsedCommand) -> Result<DispatchOutcome, IntegrationError> {
        let intent = command.intent.as_str();
        metrics::counter!("voice_shop_dispatch_total", "intent" => intent).increment(1);

        let result = self.route(command).await;
        match &result {
            Ok(_) => {
                if command.intent.is_state_changing() {
                    metrics::counter!("voice_shop_list_mutations_total", "intent" => intent).increment(1);
                }
                tracing::info!(intent, item = ?command.item, query = ?command.query, "Command dispatched");
            },
            Err(e) => {
                metrics::counter!("voice_shop_dispatch_failures_total", "intent" => intent, "kind" => e.kind())
                    .increment(1);
                tracing::warn!(intent, error = %e, "Command dispatch failed");
            },
        }
        result
    }

    async fn route(&self, command: &ParsedCommand) -> Result<DispatchOutcome, IntegrationError> {
        match command.intent {
            Intent::AddItem => {
                let item = required_item(command)?;
                let items = self.backend.add_item(item, command.quantity.max(1)).await?;
                Ok(DispatchOutcome::Added(items))
            },
            Intent::RemoveItem => {
                let item = required_item(command)?;
                let items = self.backend.remove_item(item).await?;
                Ok(DispatchOutcome::Removed(items))
            },
            Intent::Search => {
                let query = SearchQuery {
                    text: command.query.clone().unwrap_or_default(),
                    max_price: command.price,
                    brand: command.brand.clone(),
                };
                let products = self.backend.search_items(&query).await?;
                Ok(DispatchOutcome::SearchResults(products))
            },
            Intent::Unknown => {
                self.notifier.notify(NOT_UNDERSTOOD_MESSAGE);
                Ok(DispatchOutcome::NotUnderstood)
            },
        }
    }
}

fn required_item(command: &ParsedCommand) -> Result<&str, IntegrationError> {
    command
        .item
        .as_deref()
        .filter(|item| !item.is_empty())
        .ok_or_else(|| IntegrationError::InvalidRequest(format!("{} without an item", command.intent)))
}
