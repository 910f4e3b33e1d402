//! Text front end for the voice shopping assistant
//!
//! Wires settings into the interpreter, list backend and session, and
//! renders dispatch outcomes for a terminal.

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;

use voice_shop_agent::AgentError;
use voice_shop_config::{BackendKind, Settings};
use voice_shop_core::{Intent, Language, ParsedCommand, Script};
use voice_shop_text_processing::ProfileRegistry;
use voice_shop_tools::{
    Catalog, DispatchOutcome, HttpShoppingList, InMemoryShoppingList, ListItem, Notifier,
    ShoppingListIntegration, SuggestionKind, Suggestions,
};

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Empty,
    Quit,
    Help,
    List,
    Clear,
    Suggest,
    /// Switch language; `None` shows the current one
    Lang(Option<String>),
    Unrecognized(String),
    Utterance(String),
}

impl CliCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        let Some(rest) = line.strip_prefix(':') else {
            return Self::Utterance(line.to_string());
        };

        let mut parts = rest.split_whitespace();
        match parts.next().unwrap_or_default() {
            "q" | "quit" | "exit" => Self::Quit,
            "h" | "help" => Self::Help,
            "list" => Self::List,
            "clear" => Self::Clear,
            "suggest" => Self::Suggest,
            "lang" => Self::Lang(parts.next().map(str::to_string)),
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

pub const HELP: &str = "\
Speak (type) a command, e.g. \"add 2 apples\", \"दो आम चाहिए\", \"find toothpaste under 2\".
  :lang <tag>   switch language (en-US, hi-IN, ...)
  :list         show the shopping list
  :clear        empty the shopping list
  :suggest      show suggestions and substitutes
  :quit         exit";

/// Notifier that writes to the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        println!("» {}", message);
    }
}

/// Profile registry with configured number words
pub fn build_registry(settings: &Settings) -> anyhow::Result<ProfileRegistry> {
    let mut builder = ProfileRegistry::builder();
    for (tag, words) in &settings.interpreter.extra_number_words {
        builder = builder.number_words(tag, words.iter().map(|(word, n)| (word.clone(), *n)));
    }
    builder.build().context("Failed to build language profiles")
}

/// List backend selected by `backend.kind`
pub fn build_backend(settings: &Settings) -> anyhow::Result<Arc<dyn ShoppingListIntegration>> {
    let config = &settings.backend;
    match config.kind {
        BackendKind::Memory => {
            let list = match &config.data_file {
                Some(path) => InMemoryShoppingList::persistent(path),
                None => InMemoryShoppingList::new(),
            };
            let list = match &config.catalog_file {
                Some(path) => {
                    let catalog = Catalog::load_from_file(path)
                        .with_context(|| format!("Failed to load catalog {}", path.display()))?;
                    tracing::info!(path = %path.display(), products = catalog.len(), "Loaded catalog");
                    list.with_catalog(catalog)
                },
                None => list,
            };
            Ok(Arc::new(list))
        },
        BackendKind::Http => {
            let list = HttpShoppingList::new(
                config.base_url.clone(),
                Duration::from_millis(config.request_timeout_ms),
            )?;
            tracing::info!(base_url = %list.base_url(), "Using remote list service");
            Ok(Arc::new(list))
        },
    }
}

/// Suggest a language switch when the utterance is written in another script
pub fn language_hint(text: &str, current: Language) -> Option<String> {
    let script = Script::detect(text)?;
    if script == current.script() {
        return None;
    }
    let other = Language::all().iter().find(|l| l.script() == script)?;
    Some(format!(
        "Tip: that looks like {}. Switch with :lang {}",
        other.name(),
        other.code()
    ))
}

pub fn render_list(items: &[ListItem]) -> String {
    if items.is_empty() {
        return "Your shopping list is empty.".to_string();
    }
    items
        .iter()
        .map(|i| format!("  • {} × {} [{}]", i.item, i.quantity, i.category))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_suggestions(suggestions: &Suggestions) -> String {
    let mut lines: Vec<String> = suggestions
        .suggestions
        .iter()
        .map(|s| {
            let kind = match s.kind {
                SuggestionKind::History => "bought before",
                SuggestionKind::Seasonal => "in season",
                SuggestionKind::Sale => "on sale",
            };
            format!("  • {} ({})", s.item, kind)
        })
        .collect();
    if !suggestions.substitutes.is_empty() {
        lines.push("Substitutes:".to_string());
        lines.extend(
            suggestions
                .substitutes
                .iter()
                .map(|(from, to)| format!("  • {} → {}", from, to)),
        );
    }
    lines.join("\n")
}

/// Terminal text for one handled utterance
pub fn render_outcome(
    command: &ParsedCommand,
    outcome: &Result<DispatchOutcome, AgentError>,
) -> String {
    match outcome {
        Ok(DispatchOutcome::Added(items)) => format!(
            "Added {} × {}.\n{}",
            command.quantity,
            command.item.as_deref().unwrap_or_default(),
            render_list(items)
        ),
        Ok(DispatchOutcome::Removed(items)) => format!(
            "Removed {}.\n{}",
            command.item.as_deref().unwrap_or_default(),
            render_list(items)
        ),
        Ok(DispatchOutcome::SearchResults(products)) if products.is_empty() => {
            "No items found.".to_string()
        },
        Ok(DispatchOutcome::SearchResults(products)) => {
            let mut lines = vec![format!("Found {} items:", products.len())];
            lines.extend(
                products
                    .iter()
                    .map(|p| format!("  • {} ({}) {:.2} {}", p.item, p.brand, p.price, p.currency)),
            );
            lines.join("\n")
        },
        Ok(DispatchOutcome::NotUnderstood) => String::new(),
        Err(e) => match command.intent {
            Intent::AddItem | Intent::RemoveItem | Intent::Search => {
                format!("Could not {}: {}", command.intent.as_str().to_lowercase().replace('_', " "), e)
            },
            Intent::Unknown => e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voice_shop_tools::{Category, IntegrationError, Product};

    #[test]
    fn test_parse_commands() {
        assert_eq!(CliCommand::parse("   "), CliCommand::Empty);
        assert_eq!(CliCommand::parse(":quit"), CliCommand::Quit);
        assert_eq!(CliCommand::parse(":lang hi-IN"), CliCommand::Lang(Some("hi-IN".into())));
        assert_eq!(CliCommand::parse(":lang"), CliCommand::Lang(None));
        assert_eq!(CliCommand::parse(":bogus"), CliCommand::Unrecognized("bogus".into()));
        assert_eq!(
            CliCommand::parse(" add 2 apples "),
            CliCommand::Utterance("add 2 apples".into())
        );
    }

    #[test]
    fn test_registry_uses_configured_words() {
        let mut settings = Settings::default();
        settings
            .interpreter
            .extra_number_words
            .entry("hi".to_string())
            .or_default()
            .insert("gyarah".to_string(), 11);

        let registry = build_registry(&settings).unwrap();
        assert_eq!(registry.resolve("hi-IN").number_word("gyarah"), Some(11));
    }

    #[test]
    fn test_registry_rejects_unknown_tag() {
        let mut settings = Settings::default();
        settings
            .interpreter
            .extra_number_words
            .entry("fr".to_string())
            .or_default()
            .insert("deux".to_string(), 2);
        assert!(build_registry(&settings).is_err());
    }

    #[tokio::test]
    async fn test_memory_backend_with_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.backend.data_file = Some(dir.path().join("list.json"));

        let backend = build_backend(&settings).unwrap();
        backend.add_item("milk", 1).await.unwrap();
        assert!(dir.path().join("list.json").exists());
    }

    #[test]
    fn test_missing_catalog_is_an_error() {
        let mut settings = Settings::default();
        settings.backend.catalog_file = Some("/nonexistent/catalog.json".into());
        assert!(build_backend(&settings).is_err());
    }

    #[test]
    fn test_language_hint() {
        assert!(language_hint("दो आम चाहिए", Language::English)
            .is_some_and(|hint| hint.ends_with(":lang hi")));
        assert_eq!(language_hint("add milk", Language::English), None);
        assert!(language_hint("add milk", Language::Hindi).is_some());
        assert_eq!(language_hint("!!", Language::Hindi), None);
    }

    #[test]
    fn test_render_outcomes() {
        let command = ParsedCommand::add("milk", 2);
        let items = vec![ListItem {
            item: "milk".into(),
            quantity: 2,
            category: Category::Dairy,
        }];
        let text = render_outcome(&command, &Ok(DispatchOutcome::Added(items)));
        assert!(text.starts_with("Added 2 × milk."));
        assert!(text.contains("[dairy]"));

        let command = ParsedCommand::search("toothpaste", None, None);
        let products = vec![Product {
            item: "toothpaste".into(),
            brand: "Generic".into(),
            price: 1.99,
            currency: "USD".into(),
        }];
        let text = render_outcome(&command, &Ok(DispatchOutcome::SearchResults(products)));
        assert!(text.contains("toothpaste (Generic) 1.99 USD"));

        let text = render_outcome(&command, &Ok(DispatchOutcome::SearchResults(Vec::new())));
        assert_eq!(text, "No items found.");

        let error = AgentError::Dispatch(IntegrationError::RateLimited);
        let text = render_outcome(&ParsedCommand::remove("milk"), &Err(error));
        assert_eq!(text, "Could not remove item: Dispatch failed: Rate limited");
    }
}
