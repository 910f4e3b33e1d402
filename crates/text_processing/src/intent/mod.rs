//! Command Interpretation
//!
//! Turns a `(utterance, language tag)` pair into a [`ParsedCommand`] using
//! ordered lexical rules. The first rule that matches wins:
//!
//! 1. Search: search trigger present; price and brand slots extracted.
//! 2. Add: add trigger present; quantity and item extracted jointly.
//! 3. Remove: remove trigger present; item is the remainder.
//! 4. Short form: a bare item name ("bread", "ब्रेड") means add one.
//! 5. Otherwise `Intent::Unknown`.
//!
//! Interpretation is pure and never fails. Profiles are shared read-only,
//! so one interpreter can serve any number of sessions concurrently.
//!
//! # Example
//!
//! ```
//! use voice_shop_core::Intent;
//! use voice_shop_text_processing::intent::interpret;
//!
//! let command = interpret("दो आम चाहिए", "hi-IN");
//! assert_eq!(command.intent, Intent::AddItem);
//! assert_eq!(command.item.as_deref(), Some("आम"));
//! assert_eq!(command.quantity, 2);
//! ```

use std::ops::Range;
use std::sync::Arc;

use voice_shop_core::{LanguageProfile, ParsedCommand, Utterance};

use crate::normalize::normalize_slot;
use crate::numbers::resolve_number;
use crate::registry::{default_registry, ProfileRegistry};

/// Interpret with the built-in registry
pub fn interpret(text: &str, language_tag: &str) -> ParsedCommand {
    CommandInterpreter::default().interpret(text, language_tag)
}

/// Rule-based command interpreter
#[derive(Debug, Clone)]
pub struct CommandInterpreter {
    registry: Arc<ProfileRegistry>,
}

impl Default for CommandInterpreter {
    fn default() -> Self {
        Self::new(default_registry())
    }
}

impl CommandInterpreter {
    pub fn new(registry: Arc<ProfileRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ProfileRegistry> {
        &self.registry
    }

    pub fn interpret_utterance(&self, utterance: &Utterance) -> ParsedCommand {
        self.interpret(&utterance.text, &utterance.language_tag)
    }

    pub fn interpret(&self, text: &str, language_tag: &str) -> ParsedCommand {
        let profile = self.registry.resolve(language_tag);
        let command = classify(text.trim(), profile);

        tracing::debug!(
            tag = %language_tag,
            profile = %profile.tag(),
            intent = %command.intent,
            item = ?command.item,
            quantity = command.quantity,
            query = ?command.query,
            "Interpreted utterance"
        );
        command
    }
}

fn classify(text: &str, profile: &dyn LanguageProfile) -> ParsedCommand {
    if text.is_empty() {
        return ParsedCommand::unknown();
    }
    if profile.match_search(text) {
        return parse_search(text, profile);
    }
    if profile.match_add(text) {
        return parse_add(text, profile);
    }
    if let Some(span) = profile.match_remove(text) {
        return parse_remove(text, span, profile);
    }
    parse_short_form(text, profile).unwrap_or_else(ParsedCommand::unknown)
}

/// Trim punctuation and other non-letters from both ends of a token
fn clean_token<'a>(token: &'a str, profile: &dyn LanguageProfile) -> &'a str {
    token.trim_matches(|c: char| !profile.is_letter(c))
}

/// Add: the first token that resolves to a number is the quantity; every
/// other non-trigger, non-filler token (later numbers included) belongs to
/// the item phrase.
fn parse_add(text: &str, profile: &dyn LanguageProfile) -> ParsedCommand {
    let without_list = profile.strip_list_reference(text);
    let remainder = profile.strip_add_trigger(&without_list);

    let mut quantity = None;
    let mut item_tokens = Vec::new();
    for token in remainder.split_whitespace() {
        // the cleaned form only drives lookups; the item keeps the raw token
        let cleaned = clean_token(token, profile);
        if cleaned.is_empty() {
            if token.chars().any(|c| profile.is_item_char(c)) {
                item_tokens.push(token);
            }
            continue;
        }
        if quantity.is_none() {
            if let Some(value) = resolve_number(cleaned, profile) {
                quantity = Some(value);
                continue;
            }
        }
        if profile.is_add_trigger_word(cleaned) || profile.is_filler_word(cleaned) {
            continue;
        }
        item_tokens.push(token);
    }

    let item = if item_tokens.is_empty() {
        text.split_whitespace().last().unwrap_or_default().to_string()
    } else {
        item_tokens.join(" ")
    };

    ParsedCommand::add(normalize_slot(&item, profile), quantity.unwrap_or(1))
}

/// Remove: the text after the trigger, or before it for verb-final
/// phrasing ("ब्रेड हटाओ").
fn parse_remove(text: &str, span: Range<usize>, profile: &dyn LanguageProfile) -> ParsedCommand {
    let after = text[span.end..].trim();
    let remainder = if after.is_empty() {
        text[..span.start].trim()
    } else {
        after
    };

    let remainder = profile.strip_list_reference(remainder);
    let item = remainder
        .split_whitespace()
        .filter(|token| !profile.is_filler_word(clean_token(token, profile)))
        .collect::<Vec<_>>()
        .join(" ");

    ParsedCommand::remove(normalize_slot(&item, profile))
}

fn parse_search(text: &str, profile: &dyn LanguageProfile) -> ParsedCommand {
    let price = profile.extract_price(text);
    let brand = profile.extract_brand(text);

    let spans: Vec<Range<usize>> = price
        .iter()
        .map(|m| m.span.clone())
        .chain(brand.iter().map(|m| m.span.clone()))
        .collect();
    let remaining = profile.strip_list_reference(&remove_spans(text, spans));

    let query = remaining
        .split_whitespace()
        .filter(|token| {
            let cleaned = clean_token(token, profile);
            !cleaned.is_empty() && !profile.is_search_filler(cleaned)
        })
        .collect::<Vec<_>>()
        .join(" ");

    let brand = brand.map(|m| normalize_slot(&m.value, profile));
    ParsedCommand::search(
        normalize_slot(&query, profile),
        price.map(|m| m.value),
        brand,
    )
}

/// A bare item name of at most `short_form_max_tokens` tokens
fn parse_short_form(text: &str, profile: &dyn LanguageProfile) -> Option<ParsedCommand> {
    let token_count = text.split_whitespace().count();
    if token_count == 0 || token_count > profile.short_form_max_tokens() {
        return None;
    }
    if !text
        .chars()
        .all(|c| c.is_whitespace() || profile.is_short_form_char(c))
    {
        return None;
    }

    let item = normalize_slot(text, profile);
    (!item.is_empty()).then(|| ParsedCommand::add(item, 1))
}

/// Cut byte ranges out of `text`, joining the pieces with spaces
fn remove_spans(text: &str, mut spans: Vec<Range<usize>>) -> String {
    spans.sort_by_key(|span| span.start);

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in spans {
        if span.end <= cursor {
            continue;
        }
        let start = span.start.max(cursor);
        out.push_str(&text[cursor..start]);
        out.push(' ');
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}
