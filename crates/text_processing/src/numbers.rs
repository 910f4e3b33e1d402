//! Spoken number resolution
//!
//! A token is either a literal numeral (`2`, `2.5`, `२`) or a number word
//! from the active profile (`two`, `दो`, `do`). Anything else is "no
//! match", which is distinct from a resolved zero.

use std::sync::Arc;

use voice_shop_core::LanguageProfile;

use crate::hindi::ascii_digits;
use crate::registry::{default_registry, ProfileRegistry};

/// Parse a literal numeral, flooring decimals
///
/// Accepts ASCII or Devanagari digits with at most one decimal point.
/// Values that do not fit in `u32` are rejected.
pub fn parse_numeral(token: &str) -> Option<u32> {
    let token = ascii_digits(token.trim());
    let mut dots = 0;
    let mut digits = 0;
    for c in token.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return None,
        }
    }
    if digits == 0 || dots > 1 {
        return None;
    }

    let value: f64 = token.parse().ok()?;
    let floored = value.floor();
    if floored > f64::from(u32::MAX) {
        return None;
    }
    Some(floored as u32)
}

/// Resolve a single token against a profile
pub fn resolve_number(token: &str, profile: &dyn LanguageProfile) -> Option<u32> {
    if let Some(value) = parse_numeral(token) {
        return Some(value);
    }

    let cleaned: String = token
        .chars()
        .filter(|c| profile.is_letter(*c))
        .collect::<String>()
        .to_lowercase();
    if cleaned.is_empty() {
        return None;
    }
    parse_numeral(&cleaned).or_else(|| profile.number_word(&cleaned))
}

/// Tag-based resolver over a profile registry
#[derive(Debug, Clone)]
pub struct NumberResolver {
    registry: Arc<ProfileRegistry>,
}

impl Default for NumberResolver {
    fn default() -> Self {
        Self::new(default_registry())
    }
}

impl NumberResolver {
    pub fn new(registry: Arc<ProfileRegistry>) -> Self {
        Self { registry }
    }

    pub fn resolve(&self, token: &str, language_tag: &str) -> Option<u32> {
        resolve_number(token, self.registry.resolve(language_tag))
    }
}
