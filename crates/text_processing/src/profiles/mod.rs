//! Declarative language profiles
//!
//! Each supported language is described by a static [`ProfileRules`] table
//! (trigger patterns, vocabularies, character sets). [`RuleProfile`]
//! compiles a table once into regexes and lookup sets and implements the
//! [`LanguageProfile`] capability trait on top of it.

pub mod english;
pub mod hindi;

use regex::Regex;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::ops::Range;

use voice_shop_core::{Language, LanguageProfile, SlotMatch};

use crate::hindi::ascii_digits;
use crate::{Result, TextProcessingError};

/// Static rule table for one language
///
/// Price patterns must expose an `amount` capture group and brand patterns
/// a `brand` group. Word lists are matched against tokens that were
/// lowercased and passed through `fold`.
#[derive(Debug, Clone, Copy)]
pub struct ProfileRules {
    pub language: Language,
    pub tag: &'static str,
    pub search_trigger: &'static str,
    pub add_trigger: &'static str,
    pub remove_trigger: &'static str,
    pub price_patterns: &'static [&'static str],
    pub brand_patterns: &'static [&'static str],
    pub list_reference: &'static str,
    pub add_trigger_words: &'static [&'static str],
    pub search_fillers: &'static [&'static str],
    /// Search verbs matched as token prefixes (`खोज` covers `खोजो`, `खोजिए`)
    pub search_stems: &'static [&'static str],
    pub filler_words: &'static [&'static str],
    pub number_words: &'static [(&'static str, u32)],
    pub possessive_particles: &'static [&'static str],
    pub letters: fn(char) -> bool,
    pub item_chars: fn(char) -> bool,
    pub short_form_chars: fn(char) -> bool,
    pub short_form_max_tokens: usize,
    /// Script-level variant folding applied to every lookup key
    pub fold: fn(&str) -> Cow<'_, str>,
}

/// Compiled, immutable language profile
pub struct RuleProfile {
    language: Language,
    tag: String,
    search_trigger: Regex,
    add_trigger: Regex,
    remove_trigger: Regex,
    price_patterns: Vec<Regex>,
    brand_patterns: Vec<Regex>,
    list_reference: Regex,
    add_trigger_words: HashSet<String>,
    search_fillers: HashSet<String>,
    search_stems: Vec<String>,
    filler_words: HashSet<String>,
    number_words: HashMap<String, u32>,
    possessive_particles: HashSet<String>,
    letters: fn(char) -> bool,
    item_chars: fn(char) -> bool,
    short_form_chars: fn(char) -> bool,
    short_form_max_tokens: usize,
    fold: fn(&str) -> Cow<'_, str>,
}

impl RuleProfile {
    /// Compile a rule table
    pub fn compile(rules: &ProfileRules) -> Result<Self> {
        Self::compile_with_words(rules, std::iter::empty())
    }

    /// Compile a rule table with additional number words (e.g. from configuration)
    ///
    /// Extra words override built-in entries with the same spelling.
    pub fn compile_with_words<I>(rules: &ProfileRules, extra_number_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, u32)>,
    {
        let tag = rules.tag.to_lowercase();
        let compile = |rule: &'static str, pattern: &str| {
            Regex::new(pattern).map_err(|source| TextProcessingError::InvalidPattern {
                tag: tag.clone(),
                rule,
                source,
            })
        };

        let price_patterns = rules
            .price_patterns
            .iter()
            .map(|p| compile("price", p))
            .collect::<Result<Vec<_>>>()?;
        let brand_patterns = rules
            .brand_patterns
            .iter()
            .map(|p| compile("brand", p))
            .collect::<Result<Vec<_>>>()?;

        let fold = rules.fold;
        let key = |word: &str| fold(&word.to_lowercase()).into_owned();
        let word_set = |words: &[&str]| words.iter().map(|w| key(w)).collect::<HashSet<_>>();

        let mut number_words: HashMap<String, u32> =
            rules.number_words.iter().map(|(w, n)| (key(w), *n)).collect();
        for (word, value) in extra_number_words {
            let word_key = key(word.trim());
            if word_key.is_empty() {
                return Err(TextProcessingError::InvalidNumberWord {
                    tag: tag.clone(),
                    word,
                });
            }
            number_words.insert(word_key, value);
        }

        Ok(Self {
            language: rules.language,
            search_trigger: compile("search", rules.search_trigger)?,
            add_trigger: compile("add", rules.add_trigger)?,
            remove_trigger: compile("remove", rules.remove_trigger)?,
            list_reference: compile("list_reference", rules.list_reference)?,
            price_patterns,
            brand_patterns,
            add_trigger_words: word_set(rules.add_trigger_words),
            search_fillers: word_set(rules.search_fillers),
            search_stems: rules.search_stems.iter().map(|w| key(w)).collect(),
            filler_words: word_set(rules.filler_words),
            number_words,
            possessive_particles: word_set(rules.possessive_particles),
            letters: rules.letters,
            item_chars: rules.item_chars,
            short_form_chars: rules.short_form_chars,
            short_form_max_tokens: rules.short_form_max_tokens,
            fold,
            tag,
        })
    }

    fn key(&self, token: &str) -> String {
        (self.fold)(&token.to_lowercase()).into_owned()
    }
}

impl std::fmt::Debug for RuleProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleProfile")
            .field("language", &self.language)
            .field("tag", &self.tag)
            .field("number_words", &self.number_words.len())
            .finish_non_exhaustive()
    }
}

/// Collapse runs of whitespace into single spaces and trim
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl LanguageProfile for RuleProfile {
    fn language(&self) -> Language {
        self.language
    }

    fn tag(&self) -> &str {
        &self.tag
    }

    fn match_search(&self, text: &str) -> bool {
        self.search_trigger.is_match(text)
    }

    fn match_add(&self, text: &str) -> bool {
        self.add_trigger.is_match(text)
    }

    fn match_remove(&self, text: &str) -> Option<Range<usize>> {
        self.remove_trigger.find(text).map(|m| m.range())
    }

    fn strip_add_trigger(&self, text: &str) -> String {
        collapse_whitespace(&self.add_trigger.replace_all(text, " "))
    }

    fn extract_price(&self, text: &str) -> Option<SlotMatch<f64>> {
        self.price_patterns.iter().find_map(|pattern| {
            let captures = pattern.captures(text)?;
            let amount = captures.name("amount")?;
            let value: f64 = ascii_digits(amount.as_str()).parse().ok()?;
            let whole = captures.get(0)?;
            Some(SlotMatch::new(value, whole.range()))
        })
    }

    fn extract_brand(&self, text: &str) -> Option<SlotMatch<String>> {
        self.brand_patterns.iter().find_map(|pattern| {
            let captures = pattern.captures(text)?;
            let brand = captures.name("brand")?.as_str().trim();
            if brand.is_empty() {
                return None;
            }
            let whole = captures.get(0)?;
            Some(SlotMatch::new(brand.to_string(), whole.range()))
        })
    }

    fn strip_list_reference(&self, text: &str) -> String {
        collapse_whitespace(&self.list_reference.replace_all(text, " "))
    }

    fn is_add_trigger_word(&self, token: &str) -> bool {
        self.add_trigger_words.contains(&self.key(token))
    }

    fn is_search_filler(&self, token: &str) -> bool {
        let key = self.key(token);
        self.search_fillers.contains(&key)
            || self.search_stems.iter().any(|stem| key.starts_with(stem.as_str()))
    }

    fn is_filler_word(&self, token: &str) -> bool {
        self.filler_words.contains(&self.key(token))
    }

    fn number_word(&self, word: &str) -> Option<u32> {
        self.number_words.get(&self.key(word)).copied()
    }

    fn is_letter(&self, c: char) -> bool {
        (self.letters)(c)
    }

    fn is_item_char(&self, c: char) -> bool {
        (self.item_chars)(c)
    }

    fn is_possessive_particle(&self, token: &str) -> bool {
        self.possessive_particles.contains(&self.key(token))
    }

    fn is_short_form_char(&self, c: char) -> bool {
        (self.short_form_chars)(c)
    }

    fn short_form_max_tokens(&self) -> usize {
        self.short_form_max_tokens
    }
}
