//! Language profile capability trait
//!
//! A profile bundles everything the interpreter needs to know about one
//! language: which phrases trigger which intent, how spoken numbers are
//! written, which words are noise inside an item phrase and which
//! characters may survive normalization. The interpreter itself contains no
//! language-specific branching; adding a language means adding a profile.

use std::ops::Range;

use crate::Language;

/// A value extracted from an utterance together with the byte range it covered
#[derive(Debug, Clone, PartialEq)]
pub struct SlotMatch<T> {
    pub value: T,
    pub span: Range<usize>,
}

impl<T> SlotMatch<T> {
    pub fn new(value: T, span: Range<usize>) -> Self {
        Self { value, span }
    }
}

/// Per-language rule set consumed by the command interpreter
///
/// Implementations must be immutable after construction so a single
/// instance can serve concurrent interpretations without locking.
///
/// # Example
///
/// ```ignore
/// let profile = registry.resolve("hi-IN");
/// assert!(profile.match_add("दो आम चाहिए"));
/// assert_eq!(profile.number_word("दो"), Some(2));
/// ```
pub trait LanguageProfile: Send + Sync + 'static {
    /// Language this profile serves
    fn language(&self) -> Language;

    /// Registry key (lowercase, e.g. `en`, `hi`, `en-in`)
    fn tag(&self) -> &str;

    /// Whether the utterance asks to search the catalog
    fn match_search(&self, text: &str) -> bool;

    /// Whether the utterance asks to add an item
    fn match_add(&self, text: &str) -> bool;

    /// Byte span of the remove trigger, if the utterance asks to remove an item
    fn match_remove(&self, text: &str) -> Option<Range<usize>>;

    /// Utterance with every add trigger phrase removed, whitespace collapsed
    fn strip_add_trigger(&self, text: &str) -> String;

    /// Price ceiling phrase ("under 5", "100 रुपये से कम"), currency discarded
    fn extract_price(&self, text: &str) -> Option<SlotMatch<f64>>;

    /// Brand phrase ("by colgate", "अमूल ब्रांड का"), raw brand text
    fn extract_brand(&self, text: &str) -> Option<SlotMatch<String>>;

    /// Remove references to the list itself ("to my list", "सूची में")
    fn strip_list_reference(&self, text: &str) -> String;

    /// Trigger verbs/pronouns excluded from an add item phrase
    fn is_add_trigger_word(&self, token: &str) -> bool;

    /// Search verbs and fillers excluded from a search query
    fn is_search_filler(&self, token: &str) -> bool;

    /// Articles, units and other noise excluded from item phrases
    fn is_filler_word(&self, token: &str) -> bool;

    /// Look up a cleaned, lowercased token in the number-word table
    fn number_word(&self, word: &str) -> Option<u32>;

    /// Letter/digit set used to clean tokens before number lookup
    fn is_letter(&self, c: char) -> bool;

    /// Characters allowed to survive slot normalization (besides space and hyphen)
    fn is_item_char(&self, c: char) -> bool;

    /// Possessive particle stripped from the front of an item ("का", "की", "के")
    fn is_possessive_particle(&self, token: &str) -> bool;

    /// Characters allowed in a bare short-form utterance ("bread", "ब्रेड")
    fn is_short_form_char(&self, c: char) -> bool;

    /// Maximum token count for the short-form add fallback
    fn short_form_max_tokens(&self) -> usize;
}
