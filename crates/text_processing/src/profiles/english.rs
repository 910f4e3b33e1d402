//! English profile rules

use std::borrow::Cow;

use voice_shop_core::Language;

use super::ProfileRules;

fn is_letter(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

fn is_short_form_char(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn identity(text: &str) -> Cow<'_, str> {
    Cow::Borrowed(text)
}

/// Spoken number words, including the common "to" misrecognition of "two"
pub const NUMBER_WORDS: &[(&str, u32)] = &[
    ("one", 1),
    ("two", 2),
    ("to", 2),
    ("too", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("dozen", 12),
    ("twenty", 20),
];

pub const RULES: ProfileRules = ProfileRules {
    language: Language::English,
    tag: "en",
    search_trigger: r"(?i)\b(?:find|search|show|look\s+for)\b",
    add_trigger: r"(?i)\b(?:please\s+add|add|buy|i\s+need|i\s+want|put)(?:\s+to\s+(?:buy|add|get|have))?\b",
    remove_trigger: r"(?i)\b(?:remove|delete|don['’]?t\s+want|do\s+not\s+want|cancel)\b",
    price_patterns: &[
        r"(?i)\b(?:under|below|less\s+than|cheaper\s+than|within|up\s+to)\s*(?:\$|₹|rs\.?|inr|usd)?\s*(?P<amount>\d+(?:\.\d+)?)(?:\s*(?:dollars?|bucks|rupees?|rs)\b)?",
    ],
    brand_patterns: &[r"(?i)\b(?:by|brand)\s+(?P<brand>[a-z][a-z0-9\-]*)"],
    list_reference: r"(?i)\b(?:to|from|in|on|off)\s+(?:my\s+|the\s+|our\s+)?(?:shopping\s+|grocery\s+)?list\b",
    add_trigger_words: &["add", "buy", "i", "need", "want", "put", "please"],
    search_fillers: &[
        "find", "search", "show", "look", "for", "me", "some", "any", "the", "a", "an",
    ],
    search_stems: &[],
    filler_words: &[
        "a", "an", "the", "some", "my", "x", "times", "piece", "pieces", "pcs", "bottle",
        "bottles", "pack", "packs", "packet", "packets", "of", "more", "also",
    ],
    number_words: NUMBER_WORDS,
    possessive_particles: &[],
    letters: is_letter,
    item_chars: char::is_alphanumeric,
    short_form_chars: is_short_form_char,
    short_form_max_tokens: 2,
    fold: identity,
};
