//! Hindi Language Utilities
//!
//! Shared helpers for Devanagari text: number words, digit conversion and
//! nukta folding. Speech engines emit both precomposed (`ड़`) and decomposed
//! (`ड` + `़`) nukta letters for the same word, so every lookup key goes
//! through [`fold_nukta`].

use std::borrow::Cow;

/// Hindi number words in Devanagari plus common romanized spellings
///
/// Variants that speech engines produce interchangeably are listed
/// separately (`पांच`/`पाँच`, `छह`/`छः`/`छे`).
pub const NUMBER_WORDS: &[(&str, u32)] = &[
    // Basic numbers 1-10
    ("एक", 1),
    ("एक्", 1),
    ("दो", 2),
    ("तीन", 3),
    ("चार", 4),
    ("पांच", 5),
    ("पाँच", 5),
    ("छह", 6),
    ("छः", 6),
    ("छे", 6),
    ("सात", 7),
    ("आठ", 8),
    ("नौ", 9),
    ("दस", 10),
    ("दर्जन", 12),
    // Tens
    ("बीस", 20),
    ("पच्चीस", 25),
    ("तीस", 30),
    ("चालीस", 40),
    ("पचास", 50),
    ("सौ", 100),
    // Romanized (Hinglish transcripts)
    ("ek", 1),
    ("do", 2),
    ("teen", 3),
    ("char", 4),
    ("chaar", 4),
    ("panch", 5),
    ("paanch", 5),
    ("chhah", 6),
    ("chhe", 6),
    ("saat", 7),
    ("aath", 8),
    ("nau", 9),
    ("das", 10),
    ("darjan", 12),
    ("bees", 20),
    ("pachaas", 50),
    ("sau", 100),
];

/// Whether `c` is a Devanagari letter, sign or digit (dandas excluded)
pub fn is_devanagari_letter(c: char) -> bool {
    matches!(c, '\u{0900}'..='\u{097F}') && !matches!(c, '\u{0964}' | '\u{0965}')
}

/// Replace Devanagari digits (०-९) with ASCII digits
pub fn ascii_digits(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_devanagari_digit) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|c| {
                if is_devanagari_digit(c) {
                    char::from(b'0' + (c as u32 - 0x0966) as u8)
                } else {
                    c
                }
            })
            .collect(),
    )
}

fn is_devanagari_digit(c: char) -> bool {
    matches!(c, '\u{0966}'..='\u{096F}')
}

/// Decompose precomposed nukta letters (`ड़` → `ड` + `़`)
pub fn fold_nukta(text: &str) -> Cow<'_, str> {
    if !text.chars().any(|c| decompose_nukta(c).is_some()) {
        return Cow::Borrowed(text);
    }
    let mut folded = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        match decompose_nukta(c) {
            Some(base) => {
                folded.push(base);
                folded.push('\u{093C}');
            },
            None => folded.push(c),
        }
    }
    Cow::Owned(folded)
}

fn decompose_nukta(c: char) -> Option<char> {
    let base = match c {
        '\u{0929}' => '\u{0928}',
        '\u{0931}' => '\u{0930}',
        '\u{0934}' => '\u{0933}',
        '\u{0958}' => '\u{0915}',
        '\u{0959}' => '\u{0916}',
        '\u{095A}' => '\u{0917}',
        '\u{095B}' => '\u{091C}',
        '\u{095C}' => '\u{0921}',
        '\u{095D}' => '\u{0922}',
        '\u{095E}' => '\u{092B}',
        '\u{095F}' => '\u{092F}',
        _ => return None,
    };
    Some(base)
}
