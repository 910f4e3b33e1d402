//! Language definitions for the supported command languages
//!
//! Only languages with a registered command profile are listed here.

use serde::{Deserialize, Serialize};

/// Supported command languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hindi,
}

impl Language {
    /// Get ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Hindi => "hi",
        }
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Hindi => "Hindi",
        }
    }

    /// Get script used by this language
    pub fn script(&self) -> Script {
        match self {
            Self::English => Script::Latin,
            Self::Hindi => Script::Devanagari,
        }
    }

    /// Get all supported languages
    pub fn all() -> &'static [Language] {
        &[Self::English, Self::Hindi]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Script systems used by the supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Script {
    Latin,
    Devanagari,
}

impl Script {
    /// Get Unicode range for this script (first block only)
    pub fn unicode_range(&self) -> (u32, u32) {
        match self {
            Self::Latin => (0x0000, 0x007F),
            Self::Devanagari => (0x0900, 0x097F),
        }
    }

    /// Check if a character belongs to this script
    pub fn contains_char(&self, c: char) -> bool {
        let code = c as u32;
        let (start, end) = self.unicode_range();
        code >= start && code <= end
    }

    /// Detect script from text (returns most frequent script)
    pub fn detect(text: &str) -> Option<Self> {
        let mut latin = 0usize;
        let mut devanagari = 0usize;

        for c in text.chars().filter(|c| c.is_alphanumeric()) {
            if Self::Devanagari.contains_char(c) {
                devanagari += 1;
            } else if Self::Latin.contains_char(c) {
                latin += 1;
            }
        }

        match (latin, devanagari) {
            (0, 0) => None,
            (l, d) if d > l => Some(Self::Devanagari),
            _ => Some(Self::Latin),
        }
    }
}
