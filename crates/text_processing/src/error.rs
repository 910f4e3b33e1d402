//! Error types for the text processing crate

use thiserror::Error;

/// Errors raised while building language profiles
///
/// Interpretation itself never fails; these only surface when a registry is
/// assembled from rules or configuration.
#[derive(Error, Debug)]
pub enum TextProcessingError {
    #[error("Invalid {rule} pattern for profile '{tag}': {source}")]
    InvalidPattern {
        tag: String,
        rule: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown language profile: {0}")]
    UnknownProfile(String),

    #[error("Invalid number word for profile '{tag}': {word}")]
    InvalidNumberWord { tag: String, word: String },
}

pub type Result<T> = std::result::Result<T, TextProcessingError>;
