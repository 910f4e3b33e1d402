//! Core traits and types for the voice shopping assistant
//!
//! This crate provides foundational types used across all other crates:
//! - Language definitions (English, Hindi)
//! - Command types (utterance, intent, parsed command)
//! - The language profile capability trait

pub mod command;
pub mod language;
pub mod traits;

pub use command::{Intent, ParsedCommand, Utterance};
pub use language::{Language, Script};
pub use traits::{LanguageProfile, SlotMatch};
