//! Command interpretation for the voice shopping assistant
//!
//! This crate turns a transcribed utterance plus a language tag into a
//! structured [`ParsedCommand`](voice_shop_core::ParsedCommand):
//! - **Profiles**: declarative per-language rules (English, Hindi)
//! - **Registry**: language tag → closest profile, English fallback
//! - **Numbers**: numerals and spoken number words
//! - **Intent**: ordered add/remove/search rules with slot extraction
//! - **Normalize**: item and query cleanup
//!
//! # Example
//!
//! ```
//! use voice_shop_core::Intent;
//! use voice_shop_text_processing::CommandInterpreter;
//!
//! let interpreter = CommandInterpreter::default();
//! let command = interpreter.interpret("find toothpaste under 2", "en-US");
//!
//! assert_eq!(command.intent, Intent::Search);
//! assert_eq!(command.query.as_deref(), Some("toothpaste"));
//! assert_eq!(command.price, Some(2.0));
//! ```

pub mod hindi;
pub mod intent;
pub mod normalize;
pub mod numbers;
pub mod profiles;
pub mod registry;

mod error;

pub use error::{Result, TextProcessingError};

pub use intent::{interpret, CommandInterpreter};
pub use normalize::normalize_slot;
pub use numbers::{parse_numeral, resolve_number, NumberResolver};
pub use profiles::{ProfileRules, RuleProfile};
pub use registry::{default_registry, ProfileRegistry, ProfileRegistryBuilder};
