//! Core traits for the voice shopping assistant
//!
//! # Trait Hierarchy
//!
//! ```text
//! Interpretation:
//!   - LanguageProfile: per-language trigger, number and charset rules
//! ```
//!
//! Collaborators (list storage, catalog search, user feedback) are defined
//! by the tools crate next to their implementations.

mod language_profile;

pub use language_profile::{LanguageProfile, SlotMatch};
