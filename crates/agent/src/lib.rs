//! Shopping sessions
//!
//! A [`ShoppingSession`] owns one user's conversation: it interprets each
//! utterance immediately and hands the resulting command to a per-session
//! queue, so dispatches for the same user never overlap and always apply
//! in the order they were spoken.

pub mod session;

pub use session::{
    CommandTicket, SessionEvent, ShoppingSession, ShoppingSessionConfig, ShoppingSessionState,
};

use thiserror::Error;
use voice_shop_tools::IntegrationError;

/// Session errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Dispatch failed: {0}")]
    Dispatch(#[from] IntegrationError),

    #[error("Dispatch timed out after {0}ms")]
    Timeout(u64),

    #[error("Session has ended")]
    SessionEnded,

    #[error("Initialization error: {0}")]
    Initialization(String),
}
