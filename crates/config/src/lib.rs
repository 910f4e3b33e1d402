//! Configuration management for the voice shopping assistant
//!
//! Settings are layered: `config/default.*`, then `config/{env}.*`, then
//! environment variables (`VOICE_SHOP__SESSION__DISPATCH_TIMEOUT_MS=...`).

pub mod settings;

pub use settings::{
    load_settings, load_settings_from, BackendConfig, BackendKind, InterpreterConfig,
    ObservabilityConfig, RuntimeEnvironment, SessionConfig, Settings, ENV_VAR,
};

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
