//! Application settings

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Environment variable naming the runtime environment (`development`, `production`, ...)
pub const ENV_VAR: &str = "VOICE_SHOP_ENV";

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub interpreter: InterpreterConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub backend: BackendConfig,
}

impl Settings {
    /// Validate all sections
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_observability()?;
        self.validate_interpreter()?;
        self.validate_session()?;
        self.validate_backend()?;
        Ok(())
    }

    fn validate_observability(&self) -> Result<(), ConfigError> {
        const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
        let level = self.observability.log_level.to_lowercase();
        // Full EnvFilter directives ("info,voice_shop=debug") are passed through
        if !level.contains('=') && !level.contains(',') && !LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "observability.log_level".to_string(),
                message: format!("Unknown log level '{}'", self.observability.log_level),
            });
        }
        Ok(())
    }

    fn validate_interpreter(&self) -> Result<(), ConfigError> {
        if self.interpreter.default_language.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "interpreter.default_language".to_string(),
                message: "Must not be empty".to_string(),
            });
        }

        for (tag, words) in &self.interpreter.extra_number_words {
            if let Some(word) = words.keys().find(|w| w.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    field: format!("interpreter.extra_number_words.{}", tag),
                    message: format!("Blank number word '{}'", word),
                });
            }
        }
        Ok(())
    }

    fn validate_session(&self) -> Result<(), ConfigError> {
        if !(1..=60_000).contains(&self.session.dispatch_timeout_ms) {
            return Err(ConfigError::InvalidValue {
                field: "session.dispatch_timeout_ms".to_string(),
                message: format!(
                    "Must be between 1 and 60000, got {}",
                    self.session.dispatch_timeout_ms
                ),
            });
        }
        if self.session.queue_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.queue_capacity".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    fn validate_backend(&self) -> Result<(), ConfigError> {
        if self.backend.kind == BackendKind::Http {
            let url = self.backend.base_url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    field: "backend.base_url".to_string(),
                    message: format!("Expected an http(s) URL, got '{}'", url),
                });
            }
            if self.backend.request_timeout_ms == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "backend.request_timeout_ms".to_string(),
                    message: "Must be greater than 0".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level or EnvFilter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines
    #[serde(default)]
    pub log_json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Command interpreter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpreterConfig {
    /// Language tag used when the caller supplies none
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Additional number words per profile tag (`hi` → {"ग्यारह": 11})
    #[serde(default)]
    pub extra_number_words: BTreeMap<String, BTreeMap<String, u32>>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            extra_number_words: BTreeMap::new(),
        }
    }
}

fn default_language() -> String {
    "en-US".to_string()
}

/// Per-session dispatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Upper bound on a single backend call
    #[serde(default = "default_dispatch_timeout_ms")]
    pub dispatch_timeout_ms: u64,

    /// Commands that may wait behind the in-flight dispatch
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dispatch_timeout_ms: default_dispatch_timeout_ms(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_dispatch_timeout_ms() -> u64 {
    5000
}

fn default_queue_capacity() -> usize {
    32
}

/// Which list backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Memory,
    Http,
}

/// Shopping list backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,

    /// REST service root (http backend)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// JSON file mirroring the list (memory backend)
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Product catalog JSON (memory backend); built-in sample when unset
    #[serde(default)]
    pub catalog_file: Option<PathBuf>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
            data_file: None,
            catalog_file: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout_ms() -> u64 {
    3000
}

/// Load settings from `config/` in the working directory
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Load settings from a config directory
///
/// Sources, later overriding earlier: `{dir}/default.*`, `{dir}/{env}.*`,
/// `VOICE_SHOP__*` environment variables.
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::from(dir.join("default")).required(false));

    if let Some(env_name) = env {
        builder = builder.add_source(File::from(dir.join(env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("VOICE_SHOP")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    tracing::debug!(
        environment = ?settings.environment,
        backend = ?settings.backend.kind,
        "Settings loaded"
    );
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.session.dispatch_timeout_ms, 5000);
        assert_eq!(settings.backend.kind, BackendKind::Memory);
        assert_eq!(settings.interpreter.default_language, "en-US");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_session_validation() {
        let mut settings = Settings::default();
        settings.session.dispatch_timeout_ms = 0;
        assert!(settings.validate().is_err());

        settings.session.dispatch_timeout_ms = 1000;
        settings.session.queue_capacity = 0;
        assert!(settings.validate().is_err());

        settings.session.queue_capacity = 1;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_http_backend_requires_url() {
        let mut settings = Settings::default();
        settings.backend.kind = BackendKind::Http;
        settings.backend.base_url = "localhost:5000".to_string();
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "backend.base_url"
        ));

        settings.backend.base_url = "https://lists.example.com".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_log_level_validation() {
        let mut settings = Settings::default();
        settings.observability.log_level = "loud".to_string();
        assert!(settings.validate().is_err());

        settings.observability.log_level = "info,voice_shop_tools=debug".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_blank_number_word_rejected() {
        let mut settings = Settings::default();
        settings
            .interpreter
            .extra_number_words
            .entry("hi".to_string())
            .or_default()
            .insert(" ".to_string(), 11);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_layered_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            r#"
[session]
dispatch_timeout_ms = 2000

[interpreter.extra_number_words.hi]
"ग्यारह" = 11
"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("production.toml"),
            r#"
environment = "production"

[session]
dispatch_timeout_ms = 1500

[backend]
kind = "http"
base_url = "https://lists.example.com"
"#,
        )
        .unwrap();

        let settings = load_settings_from(dir.path(), None).unwrap();
        assert_eq!(settings.session.dispatch_timeout_ms, 2000);
        assert_eq!(settings.interpreter.extra_number_words["hi"]["ग्यारह"], 11);
        assert_eq!(settings.backend.kind, BackendKind::Memory);

        let settings = load_settings_from(dir.path(), Some("production")).unwrap();
        assert!(settings.environment.is_production());
        assert_eq!(settings.session.dispatch_timeout_ms, 1500);
        assert_eq!(settings.session.queue_capacity, 32);
        assert_eq!(settings.backend.kind, BackendKind::Http);
    }

    #[test]
    fn test_missing_directory_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(&dir.path().join("absent"), Some("staging")).unwrap();
        assert_eq!(settings.session.queue_capacity, 32);
    }
}
