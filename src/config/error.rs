//! Errors raised while loading the configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Why the configuration could not be loaded.
///
/// Loading is read-only: every variant points at the file, key or
/// environment variable the user has to fix.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested file does not exist.
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A value parsed but cannot drive a serial channel.
    #[error("Invalid configuration value for '{key}': {message}")]
    Invalid { key: String, message: String },

    /// A `GIRINO_SERIAL_*` override could not be parsed.
    #[error("Failed to parse environment variable '{var}': {message}")]
    Env { var: String, message: String },
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn env(var: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Env {
            var: var.into(),
            message: message.into(),
        }
    }
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
