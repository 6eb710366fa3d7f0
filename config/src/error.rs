//! Error types for configuration inspection.
//!
//! Covers the two ways a configuration file can be unusable (unreadable or
//! malformed) plus settings-file parsing.

use thiserror::Error;

/// Errors that can occur while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// INI syntax error at a 1-based line number.
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// Line the error was found on
        line: usize,
        /// What went wrong
        message: String,
    },

    /// YAML settings parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl ConfigError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        ConfigError::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;
