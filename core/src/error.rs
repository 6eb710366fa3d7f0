//! Error types for loading command specifications.

use thiserror::Error;

use crate::SpecError;

/// Errors that can occur while loading a spec file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// File extension is not `.json`, `.yaml` or `.yml`.
    #[error("unsupported spec format: {0}")]
    UnsupportedFormat(String),

    /// The file parsed but the command tree is structurally invalid.
    #[error("invalid spec: {0}")]
    InvalidSpec(#[from] SpecError),
}

/// Convenience alias for results with [`LoadError`].
pub type Result<T> = std::result::Result<T, LoadError>;
