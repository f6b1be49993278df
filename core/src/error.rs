//! Error type for loading configuration and option definitions.

use thiserror::Error;

use crate::ValidationError;

/// Errors raised outside the scan itself: reading files and building tables.
#[derive(Debug, Error)]
pub enum Error {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Malformed option definitions.
    #[error("invalid option definition: {0}")]
    Invalid(#[from] ValidationError),
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
