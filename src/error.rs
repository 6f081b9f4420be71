//! Error types for the tag completion engine
//!
//! This module provides error handling using thiserror for structured error
//! definitions and anyhow for error propagation in the binaries.

use crate::config::ConfigError;
use thiserror::Error;

/// Main error type for tag completion operations
#[derive(Error, Debug)]
pub enum TagError {
    /// Tag table could not be fetched (missing file, bad HTTP status)
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tag table is not valid CSV
    #[error("Parse error: {0}")]
    Parse(#[from] csv::Error),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Cache store could not be reached (pool, interaction)
    #[error("Cache error: {0}")]
    Cache(String),

    /// Corpus (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for tag completion operations
pub type Result<T> = std::result::Result<T, TagError>;

/// Convert anyhow::Error to TagError
impl From<anyhow::Error> for TagError {
    fn from(err: anyhow::Error) -> Self {
        TagError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TagError::Fetch("tags.csv: not found".to_string());
        assert_eq!(err.to_string(), "Fetch error: tags.csv: not found");
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let tag_err: TagError = io_err.into();
        assert!(matches!(tag_err, TagError::Io(_)));

        let anyhow_err = anyhow::anyhow!("something broke");
        let tag_err: TagError = anyhow_err.into();
        assert_eq!(tag_err.to_string(), "something broke");
    }
}
