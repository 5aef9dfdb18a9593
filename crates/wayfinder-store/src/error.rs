//! Error types for wayfinder-store.

use std::path::PathBuf;

use wayfinder_types::ParseError;

/// Result type for wayfinder-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in wayfinder-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to create database directory.
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A record failed validation and was not written.
    #[error("Invalid location: {0}")]
    Validation(#[from] ParseError),

    /// A document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error was caused by the record itself rather than the
    /// database.
    pub fn is_invalid_record(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::Serialization(_))
    }
}
