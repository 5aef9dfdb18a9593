//! Error types for wayfinder-core.
//!
//! Client-side failures are reported, never retried. The two situations a
//! user commonly hits, an unknown current location and offline mode, are
//! ordinary branches (an empty view, a kept cache) and do not appear here.

use thiserror::Error;

/// Errors that can occur in client-side operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The key/value store could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A persisted value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The location source failed to answer.
    #[error("Location source error: {0}")]
    Source(String),

    /// A cache operation failed.
    #[error("Cache operation '{operation}' failed: {reason}")]
    Cache {
        operation: String,
        reason: String,
    },

    /// The worker registration exists but could not be removed.
    #[error("Service worker unregistration failed")]
    WorkerUnregisterFailed,

    /// The current position could not be determined.
    #[error("Position unavailable: {0}")]
    Position(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn storage(reason: impl std::fmt::Display) -> Self {
        Self::Storage(reason.to_string())
    }

    pub fn cache(operation: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Cache {
            operation: operation.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias using wayfinder-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
