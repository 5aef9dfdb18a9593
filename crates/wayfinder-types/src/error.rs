//! Error types for wayfinder-types.

use thiserror::Error;

/// Errors that can occur when parsing or validating location data.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The service type is not one of the supported values.
    #[error("Unknown service type: {0:?}")]
    UnknownServiceType(String),

    /// A latitude outside [-90, 90] or longitude outside [-180, 180].
    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// A required field is empty.
    #[error("Field '{0}' cannot be empty")]
    EmptyField(&'static str),
}

/// Result type alias using wayfinder-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
