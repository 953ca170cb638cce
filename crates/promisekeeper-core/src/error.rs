//! Core error types for promisekeeper-core.
//!
//! This module defines the error hierarchy using thiserror. The engine
//! itself recovers from almost everything into a well-formed [`Verdict`]
//! (unknown promise kinds, missing parameters); errors here are reserved
//! for the input boundary — malformed JSON, malformed timestamps, and
//! invalid time ranges fail the whole evaluation up front.
//!
//! [`Verdict`]: crate::Verdict

use thiserror::Error;

/// Core error type for promisekeeper-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range: end ({end}) must not be earlier than start ({start})")]
    InvalidTimeRange {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },

    /// Malformed timestamp encountered at the input boundary
    #[error("Invalid timestamp '{value}': {message}")]
    InvalidTimestamp { value: String, message: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
