//! Shared Error Types
//!
//! This module defines error types that are shared between the engine, the
//! persistence layer and the HTTP handlers.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - Caller input that fails validation
//! - `NormalizationError` - An upstream record that cannot be mapped onto a
//!   canonical record
//!
//! # Usage
//!
//! ```rust
//! use partytrailer::shared::error::SharedError;
//!
//! let error = SharedError::validation("orderId", "orderId is required");
//! ```
use thiserror::Error;

/// Shared error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Upstream record could not be normalized
    #[error("Normalization error: {message}")]
    NormalizationError {
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new normalization error
    pub fn normalization(message: impl Into<String>) -> Self {
        Self::NormalizationError {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
