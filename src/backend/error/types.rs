/**
 * Backend Error Types
 *
 * This module defines error types specific to the backend server.
 * These errors are used in HTTP handlers and can be converted to HTTP responses.
 *
 * # Error Categories
 *
 * ## Handler Errors
 *
 * Invalid caller input or a resource that does not exist.
 *
 * ## Upstream Errors
 *
 * A Booqable operation exhausted its candidates. These carry the truncated
 * attempt trace under either `tried` or `attempts`.
 *
 * ## Storage Errors
 *
 * SQLite failures while reading or writing the local mirror.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::booqable::Trace;
use crate::shared::SharedError;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use partytrailer::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::BAD_REQUEST, "orderId is required");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error (e.g., invalid request body)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// An upstream operation failed after trying every candidate
    #[error("Upstream error: {message}")]
    UpstreamError {
        status: StatusCode,
        message: String,
        /// Response key the trace is rendered under
        key: &'static str,
        trace: Trace,
    },

    /// Local store error
    #[error("Storage error: {0}")]
    StorageError(#[from] sqlx::Error),

    /// Shared error (from shared module)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Create an upstream error carrying an attempt trace
    pub fn upstream(status: StatusCode, message: impl Into<String>, key: &'static str, trace: Trace) -> Self {
        Self::UpstreamError {
            status,
            message: message.into(),
            key,
            trace,
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` / `UpstreamError` - Uses the status code from the error
    /// - `StorageError` - 500 Internal Server Error
    /// - `SharedError` - 400 for validation, 500 otherwise
    /// - `SerializationError` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } | Self::UpstreamError { status, .. } => *status,
            Self::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SharedError(err) => match err {
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::SerializationError { .. } | SharedError::NormalizationError { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the caller-facing error message
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } | Self::UpstreamError { message, .. } => message.clone(),
            Self::StorageError(_) => "Database error".to_string(),
            Self::SharedError(SharedError::ValidationError { message, .. }) => message.clone(),
            Self::SharedError(err) => err.to_string(),
            Self::SerializationError(err) => err.to_string(),
        }
    }

    /// The attempt trace and the key it is rendered under, if any
    pub fn trace(&self) -> Option<(&'static str, &Trace)> {
        match self {
            Self::UpstreamError { key, trace, .. } => Some((key, trace)),
            _ => None,
        }
    }
}
