//! Backend Error Module
//!
//! This module defines error types specific to the backend server.
//! These errors are used in HTTP handlers and can be converted to HTTP responses.
//!
//! # Architecture
//!
//! - **`types`** - Error type definitions and constructors
//! - **`conversion`** - `IntoResponse` and conversions from engine errors
//! - **`extract`** - `Json`/`Query` extractors rejecting with [`BackendError`]
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! ├── conversion.rs - Error conversion implementations
//! └── extract.rs    - Extractors with JSON rejections
//! ```
//!
//! # HTTP Response Conversion
//!
//! Every failure is rendered as
//!
//! ```json
//! { "ok": false, "error": "Could not update status in Booqable.", "tried": [ ... ] }
//! ```
//!
//! where the trace key (`tried` or `attempts`) is present only when the
//! failure carries an attempt trace.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

/// Extractors with JSON rejections
pub mod extract;

// Re-export commonly used types
pub use extract::{ApiJson, ApiQuery};
pub use types::BackendError;
