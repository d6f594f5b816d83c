//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - Database test fixtures
//! - Mock Booqable server helpers
//! - Custom assertion macros

pub mod assertions;
#[cfg(feature = "ssr")]
pub mod mock_server;

// Re-export commonly used utilities
#[cfg(feature = "ssr")]
pub use database::*;
#[cfg(feature = "ssr")]
pub use mock_server::*;
