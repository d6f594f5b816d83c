//! Party Trailer - Main Library
//!
//! Backend for the Party Trailer events/booking application. The mobile client
//! talks plain HTTP/JSON to this server; the server in turn integrates with the
//! Booqable rental-management API, whose endpoint shape, authentication scheme
//! and resource naming differ between accounts and are only known at runtime.
//!
//! # Overview
//!
//! This library provides:
//! - Runtime discovery of a working (base URL, auth scheme, resource path) triple
//! - Booking creation with line items, customer reuse and product resolution
//! - Payment-link resolution and notification email drafts
//! - Idempotent synchronization of upstream reservations and inventory into a
//!   local SQLite store
//!
//! # Module Structure
//!
//! - **`shared`** - Platform-agnostic types
//!   - Canonical reservation and inventory records
//!   - Request/response bodies of the exposed operations
//!   - Configuration and shared error types
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server and route configuration
//!   - The Booqable discovery and reconciliation engine
//!   - SQLite persistence
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Server-side code: Axum server, engine, persistence
//!
//! # Usage
//!
//! ```rust,no_run
//! use partytrailer::backend::server::init::create_app;
//! use partytrailer::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let app = create_app(config).await?;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - Per-candidate upstream failures are recorded, never raised
//! - Only total exhaustion of a candidate space surfaces to callers
//! - Custom error types live in `shared::error` and `backend::error`

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
