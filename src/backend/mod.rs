//! Backend Module
//!
//! This module contains all server-side code for the Party Trailer
//! application: an Axum HTTP server in front of the Booqable integration
//! engine and a local SQLite mirror.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, database loading
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`booqable`** - Endpoint discovery and reconciliation against Booqable
//! - **`reservations`** - Mirrored reservations (persistence, listing)
//! - **`inventory`** - Mirrored inventory (persistence, listing)
//! - **`error`** - Backend-specific error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Binary entry point
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── booqable/       - Integration engine
//! ├── reservations/   - Reservation store
//! ├── inventory/      - Inventory store
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! `AppState` holds the configuration, the engine and the pool. There is no
//! other shared mutable state between requests apart from the optional
//! discovery cache inside the engine.
//!
//! # Error Handling
//!
//! - Per-candidate upstream failures are recorded in attempt logs
//! - Exhausted operations become `BackendError` responses with `ok: false`
//! - Storage failures are logged and returned as 500s
//!
//! # Example
//!
//! ```rust,no_run
//! use partytrailer::backend::server::create_app;
//! use partytrailer::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(AppConfig::from_env()?).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Booqable integration engine
pub mod booqable;

/// Mirrored reservations
pub mod reservations;

/// Mirrored inventory
pub mod inventory;

/// Backend error types
pub mod error;

/// Re-export commonly used types
pub use booqable::{Booqable, BooqableError};
pub use error::BackendError;
pub use server::create_app;
