//! Server Module
//!
//! This module contains all server-side code for initializing and configuring
//! the Axum HTTP server.
//!
//! # Architecture
//!
//! - **`state`** - Application state structure and `FromRef` implementations
//! - **`config`** - SQLite pool creation and migrations
//! - **`init`** - Server initialization and app creation
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Database loading
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Database**: Open the SQLite pool and run migrations
//! 2. **Engine**: Build the Booqable engine from the validated configuration
//! 3. **Router Creation**: Configure all routes and middleware
//!
//! # Example
//!
//! ```rust,no_run
//! use partytrailer::backend::server::create_app;
//! use partytrailer::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(AppConfig::from_env()?).await?;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Database loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use init::{create_app, create_app_with_pool, InitError};
pub use state::AppState;
