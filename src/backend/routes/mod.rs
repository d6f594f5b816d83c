//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//! Routes are organized by functionality into focused submodules.
//!
//! # Architecture
//!
//! - **`router`** - Main router creation, service endpoints, middleware
//! - **`api_routes`** - Local listings served from SQLite
//! - **`booqable_routes`** - Operations against the Booqable account
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs              - Module exports and documentation
//! ├── router.rs           - Main router creation
//! ├── api_routes.rs       - Local listing endpoints
//! └── booqable_routes.rs  - Booqable endpoints
//! ```
//!
//! # Route Types
//!
//! ## Service
//!
//! - `GET /health` - Liveness
//! - `GET /version` - Build information
//!
//! ## API Routes
//!
//! - `GET /api/reservations?q=` - Mirrored reservations
//! - `GET /api/inventory?q=` - Mirrored inventory
//!
//! ## Booqable Routes
//!
//! - `POST /api/sync/booqable/bookings` - Create booking with items
//! - `POST /api/booking/create-with-paylink` - Booking, payment link, email draft
//! - `POST /api/sync/booqable/invoices` - Get or attach a payment link
//! - `POST /api/sync/booqable/paylink-email` - Payment link email draft
//! - `GET /api/sync/booqable/reservations` - Sync reservations
//! - `GET /api/sync/booqable/inventory` - Sync inventory
//! - `GET /api/sync/booqable/products` - List products
//! - `POST /api/booking/mark-paid` - Record a payment
//! - `POST /api/booking/mark-confirmed` - Update booking status
//!
//! Unknown paths get a JSON 404.

/// Main router creation
pub mod router;

/// Local listing endpoints
pub mod api_routes;

/// Booqable endpoints
pub mod booqable_routes;

// Re-export commonly used functions
pub use router::create_router;
