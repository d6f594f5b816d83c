//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the HTTP layer, the integration engine and the persistence layer. None of
//! them depend on the server stack, so they are compiled without the `ssr`
//! feature as well.
//!
//! # Overview
//!
//! - **`reservation`** - Canonical reservation record and its sub-records
//! - **`inventory`** - Canonical inventory item record
//! - **`booking`** - Request and response bodies of the exposed operations
//! - **`config`** - Application configuration
//! - **`error`** - Shared error types

/// Canonical reservation record
pub mod reservation;

/// Canonical inventory item record
pub mod inventory;

/// Booking operation request/response types
pub mod booking;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use reservation::{
    Delivery, PaymentInfo, Reservation, ReservationCustomer, ReservationItem, Totals,
    BOOQABLE_SYSTEM,
};
pub use inventory::InventoryItem;
pub use error::SharedError;
pub use config::{
    AppConfig, AppConfigBuilder, BooqableSettings, ConfigError, SyncFailurePolicy, SyncSettings,
};
pub use booking::{Attempt, BookingItemInput, CreateBookingRequest, CustomerInput, EmailDraft};
