/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct holds:
 * - The validated application configuration
 * - The Booqable engine (HTTP client, candidate space, discovery cache)
 * - The SQLite connection pool
 *
 * # Thread Safety
 *
 * Every field is cheap to clone and shareable between requests. No request
 * mutates shared state except through the store and the discovery cache.
 *
 * # Example
 *
 * ```rust
 * use partytrailer::backend::booqable::Booqable;
 * use axum::extract::State;
 *
 * async fn handler(State(booqable): State<Booqable>) {
 *     let enabled = booqable.cache().is_enabled();
 * }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::backend::booqable::Booqable;
use crate::shared::AppConfig;

#[derive(Clone)]
pub struct AppState {
    /// Configuration the server was started with
    pub config: Arc<AppConfig>,

    /// Booqable discovery and reconciliation engine
    pub booqable: Booqable,

    /// Local mirror of reservations and inventory
    pub pool: SqlitePool,
}

impl FromRef<AppState> for Booqable {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.booqable.clone()
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
