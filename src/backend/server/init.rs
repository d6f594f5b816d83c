/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including database loading, engine creation and route configuration.
 *
 * # Initialization Process
 *
 * 1. Open the SQLite pool and run migrations
 * 2. Build the Booqable engine
 * 3. Create and configure the router
 */

use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::backend::booqable::client::ClientError;
use crate::backend::booqable::Booqable;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_database;
use crate::backend::server::state::AppState;
use crate::shared::AppConfig;

/// Startup failures; the server refuses to start on any of them
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Database initialization failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP client initialization failed: {0}")]
    HttpClient(#[from] ClientError),
}

/// Create and configure the Axum application
///
/// # Initialization Steps
///
/// 1. **Load Database**: Connects to `config.database_url` and migrates it
/// 2. **Create Engine**: Builds the Booqable engine from `config.booqable`
/// 3. **Create Router**: Configures all routes and middleware
pub async fn create_app(config: AppConfig) -> Result<Router<()>, InitError> {
    let pool = load_database(&config.database_url).await?;
    create_app_with_pool(config, pool)
}

/// Create the application around an existing pool
pub fn create_app_with_pool(config: AppConfig, pool: SqlitePool) -> Result<Router<()>, InitError> {
    tracing::info!("Initializing Party Trailer backend server");

    let booqable = Booqable::new(&config.booqable)?;
    tracing::info!(
        bases = booqable.space().bases().len(),
        cache = booqable.cache().is_enabled(),
        "Booqable engine initialized"
    );

    let app_state = AppState {
        config: Arc::new(config),
        booqable,
        pool,
    };

    Ok(create_router(app_state))
}
