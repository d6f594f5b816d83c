/**
 * Server Configuration
 *
 * Opens the SQLite store behind `DATABASE_URL` and brings its schema up to
 * date.
 *
 * # Error Handling
 *
 * Unlike the optional services of a typical deployment, the store is
 * mandatory here: every failure is returned to the caller, which refuses to
 * start.
 */

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

const MAX_CONNECTIONS: u32 = 5;

/// Open a connection pool and run migrations
///
/// In-memory databases are private to a connection, so their pool is capped
/// at a single connection.
///
/// # Example
///
/// ```rust,no_run
/// use partytrailer::backend::server::config::load_database;
///
/// # async fn example() -> Result<(), sqlx::Error> {
/// let pool = load_database("sqlite://partytrailer.db").await?;
/// # Ok(())
/// # }
/// ```
pub async fn load_database(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("Connecting to database...");

    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let max_connections = if database_url.contains(":memory:") {
        1
    } else {
        MAX_CONNECTIONS
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;
    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database migrations completed successfully");

    Ok(pool)
}
