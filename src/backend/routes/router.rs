/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. Service endpoints (`/health`, `/version`)
 * 2. API routes (local listings)
 * 3. Booqable routes
 * 4. Fallback handler (JSON 404)
 *
 * # Middleware
 *
 * - `TraceLayer` logs every request and response
 * - `CorsLayer` admits the configured client origins with credentials
 */

use axum::{
    http::{header, HeaderValue, Method, StatusCode, Uri},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::routes::booqable_routes::configure_booqable_routes;
use crate::backend::server::state::AppState;

const SERVICE_NAME: &str = "partytrailer-api";

async fn health() -> Json<Value> {
    Json(json!({
        "ok": true,
        "service": SERVICE_NAME,
        "time": Utc::now().to_rfc3339(),
    }))
}

async fn version() -> Json<Value> {
    Json(json!({
        "name": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found(uri: Uri) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "ok": false, "error": "Not Found", "path": uri.to_string() })),
    )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
}

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state containing configuration, engine and pool
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new()
        .route("/health", axum::routing::get(health))
        .route("/version", axum::routing::get(version));

    // Add API routes
    let router = configure_api_routes(router);

    // Add Booqable routes
    let router = configure_booqable_routes(router);

    // Fallback handler for 404
    let router = router.fallback(not_found);

    let cors = cors_layer(&app_state.config.cors_origins);
    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
