/**
 * API Route Handlers
 *
 * Routes served from the local SQLite mirror.
 *
 * # Routes
 *
 * - `GET /api/reservations` - Reservations ordered by start time
 * - `GET /api/inventory` - Inventory items ordered by name
 */

use axum::Router;

use crate::backend::inventory::handlers::list_inventory;
use crate::backend::reservations::handlers::list_reservations;
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// Both listings accept a `q` query parameter that filters case-insensitively
/// and return at most 500 records.
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/api/reservations",
            axum::routing::get(list_reservations),
        )
        .route(
            "/api/inventory",
            axum::routing::get(list_inventory),
        )
}
