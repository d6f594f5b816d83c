/**
 * Booqable Route Handlers
 *
 * # Routes
 *
 * ## Bookings
 * - `POST /api/sync/booqable/bookings` - Create booking with items
 * - `POST /api/booking/create-with-paylink` - Booking, payment link and email draft
 * - `POST /api/booking/mark-paid` - Record a payment
 * - `POST /api/booking/mark-confirmed` - Update booking status
 *
 * ## Payment Links
 * - `POST /api/sync/booqable/invoices` - Get or attach a payment link
 * - `POST /api/sync/booqable/paylink-email` - Payment link email draft
 *
 * ## Synchronization
 * - `GET /api/sync/booqable/reservations` - Mirror reservations
 * - `GET /api/sync/booqable/inventory` - Mirror inventory
 * - `GET /api/sync/booqable/products` - List products
 */

use axum::Router;

use crate::backend::booqable::handlers::{
    create_booking, create_with_paylink, list_products, mark_confirmed, mark_paid, paylink_email,
    payment_link, sync_inventory, sync_reservations,
};
use crate::backend::server::state::AppState;

/// Configure Booqable routes
pub fn configure_booqable_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Bookings
        .route(
            "/api/sync/booqable/bookings",
            axum::routing::post(create_booking),
        )
        .route(
            "/api/booking/create-with-paylink",
            axum::routing::post(create_with_paylink),
        )
        .route(
            "/api/booking/mark-paid",
            axum::routing::post(mark_paid),
        )
        .route(
            "/api/booking/mark-confirmed",
            axum::routing::post(mark_confirmed),
        )
        // Payment links
        .route(
            "/api/sync/booqable/invoices",
            axum::routing::post(payment_link),
        )
        .route(
            "/api/sync/booqable/paylink-email",
            axum::routing::post(paylink_email),
        )
        // Synchronization
        .route(
            "/api/sync/booqable/reservations",
            axum::routing::get(sync_reservations),
        )
        .route(
            "/api/sync/booqable/inventory",
            axum::routing::get(sync_inventory),
        )
        .route(
            "/api/sync/booqable/products",
            axum::routing::get(list_products),
        )
}
