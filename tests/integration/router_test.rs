//! HTTP surface tests driven through the router with `oneshot`

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use partytrailer::backend::reservations::db::upsert_reservation;
use partytrailer::backend::server::create_app_with_pool;
use partytrailer::shared::{AppConfig, Reservation};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{create_test_pool, empty_orders, orders_page, request_count, test_config};

async fn app(server: &MockServer) -> (Router, SqlitePool) {
    let pool = create_test_pool().await;
    let app = create_app_with_pool(test_config(server), pool.clone()).unwrap();
    (app, pool)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_and_version() {
    let server = MockServer::start().await;
    let (app, _pool) = app(&server).await;

    let (status, body) = send(app.clone(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["service"], "partytrailer-api");
    assert!(body["time"].is_string());

    let (status, body) = send(app, get("/version")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let server = MockServer::start().await;
    let (app, _pool) = app(&server).await;

    let (status, body) = send(app, get("/api/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "ok": false, "error": "Not Found", "path": "/api/nope" }));
}

#[tokio::test]
async fn test_reservation_listing_with_query() {
    let server = MockServer::start().await;
    let (app, pool) = app(&server).await;
    for (id, name) in [("r-1", "Sam Rivera"), ("r-2", "Ana Lopez")] {
        let mut reservation = Reservation::new(id, Utc::now());
        reservation.customer.name = name.to_string();
        upsert_reservation(&pool, &reservation).await.unwrap();
    }

    let (status, body) = send(app.clone(), get("/api/reservations")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reservations"].as_array().unwrap().len(), 2);

    let (_, body) = send(app, get("/api/reservations?q=rivera")).await;
    let reservations = body["reservations"].as_array().unwrap();
    assert_eq!(reservations.len(), 1);
    assert_eq!(reservations[0]["externalId"], "r-1");
}

#[tokio::test]
async fn test_inventory_listing_empty() {
    let server = MockServer::start().await;
    let (app, _pool) = app(&server).await;

    let (status, body) = send(app, get("/api/inventory")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "items": [] }));
}

#[tokio::test]
async fn test_sync_endpoint_reports_pass() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_page(0, 4)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_orders()))
        .mount(&server)
        .await;
    let (app, _pool) = app(&server).await;

    let (status, body) = send(app.clone(), get("/api/sync/booqable/reservations")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["imported"], 4);
    assert_eq!(body["endpoint"], "/orders");
    assert_eq!(body["auth"], "Bearer");
    assert_eq!(body["pageLimitReached"], false);

    let (_, body) = send(app, get("/api/reservations")).await;
    assert_eq!(body["reservations"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_products_unavailable_is_404_with_attempts() {
    let server = MockServer::start().await;
    let (app, _pool) = app(&server).await;

    let (status, body) = send(app, get("/api/sync/booqable/products")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "Could not list products");
    assert_eq!(body["attempts"].as_array().unwrap().len(), 6);
    assert_eq!(body["attempts"][0]["status"], 404);
}

#[tokio::test]
async fn test_mark_paid_validation_is_400() {
    let server = MockServer::start().await;
    let (app, _pool) = app(&server).await;

    let (status, body) = send(app, post("/api/booking/mark-paid", json!({ "orderId": "o-1" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "ok": false, "error": "amount is required" }));
}

#[tokio::test]
async fn test_malformed_body_is_json_error() {
    let server = MockServer::start().await;
    let (app, _pool) = app(&server).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/booking/mark-paid")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);
    assert!(body["error"].as_str().unwrap().contains("JSON"));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_missing_content_type_is_json_error() {
    let server = MockServer::start().await;
    let (app, _pool) = app(&server).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/sync/booqable/bookings")
        .body(Body::from("{}"))
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn test_bad_query_string_is_json_error() {
    let server = MockServer::start().await;
    let (app, _pool) = app(&server).await;

    let (status, body) = send(app, get("/api/sync/booqable/products?limit=lots")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn test_payment_link_failure_carries_split_trace() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_orders()))
        .mount(&server)
        .await;
    let (app, _pool) = app(&server).await;

    let (status, body) = send(app, post("/api/sync/booqable/invoices", json!({ "order_id": 42 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No invoice/checkout endpoint accepted.");
    assert_eq!(body["tried"]["create"].as_array().unwrap().len(), 6);
    assert_eq!(body["tried"]["create"][0]["path"], "/orders/42/invoices");
    assert_eq!(body["tried"]["fetch"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_missing_api_key_is_503() {
    let server = MockServer::start().await;
    let pool = create_test_pool().await;
    let mut config: AppConfig = test_config(&server);
    config.booqable.api_key = String::new();
    let app = create_app_with_pool(config, pool).unwrap();

    let (status, body) = send(app, post("/api/sync/booqable/bookings", json!({ "items": [] }))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Booqable API key is not configured");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_booking_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_orders()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "order": { "id": "o-9" } })))
        .mount(&server)
        .await;
    let (app, _pool) = app(&server).await;

    let (status, body) = send(
        app,
        post(
            "/api/sync/booqable/bookings",
            json!({ "customer": { "name": "Sam" }, "start": "2026-06-01", "items": [] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["orderId"], "o-9");
    assert_eq!(body["itemsRequested"], 0);
}

#[tokio::test]
async fn test_create_booking_accepts_numeric_product_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_orders()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "order": { "id": "o-9" } })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/orders/o-9/order_lines"))
        .and(body_partial_json(json!({ "order_line": { "product_id": "123", "quantity": 2 } })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    let (app, _pool) = app(&server).await;

    let (status, body) = send(
        app,
        post(
            "/api/sync/booqable/bookings",
            json!({ "items": [{ "productId": 123, "quantity": "2" }] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["itemsAttached"], 1);
    assert_eq!(body["itemsUnresolved"], 0);
}
