//! Mock Booqable helpers for integration tests
//!
//! Every test runs against its own wiremock server used as the only
//! candidate base. Requests that match no mounted mock get wiremock's
//! default 404, which the engine treats like any rejected candidate.

use std::time::Duration;

use partytrailer::backend::booqable::Booqable;
use partytrailer::shared::{AppConfig, BooqableSettings};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-key";
pub const TEST_BUSINESS: &str = "The Party Trailer";

/// Engine settings pointing at `base` only
pub fn test_settings(base: &str) -> BooqableSettings {
    BooqableSettings {
        api_key: TEST_API_KEY.to_string(),
        account_subdomain: None,
        base_urls: vec![base.to_string()],
        request_timeout: Duration::from_secs(5),
        operation_deadline: Duration::from_secs(60),
        discovery_ttl: Duration::ZERO,
    }
}

pub fn booqable_for(server: &MockServer) -> Booqable {
    Booqable::new(&test_settings(&server.uri())).expect("Failed to build engine")
}

/// Application configuration using `server` as the Booqable base
pub fn test_config(server: &MockServer) -> AppConfig {
    AppConfig::builder()
        .database_url("sqlite::memory:")
        .api_key(TEST_API_KEY)
        .base_urls(vec![server.uri()])
        .business_name(TEST_BUSINESS)
        .build()
        .expect("Failed to build test config")
}

pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}

/// Method and path of every received request, in order
pub async fn received_calls(server: &MockServer) -> Vec<(String, String)> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| (r.method.to_string(), r.url.path().to_string()))
        .collect()
}

/// An upstream order record as Booqable lists it
pub fn order_record(id: &str, start: &str) -> Value {
    json!({
        "id": id,
        "status": "reserved",
        "starts_at": start,
        "customer": { "id": format!("c-{id}"), "name": "Sam Rivera", "email": "sam@example.com" },
        "lines": [{ "item_id": "p-1", "quantity": 2, "title": "Bounce House" }],
        "grand_total_amount": 250.0
    })
}

/// A reservations page holding `count` records numbered from `first`
pub fn orders_page(first: usize, count: usize) -> Value {
    let orders: Vec<Value> = (first..first + count)
        .map(|n| order_record(&format!("o-{n}"), &format!("2026-05-{:02}T10:00:00Z", n % 28 + 1)))
        .collect();
    json!({ "orders": orders })
}

pub fn empty_orders() -> Value {
    json!({ "orders": [] })
}
