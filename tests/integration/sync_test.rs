//! Synchronizer tests against a mock upstream and an in-memory store

use assert_matches::assert_matches;
use partytrailer::backend::booqable::sync::{SyncError, SyncTarget};
use partytrailer::backend::inventory::db::{count_items, list_items};
use partytrailer::backend::reservations::db::{count_reservations, find_reservation, list_reservations};
use partytrailer::shared::{SyncFailurePolicy, SyncSettings, BOOQABLE_SYSTEM};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{booqable_for, create_test_pool, empty_orders, order_record, orders_page, request_count};

async fn mount_page(server: &MockServer, page: u32, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(query_param("page", page.to_string().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_page_then_empty_page() {
    let server = MockServer::start().await;
    mount_page(&server, 1, orders_page(0, 50)).await;
    mount_page(&server, 2, empty_orders()).await;
    let pool = create_test_pool().await;

    let report = crate::assert_ok!(
        booqable_for(&server)
            .sync(&pool, SyncTarget::Reservations, &SyncSettings::default())
            .await,
        "Sync pass failed"
    );

    assert_eq!(report.imported, 50);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.pages, 2);
    assert!(!report.page_limit_reached);
    assert_eq!(report.config.resource_path, "/orders");
    assert_eq!(request_count(&server).await, 2);
    assert_eq!(count_reservations(&pool).await.unwrap(), 50);
}

#[tokio::test]
async fn test_sync_is_idempotent() {
    let server = MockServer::start().await;
    mount_page(&server, 1, orders_page(0, 3)).await;
    mount_page(&server, 2, empty_orders()).await;
    let pool = create_test_pool().await;
    let booqable = booqable_for(&server);
    let settings = SyncSettings::default();

    booqable.sync(&pool, SyncTarget::Reservations, &settings).await.unwrap();
    let first = find_reservation(&pool, BOOQABLE_SYSTEM, "o-1").await.unwrap().unwrap();

    let report = booqable.sync(&pool, SyncTarget::Reservations, &settings).await.unwrap();
    let second = find_reservation(&pool, BOOQABLE_SYSTEM, "o-1").await.unwrap().unwrap();

    assert_eq!(report.imported, 3);
    assert_eq!(count_reservations(&pool).await.unwrap(), 3);
    assert_eq!(first.id, second.id);
    assert!(second.last_synced_at >= first.last_synced_at);
    assert_eq!(second.customer.name, "Sam Rivera");
    assert_eq!(second.items[0].quantity, 2);
}

#[tokio::test]
async fn test_failing_page_aborts_pass() {
    let server = MockServer::start().await;
    mount_page(&server, 1, orders_page(0, 2)).await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;
    let pool = create_test_pool().await;

    let result = booqable_for(&server)
        .sync(&pool, SyncTarget::Reservations, &SyncSettings::default())
        .await;

    assert_matches!(result, Err(SyncError::Upstream { page: 2, ref attempts }) if attempts.len() == 1);
    // Page 1 was already stored
    assert_eq!(count_reservations(&pool).await.unwrap(), 2);
}

#[tokio::test]
async fn test_bad_record_policy() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        json!({ "orders": [order_record("o-1", "2026-05-01T10:00:00Z"), { "status": "reserved" }, order_record("o-2", "2026-05-02")] }),
    )
    .await;
    mount_page(&server, 2, empty_orders()).await;
    let booqable = booqable_for(&server);

    let pool = create_test_pool().await;
    let abort = booqable
        .sync(&pool, SyncTarget::Reservations, &SyncSettings::default())
        .await;
    crate::assert_err!(abort, SyncError::Normalize(_));
    assert_eq!(count_reservations(&pool).await.unwrap(), 1);

    let pool = create_test_pool().await;
    let settings = SyncSettings {
        failure_policy: SyncFailurePolicy::Skip,
        ..SyncSettings::default()
    };
    let report = booqable
        .sync(&pool, SyncTarget::Reservations, &settings)
        .await
        .unwrap();
    assert_eq!(report.imported, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(count_reservations(&pool).await.unwrap(), 2);
}

#[tokio::test]
async fn test_page_cap_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(orders_page(0, 1)))
        .mount(&server)
        .await;
    let pool = create_test_pool().await;
    let settings = SyncSettings {
        max_pages: 3,
        ..SyncSettings::default()
    };

    let report = booqable_for(&server)
        .sync(&pool, SyncTarget::Reservations, &settings)
        .await
        .unwrap();

    assert!(report.page_limit_reached);
    assert_eq!(report.pages, 3);
    assert_eq!(report.imported, 3);
    assert_eq!(request_count(&server).await, 3);
    assert_eq!(count_reservations(&pool).await.unwrap(), 1);
}

#[tokio::test]
async fn test_inventory_sync() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/items"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "id": "i-1", "name": "Bounce House", "sku": "BH-1", "stock": 2, "images": ["https://img.example.com/bh.png"] },
                { "id": 2, "title": "Popcorn Machine", "active": false, "category": { "name": "Concessions" } }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/items"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;
    let pool = create_test_pool().await;

    let report = booqable_for(&server)
        .sync(&pool, SyncTarget::Inventory, &SyncSettings::default())
        .await
        .unwrap();

    assert_eq!(report.imported, 2);
    assert_eq!(report.config.resource_path, "/v1/items");
    assert_eq!(count_items(&pool).await.unwrap(), 2);

    let items = list_items(&pool, "").await.unwrap();
    assert_eq!(items[0].name, "Bounce House");
    assert_eq!(items[0].stock_count, 2);
    assert_eq!(items[1].external_id, "2");
    assert!(!items[1].active);
    assert_eq!(items[1].category.as_deref(), Some("Concessions"));
}

#[tokio::test]
async fn test_sync_without_endpoint() {
    let server = MockServer::start().await;
    let pool = create_test_pool().await;

    let result = booqable_for(&server)
        .sync(&pool, SyncTarget::Inventory, &SyncSettings::default())
        .await;
    assert_matches!(result, Err(SyncError::Booqable(_)));
}

#[tokio::test]
async fn test_non_numeric_totals_stay_listable() {
    let server = MockServer::start().await;
    let mut record = order_record("o-nan", "2026-07-01T10:00:00Z");
    record["total_amount"] = json!("NaN");
    record["tax_amount"] = json!("inf");
    mount_page(&server, 1, json!({ "orders": [record] })).await;
    mount_page(&server, 2, empty_orders()).await;
    let pool = create_test_pool().await;

    let report = booqable_for(&server)
        .sync(&pool, SyncTarget::Reservations, &SyncSettings::default())
        .await
        .unwrap();
    assert_eq!(report.imported, 1);

    let listed = crate::assert_ok!(list_reservations(&pool, "").await, "Listing failed");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].totals.grand_total, 250.0);
    assert_eq!(listed[0].totals.tax, 0.0);
}
