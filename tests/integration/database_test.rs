//! Local store tests
//!
//! Verify the migrated schema and the upsert semantics of both mirrors.

use chrono::{Duration, TimeZone, Utc};
use partytrailer::backend::inventory::db::{count_items, list_items, upsert_item};
use partytrailer::backend::reservations::db::{
    count_reservations, find_reservation, list_reservations, upsert_reservation, LIST_LIMIT,
};
use partytrailer::shared::{InventoryItem, Reservation, BOOQABLE_SYSTEM};
use uuid::Uuid;

use crate::common::{create_test_pool, TestDatabase};

fn reservation(external_id: &str, day: u32) -> Reservation {
    let mut reservation = Reservation::new(external_id, Utc::now());
    reservation.start_at = Some(Utc.with_ymd_and_hms(2026, 7, day, 9, 0, 0).unwrap());
    reservation.customer.name = format!("Customer {external_id}");
    reservation
}

fn item(external_id: &str, name: &str) -> InventoryItem {
    InventoryItem {
        id: Uuid::new_v4(),
        external_id: external_id.to_string(),
        name: name.to_string(),
        sku: None,
        category: None,
        stock_count: 1,
        images: Vec::new(),
        active: true,
        last_synced_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_migrations_run_on_file_database() {
    let db = TestDatabase::new().await;
    let tables: Vec<String> = sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .fetch_all(db.pool())
        .await
        .unwrap();
    assert!(tables.contains(&"reservations".to_string()));
    assert!(tables.contains(&"inventory_items".to_string()));

    upsert_reservation(db.pool(), &reservation("r-1", 1)).await.unwrap();
    db.cleanup().await.unwrap();
    assert_eq!(count_reservations(db.pool()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_upsert_keeps_local_id() {
    let pool = create_test_pool().await;
    let first = reservation("r-1", 3);
    let id = upsert_reservation(&pool, &first).await.unwrap();
    assert_eq!(id, first.id);

    let mut changed = reservation("r-1", 4);
    changed.status = "reserved".to_string();
    changed.last_synced_at = first.last_synced_at + Duration::minutes(5);
    let again = upsert_reservation(&pool, &changed).await.unwrap();

    assert_eq!(again, id);
    assert_eq!(count_reservations(&pool).await.unwrap(), 1);
    let stored = find_reservation(&pool, BOOQABLE_SYSTEM, "r-1").await.unwrap().unwrap();
    assert_eq!(stored.id, id);
    assert_eq!(stored.status, "reserved");
    assert_eq!(stored.last_synced_at, changed.last_synced_at);
}

#[tokio::test]
async fn test_listing_is_ordered_and_filtered() {
    let pool = create_test_pool().await;
    for (id, day) in [("r-late", 20), ("r-early", 2), ("r-mid", 10)] {
        upsert_reservation(&pool, &reservation(id, day)).await.unwrap();
    }
    let mut unscheduled = Reservation::new("r-none", Utc::now());
    unscheduled.customer.email = Some("Zed@Example.com".to_string());
    upsert_reservation(&pool, &unscheduled).await.unwrap();

    let all = list_reservations(&pool, "").await.unwrap();
    let order: Vec<&str> = all.iter().map(|r| r.external_id.as_str()).collect();
    // SQLite sorts NULL start times first
    assert_eq!(order, ["r-none", "r-early", "r-mid", "r-late"]);

    let filtered = list_reservations(&pool, "zed@example").await.unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].external_id, "r-none");
    assert!(find_reservation(&pool, BOOQABLE_SYSTEM, "missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_listing_is_capped() {
    let pool = create_test_pool().await;
    for n in 0..LIST_LIMIT + 5 {
        upsert_reservation(&pool, &Reservation::new(format!("r-{n:04}"), Utc::now()))
            .await
            .unwrap();
    }
    assert_eq!(list_reservations(&pool, "").await.unwrap().len(), LIST_LIMIT);
}

#[tokio::test]
async fn test_inventory_upsert_and_listing() {
    let pool = create_test_pool().await;
    upsert_item(&pool, &item("i-2", "Popcorn Machine")).await.unwrap();
    let first = item("i-1", "Bounce House");
    let id = upsert_item(&pool, &first).await.unwrap();

    let mut renamed = item("i-1", "Bounce Castle");
    renamed.sku = Some("BC-1".to_string());
    assert_eq!(upsert_item(&pool, &renamed).await.unwrap(), id);

    assert_eq!(count_items(&pool).await.unwrap(), 2);
    let names: Vec<String> = list_items(&pool, "").await.unwrap().into_iter().map(|i| i.name).collect();
    assert_eq!(names, ["Bounce Castle", "Popcorn Machine"]);
    assert_eq!(list_items(&pool, "bc-").await.unwrap().len(), 1);
}
