//! Database operations for inventory items
//!
//! Same document layout as reservations, keyed by the upstream id alone.

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::backend::reservations::db::{parse_id, timestamp, LIST_LIMIT};
use crate::shared::InventoryItem;

/// Insert or update an item by its upstream id, returning the local id
pub async fn upsert_item(pool: &SqlitePool, item: &InventoryItem) -> Result<Uuid, sqlx::Error> {
    let document = serde_json::to_string(item).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

    let row = sqlx::query(
        r#"
        INSERT INTO inventory_items (id, external_id, name, sku, document, last_synced_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT (external_id) DO UPDATE SET
            name = excluded.name,
            sku = excluded.sku,
            document = excluded.document,
            last_synced_at = excluded.last_synced_at
        RETURNING id
        "#,
    )
    .bind(item.id.to_string())
    .bind(&item.external_id)
    .bind(&item.name)
    .bind(item.sku.as_deref())
    .bind(document)
    .bind(timestamp(item.last_synced_at))
    .fetch_one(pool)
    .await?;

    parse_id(row.get::<String, _>("id").as_str())
}

/// Load items whose name or SKU matches `query`, ordered by name
pub async fn list_items(pool: &SqlitePool, query: &str) -> Result<Vec<InventoryItem>, sqlx::Error> {
    let rows = sqlx::query("SELECT id, document FROM inventory_items ORDER BY name ASC")
        .fetch_all(pool)
        .await?;

    let mut items = Vec::new();
    for row in &rows {
        let document: String = row.get("document");
        let mut item: InventoryItem =
            serde_json::from_str(&document).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        item.id = parse_id(row.get::<String, _>("id").as_str())?;
        if item.matches_query(query) {
            items.push(item);
            if items.len() == LIST_LIMIT {
                break;
            }
        }
    }
    Ok(items)
}

pub async fn count_items(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM inventory_items")
        .fetch_one(pool)
        .await?;
    Ok(row.get("count"))
}
