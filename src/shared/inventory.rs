//! Canonical Inventory Item
//!
//! Rental inventory mirrored from the upstream items resource, keyed by the
//! upstream id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: Uuid,
    pub external_id: String,
    pub name: String,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub stock_count: i64,
    pub images: Vec<String>,
    pub active: bool,
    pub last_synced_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Case-insensitive match on name or SKU; empty query matches everything
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty()
            || self.name.to_lowercase().contains(&needle)
            || self
                .sku
                .as_deref()
                .is_some_and(|sku| sku.to_lowercase().contains(&needle))
    }
}
