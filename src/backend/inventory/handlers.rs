//! Inventory listing handler

use axum::{extract::State, Json};
use sqlx::SqlitePool;

use crate::backend::error::{ApiQuery, BackendError};
use crate::shared::booking::{InventoryResponse, ListQuery};

use super::db;

/// List mirrored inventory items matching `q` on name or SKU
pub async fn list_inventory(
    State(pool): State<SqlitePool>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<InventoryResponse>, BackendError> {
    let items = db::list_items(&pool, query.q.as_deref().unwrap_or(""))
        .await
        .map_err(|e| {
            tracing::error!("Failed to list inventory: {:?}", e);
            BackendError::from(e)
        })?;
    Ok(Json(InventoryResponse { ok: true, items }))
}
