//! Reservation listing handler

use axum::{extract::State, Json};
use sqlx::SqlitePool;

use crate::backend::error::{ApiQuery, BackendError};
use crate::shared::booking::{ListQuery, ReservationsResponse};

use super::db;

/// List mirrored reservations, filtered by `q` and ordered by start time
pub async fn list_reservations(
    State(pool): State<SqlitePool>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<ReservationsResponse>, BackendError> {
    let reservations = db::list_reservations(&pool, query.q.as_deref().unwrap_or(""))
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reservations: {:?}", e);
            BackendError::from(e)
        })?;
    Ok(Json(ReservationsResponse {
        ok: true,
        reservations,
    }))
}
