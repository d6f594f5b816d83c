/**
 * Database Operations for Reservations
 *
 * Reservations are stored as JSON documents next to the columns they are
 * keyed, filtered and ordered by. `(external_system, external_id)` is the
 * natural key; the local `id` is assigned on first insert and kept by every
 * later upsert.
 */

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::shared::Reservation;

/// Most reservations returned by a listing
pub const LIST_LIMIT: usize = 500;

pub(crate) fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_id(raw: &str) -> Result<Uuid, sqlx::Error> {
    Uuid::parse_str(raw).map_err(|e| sqlx::Error::Decode(format!("Invalid row id {}: {}", raw, e).into()))
}

/// Insert or update a reservation by its natural key
///
/// # Returns
/// The local id of the stored row, which is the existing id when the
/// reservation was already known.
pub async fn upsert_reservation(pool: &SqlitePool, reservation: &Reservation) -> Result<Uuid, sqlx::Error> {
    let document = serde_json::to_string(reservation).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

    let row = sqlx::query(
        r#"
        INSERT INTO reservations (id, external_system, external_id, status, start_at, document, last_synced_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ON CONFLICT (external_system, external_id) DO UPDATE SET
            status = excluded.status,
            start_at = excluded.start_at,
            document = excluded.document,
            last_synced_at = excluded.last_synced_at
        RETURNING id
        "#,
    )
    .bind(reservation.id.to_string())
    .bind(&reservation.external_system)
    .bind(&reservation.external_id)
    .bind(&reservation.status)
    .bind(reservation.start_at.map(timestamp))
    .bind(document)
    .bind(timestamp(reservation.last_synced_at))
    .fetch_one(pool)
    .await?;

    parse_id(row.get::<String, _>("id").as_str())
}

fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Reservation, sqlx::Error> {
    let document: String = row.get("document");
    let mut reservation: Reservation =
        serde_json::from_str(&document).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    reservation.id = parse_id(row.get::<String, _>("id").as_str())?;
    Ok(reservation)
}

/// Load reservations matching `query`, ordered by start time
pub async fn list_reservations(pool: &SqlitePool, query: &str) -> Result<Vec<Reservation>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, document
        FROM reservations
        ORDER BY start_at ASC, external_id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut reservations = Vec::new();
    for row in &rows {
        let reservation = from_row(row)?;
        if reservation.matches_query(query) {
            reservations.push(reservation);
            if reservations.len() == LIST_LIMIT {
                break;
            }
        }
    }
    Ok(reservations)
}

pub async fn find_reservation(
    pool: &SqlitePool,
    external_system: &str,
    external_id: &str,
) -> Result<Option<Reservation>, sqlx::Error> {
    let row = sqlx::query("SELECT id, document FROM reservations WHERE external_system = ?1 AND external_id = ?2")
        .bind(external_system)
        .bind(external_id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(from_row).transpose()
}

pub async fn count_reservations(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM reservations")
        .fetch_one(pool)
        .await?;
    Ok(row.get("count"))
}
