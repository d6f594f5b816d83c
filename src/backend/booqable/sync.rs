/**
 * Synchronizers
 *
 * Mirror upstream reservations and inventory items into the local store.
 *
 * # Pass
 *
 * ```text
 * Idle -> Fetching(1) -> Normalizing -> Upserting -> Fetching(2) -> ... -> Idle
 * ```
 *
 * Discovery doubles as the fetch of page 1. Later pages reuse the winning
 * endpoint. A pass ends on the first empty page, or at the configured page
 * cap, which is reported as `page_limit_reached`.
 *
 * # Idempotency
 *
 * Records are upserted by their natural key, so a second pass over an
 * unchanged upstream leaves the record count unchanged and only refreshes
 * `last_synced_at`.
 *
 * # Failures
 *
 * A failing page aborts the pass. A record that cannot be normalized or
 * stored is handled by [`SyncFailurePolicy`]: `Abort` ends the pass with the
 * error, `Skip` counts it and moves on.
 */

use chrono::Utc;
use serde_json::Value;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::backend::inventory::db::upsert_item;
use crate::backend::reservations::db::upsert_reservation;
use crate::shared::booking::SyncResponse;
use crate::shared::config::{SyncFailurePolicy, SyncSettings};
use crate::shared::SharedError;

use super::normalize::{normalize_inventory_item, normalize_reservation};
use super::prober::{extract_list, list_request, Discovery, EndpointConfig, ProbeParams, ResourceKind};
use super::runner::AttemptLog;
use super::{Booqable, BooqableError};

/// What a pass mirrors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTarget {
    Reservations,
    Inventory,
}

impl SyncTarget {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Reservations => ResourceKind::Reservations,
            Self::Inventory => ResourceKind::InventoryItems,
        }
    }
}

/// Phases of a pass, logged on each transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Fetching { page: u32 },
    Normalizing { page: u32 },
    Upserting { page: u32 },
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Booqable(#[from] BooqableError),

    #[error("Failed to fetch page {page} from Booqable")]
    Upstream { page: u32, attempts: AttemptLog },

    #[error("Record could not be normalized: {0}")]
    Normalize(SharedError),

    #[error("Failed to store record: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Outcome of a completed pass
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub imported: usize,
    pub skipped: usize,
    /// Pages fetched, the terminating empty page included
    pub pages: u32,
    pub config: EndpointConfig,
    pub page_limit_reached: bool,
}

impl SyncReport {
    pub fn into_response(self) -> SyncResponse {
        SyncResponse {
            ok: true,
            imported: self.imported,
            skipped: self.skipped,
            pages: self.pages,
            base: self.config.base,
            endpoint: self.config.resource_path,
            auth: self.config.auth.name().to_string(),
            page_limit_reached: self.page_limit_reached,
        }
    }
}

fn enter(target: SyncTarget, phase: SyncPhase) {
    tracing::debug!(?target, ?phase, "Sync phase");
}

async fn store_record(pool: &SqlitePool, target: SyncTarget, record: &Value) -> Result<(), SyncError> {
    let synced_at = Utc::now();
    match target {
        SyncTarget::Reservations => {
            let reservation = normalize_reservation(record, synced_at).map_err(SyncError::Normalize)?;
            upsert_reservation(pool, &reservation).await?;
        }
        SyncTarget::Inventory => {
            let item = normalize_inventory_item(record, synced_at).map_err(SyncError::Normalize)?;
            upsert_item(pool, &item).await?;
        }
    }
    Ok(())
}

impl Booqable {
    /// Run one synchronization pass for `target`
    pub async fn sync(
        &self,
        pool: &SqlitePool,
        target: SyncTarget,
        settings: &SyncSettings,
    ) -> Result<SyncReport, SyncError> {
        let kind = target.kind();
        let runner = self.runner();
        let params = ProbeParams::first_page(settings.per_page.max(1));
        let max_pages = settings.max_pages.max(1);

        enter(target, SyncPhase::Fetching { page: 1 });
        let (config, mut body) = match self.discover(&runner, kind, params).await {
            Discovery::Found { config, body, .. } => (config, body),
            exhausted => {
                tracing::warn!(?target, "Sync could not find a list endpoint");
                return Err(BooqableError::from_discovery(exhausted).into());
            }
        };
        tracing::info!(?target, base = %config.base, path = %config.resource_path, auth = %config.auth, "Starting sync pass");

        let mut imported = 0;
        let mut skipped = 0;
        let mut page = 1;
        let mut page_limit_reached = false;

        loop {
            let records = extract_list(&body, kind.list_keys());
            if records.is_empty() {
                break;
            }

            enter(target, SyncPhase::Normalizing { page });
            enter(target, SyncPhase::Upserting { page });
            for record in records {
                match store_record(pool, target, record).await {
                    Ok(()) => imported += 1,
                    Err(e) if settings.failure_policy == SyncFailurePolicy::Skip => {
                        tracing::warn!(?target, page, "Skipping record: {}", e);
                        skipped += 1;
                    }
                    Err(e) => {
                        tracing::error!(?target, page, "Sync aborted: {:?}", e);
                        return Err(e);
                    }
                }
            }

            if page >= max_pages {
                tracing::warn!(?target, max_pages, "Sync stopped at the page cap before an empty page");
                page_limit_reached = true;
                break;
            }

            page += 1;
            enter(target, SyncPhase::Fetching { page });
            let request = list_request(self.space(), &config, params.with_page(page));
            let mut attempts = AttemptLog::new();
            body = match runner.send(&request, &mut attempts).await {
                Some(response) if response.is_success() => response.json,
                _ => {
                    self.invalidate(kind);
                    tracing::error!(?target, page, "Sync page request failed");
                    return Err(SyncError::Upstream { page, attempts });
                }
            };
        }

        enter(target, SyncPhase::Idle);
        tracing::info!(?target, imported, skipped, pages = page, "Sync pass finished");
        Ok(SyncReport {
            imported,
            skipped,
            pages: page,
            config,
            page_limit_reached,
        })
    }
}
