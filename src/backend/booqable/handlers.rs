//! Booqable HTTP Handlers
//!
//! Thin axum wrappers around the engine operations. Every failure is
//! converted into a [`BackendError`] so the response carries `ok: false`
//! and, where one exists, the truncated attempt trace.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use sqlx::SqlitePool;

use crate::backend::error::{ApiJson, ApiQuery, BackendError};
use crate::shared::booking::{
    CreateBookingRequest, CreateBookingResponse, CreateWithPaylinkResponse, MarkConfirmedRequest,
    MarkConfirmedResponse, MarkPaidRequest, MarkPaidResponse, PaylinkEmailRequest, PaylinkEmailResponse,
    PaymentLinkRequest, PaymentLinkResponse, ProductsQuery, ProductsResponse, SyncResponse,
};
use crate::shared::AppConfig;

use super::sync::SyncTarget;
use super::{Booqable, BooqableError, Trace};

/// Create a booking with items
pub async fn create_booking(
    State(booqable): State<Booqable>,
    ApiJson(request): ApiJson<CreateBookingRequest>,
) -> Result<Json<CreateBookingResponse>, BackendError> {
    let response = booqable.create_booking(&request).await.map_err(|e| {
        tracing::error!("Failed to create booking: {:?}", e);
        BackendError::from(e)
    })?;
    Ok(Json(response))
}

/// Create a booking, obtain a payment link and draft the email
pub async fn create_with_paylink(
    State(booqable): State<Booqable>,
    State(config): State<Arc<AppConfig>>,
    ApiJson(request): ApiJson<CreateBookingRequest>,
) -> Result<Json<CreateWithPaylinkResponse>, BackendError> {
    let response = booqable
        .create_booking_with_paylink(&request, &config.business_name)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create booking with payment link: {:?}", e);
            BackendError::from(e)
        })?;
    Ok(Json(response))
}

/// Get or attach a payment link for an existing order
pub async fn payment_link(
    State(booqable): State<Booqable>,
    ApiJson(request): ApiJson<PaymentLinkRequest>,
) -> Result<Json<PaymentLinkResponse>, BackendError> {
    Ok(Json(booqable.payment_link(&request).await?))
}

pub async fn paylink_email(
    State(booqable): State<Booqable>,
    State(config): State<Arc<AppConfig>>,
    ApiJson(request): ApiJson<PaylinkEmailRequest>,
) -> Result<Json<PaylinkEmailResponse>, BackendError> {
    Ok(Json(booqable.paylink_email(&request, &config.business_name).await?))
}

/// List upstream products, optionally filtered by name
pub async fn list_products(
    State(booqable): State<Booqable>,
    ApiQuery(query): ApiQuery<ProductsQuery>,
) -> Result<Json<ProductsResponse>, BackendError> {
    match booqable.products(&query).await {
        Ok(response) => Ok(Json(response)),
        Err(BooqableError::Discovery { attempts }) => Err(BackendError::upstream(
            StatusCode::NOT_FOUND,
            "Could not list products",
            "attempts",
            Trace::from_log(&attempts),
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn mark_paid(
    State(booqable): State<Booqable>,
    ApiJson(request): ApiJson<MarkPaidRequest>,
) -> Result<Json<MarkPaidResponse>, BackendError> {
    Ok(Json(booqable.mark_paid(&request).await?))
}

pub async fn mark_confirmed(
    State(booqable): State<Booqable>,
    ApiJson(request): ApiJson<MarkConfirmedRequest>,
) -> Result<Json<MarkConfirmedResponse>, BackendError> {
    Ok(Json(booqable.mark_confirmed(&request).await?))
}

async fn run_sync(
    booqable: &Booqable,
    pool: &SqlitePool,
    config: &AppConfig,
    target: SyncTarget,
) -> Result<Json<SyncResponse>, BackendError> {
    let report = booqable.sync(pool, target, &config.sync).await.map_err(|e| {
        tracing::error!("Sync of {:?} failed: {:?}", target, e);
        BackendError::from(e)
    })?;
    Ok(Json(report.into_response()))
}

/// Mirror upstream reservations into the local store
pub async fn sync_reservations(
    State(booqable): State<Booqable>,
    State(pool): State<SqlitePool>,
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<SyncResponse>, BackendError> {
    run_sync(&booqable, &pool, &config, SyncTarget::Reservations).await
}

/// Mirror upstream inventory items into the local store
pub async fn sync_inventory(
    State(booqable): State<Booqable>,
    State(pool): State<SqlitePool>,
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<SyncResponse>, BackendError> {
    run_sync(&booqable, &pool, &config, SyncTarget::Inventory).await
}
