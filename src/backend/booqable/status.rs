//! Payment and status updates on existing bookings
//!
//! - **Mark paid** records a payment in minor currency units.
//! - **Mark confirmed** moves a booking to a new status, trying PATCH and then
//!   PUT for every (path, body) shape.

use reqwest::Method;
use serde_json::{json, Value};

use crate::shared::booking::{MarkConfirmedRequest, MarkConfirmedResponse, MarkPaidRequest, MarkPaidResponse};
use crate::shared::SharedError;

use super::client::RequestDescriptor;
use super::runner::{accept_success, AttemptLog};
use super::{Booqable, BooqableError, TRACE_LIMIT};

pub const DEFAULT_CURRENCY: &str = "usd";
pub const DEFAULT_STATUS: &str = "reserved";

/// Normalize a caller amount to integer cents
///
/// A JSON integer is taken as cents already. Decimals and numeric strings
/// are dollars and are multiplied by 100, rounding to the nearest cent.
pub fn normalize_amount_cents(amount: Option<&Value>) -> Result<i64, SharedError> {
    let cents = match amount {
        None | Some(Value::Null) => return Err(SharedError::validation("amount", "amount is required")),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(cents) => Some(cents),
            None => n.as_f64().map(|dollars| (dollars * 100.0).round() as i64),
        },
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|dollars| dollars.is_finite())
            .map(|dollars| (dollars * 100.0).round() as i64),
        Some(_) => None,
    };
    match cents {
        Some(cents) if cents > 0 => Ok(cents),
        _ => Err(SharedError::validation("amount", "amount must be > 0")),
    }
}

/// Payment shapes, in the order they are tried
pub fn payment_candidates(order_id: &str, cents: i64, currency: &str, note: &str) -> Vec<(String, Value)> {
    let with_order = json!({
        "payment": { "order_id": order_id, "amount_in_cents": cents, "currency": currency, "note": note }
    });
    vec![
        (format!("/orders/{order_id}/payments"), with_order.clone()),
        (
            format!("/orders/{order_id}/payments"),
            json!({ "payment": { "amount_in_cents": cents, "currency": currency, "note": note } }),
        ),
        ("/payments".to_string(), with_order.clone()),
        (
            "/payments".to_string(),
            json!({ "payment": { "order_id": order_id, "amount_cents": cents, "currency": currency, "note": note } }),
        ),
        (format!("/api/1/orders/{order_id}/payments"), with_order.clone()),
        ("/api/1/payments".to_string(), with_order),
        (
            format!("/orders/{order_id}/checkouts"),
            json!({ "checkout": { "order_id": order_id, "note": note } }),
        ),
        (
            format!("/api/1/orders/{order_id}/checkouts"),
            json!({ "checkout": { "order_id": order_id, "note": note } }),
        ),
    ]
}

pub fn status_paths(order_id: &str) -> Vec<String> {
    ["orders", "reservations", "bookings"]
        .iter()
        .flat_map(|resource| {
            [
                format!("/{resource}/{order_id}"),
                format!("/v1/{resource}/{order_id}"),
                format!("/api/1/{resource}/{order_id}"),
            ]
        })
        .collect()
}

pub fn status_bodies(status: &str) -> [Value; 4] {
    [
        json!({ "order": { "status": status } }),
        json!({ "order": { "statuses": [status] } }),
        json!({ "reservation": { "status": status } }),
        json!({ "booking": { "status": status } }),
    ]
}

impl Booqable {
    pub async fn mark_paid(&self, request: &MarkPaidRequest) -> Result<MarkPaidResponse, BooqableError> {
        if request.order_id.is_empty() {
            return Err(SharedError::validation("orderId", "orderId is required").into());
        }
        let cents = normalize_amount_cents(request.amount.as_ref())?;
        let currency = request
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CURRENCY)
            .to_lowercase();
        let note = request.note.as_deref().unwrap_or("");

        let runner = self.runner();
        let config = self.discover_base(&runner).await?;
        let credentials = self.space().credentials();

        let mut candidates = Vec::new();
        for auth in self.space().write_auths() {
            for (path, body) in payment_candidates(&request.order_id, cents, &currency, note) {
                candidates.push(RequestDescriptor::post(&config.base, path, auth, credentials, body));
            }
        }
        let mut log = AttemptLog::new();
        let Some(hit) = runner.first_success(candidates, &mut log, accept_success).await else {
            return Err(BooqableError::rejected("Booqable payment did not accept.", &log));
        };

        tracing::info!(order_id = %request.order_id, amount_cents = cents, %currency, "Recorded payment");
        Ok(MarkPaidResponse {
            ok: true,
            order_id: request.order_id.clone(),
            amount_cents: cents,
            currency,
            receipt: hit.value,
            tried: log.head(TRACE_LIMIT),
        })
    }

    pub async fn mark_confirmed(&self, request: &MarkConfirmedRequest) -> Result<MarkConfirmedResponse, BooqableError> {
        if request.order_id.is_empty() {
            return Err(SharedError::validation("orderId", "orderId is required").into());
        }
        let status = request
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_STATUS)
            .to_string();

        let runner = self.runner();
        let config = self.discover_base(&runner).await?;
        let credentials = self.space().credentials();

        let mut candidates = Vec::new();
        for auth in self.space().write_auths() {
            for path in status_paths(&request.order_id) {
                for body in status_bodies(&status) {
                    for method in [Method::PATCH, Method::PUT] {
                        candidates.push(
                            RequestDescriptor::post(&config.base, path.clone(), auth, credentials, body.clone())
                                .with_method(method),
                        );
                    }
                }
            }
        }
        let mut log = AttemptLog::new();
        let Some(hit) = runner.first_success(candidates, &mut log, accept_success).await else {
            return Err(BooqableError::rejected("Could not update status in Booqable.", &log));
        };

        tracing::info!(order_id = %request.order_id, %status, method = %hit.request.method, "Updated booking status");
        Ok(MarkConfirmedResponse {
            ok: true,
            order_id: request.order_id.clone(),
            new_status: status,
            result: hit.value,
            tried: log.head(TRACE_LIMIT),
        })
    }
}
