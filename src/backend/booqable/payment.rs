/**
 * Payment-Link Resolver
 *
 * Obtains a URL the customer can pay through for an existing booking.
 *
 * # Passes
 *
 * 1. **Create** - POST invoice, checkout, payment-link and payment shapes, in
 *    that order, for every header auth scheme. A 2xx whose body holds a link
 *    ends the search.
 * 2. **Read back** - when creation produced no link, GET the booking's
 *    invoices, checkouts, payment links and finally the order itself.
 *
 * # Link Extraction
 *
 * A body is first checked for well-known link fields. If none of them holds
 * an HTTP(S) URL, the object graph is walked breadth-first in key order and
 * the first URL-shaped string wins.
 */

use std::collections::VecDeque;

use reqwest::Url;
use serde_json::{json, Value};

use crate::shared::booking::{PaymentLinkRequest, PaymentLinkResponse, TriedSummary};
use crate::shared::SharedError;

use super::client::RequestDescriptor;
use super::runner::{accept_success, AttemptLog, Runner};
use super::{Booqable, BooqableError, Trace, TRACE_LIMIT};

/// Well-known link fields, checked in order
pub const LINK_FIELDS: &[&[&str]] = &[
    &["payment_url"],
    &["checkout_url"],
    &["public_url"],
    &["hosted_invoice_url"],
    &["url"],
    &["invoice", "payment_url"],
    &["invoice", "checkout_url"],
    &["invoice", "public_url"],
    &["invoice", "url"],
    &["links", "payment"],
    &["links", "checkout"],
    &["links", "public"],
    &["data", "payment_url"],
    &["data", "checkout_url"],
    &["data", "public_url"],
    &["data", "url"],
];

/// Nesting depth explored by the deep scan
pub const MAX_SCAN_DEPTH: usize = 16;

pub fn is_http_url(candidate: &str) -> bool {
    Url::parse(candidate.trim())
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}

fn field_at<'a>(body: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(body, |value, key| value.get(*key))
}

/// Breadth-first search for the first URL-shaped string
///
/// Object keys are visited in insertion order, arrays in index order.
/// Containers deeper than [`MAX_SCAN_DEPTH`] are not entered.
pub fn deep_scan_url(body: &Value) -> Option<String> {
    let mut queue: VecDeque<(&Value, usize)> = VecDeque::from([(body, 0)]);
    while let Some((value, depth)) = queue.pop_front() {
        let children: Box<dyn Iterator<Item = &Value> + '_> = match value {
            Value::Object(map) => Box::new(map.values()),
            Value::Array(items) => Box::new(items.iter()),
            _ => continue,
        };
        for child in children {
            match child {
                Value::String(s) if is_http_url(s) => return Some(s.trim().to_string()),
                Value::Object(_) | Value::Array(_) if depth + 1 < MAX_SCAN_DEPTH => {
                    queue.push_back((child, depth + 1));
                }
                _ => {}
            }
        }
    }
    None
}

/// Extract a payment link from a response body
pub fn find_payment_url(body: &Value) -> Option<String> {
    LINK_FIELDS
        .iter()
        .filter_map(|path| field_at(body, path).and_then(Value::as_str))
        .find(|s| is_http_url(s))
        .map(|s| s.trim().to_string())
        .or_else(|| deep_scan_url(body))
}

/// POST candidates of the create pass, in order
pub fn create_candidates(order_id: &str) -> Vec<(String, Value)> {
    let invoice = json!({ "invoice": { "order_id": order_id } });
    let checkout = json!({ "checkout": { "order_id": order_id } });
    let payment_link = json!({ "payment_link": { "order_id": order_id } });
    let payment = json!({ "payment": { "order_id": order_id } });

    let mut candidates = Vec::with_capacity(20);
    for path in [
        format!("/orders/{order_id}/invoices"),
        "/invoices".to_string(),
        format!("/v1/orders/{order_id}/invoices"),
        "/v1/invoices".to_string(),
        format!("/api/1/orders/{order_id}/invoices"),
        "/api/1/invoices".to_string(),
        format!("/orders/{order_id}/invoices.json"),
        "/invoices.json".to_string(),
    ] {
        candidates.push((path, invoice.clone()));
    }
    for path in [
        format!("/orders/{order_id}/checkouts"),
        "/checkouts".to_string(),
        format!("/api/1/orders/{order_id}/checkouts"),
        "/api/1/checkouts".to_string(),
        format!("/orders/{order_id}/checkouts.json"),
        "/checkouts.json".to_string(),
    ] {
        candidates.push((path, checkout.clone()));
    }
    for path in [
        format!("/orders/{order_id}/payment_links"),
        "/payment_links".to_string(),
        format!("/api/1/orders/{order_id}/payment_links"),
        "/api/1/payment_links".to_string(),
    ] {
        candidates.push((path, payment_link.clone()));
    }
    for path in [format!("/orders/{order_id}/payments"), "/payments".to_string()] {
        candidates.push((path, payment.clone()));
    }
    candidates
}

/// GET candidates of the read-back pass: `(path, order_id query filter)`
pub fn fetch_candidates(order_id: &str) -> Vec<(String, bool)> {
    vec![
        (format!("/orders/{order_id}/invoices"), false),
        (format!("/v1/orders/{order_id}/invoices"), false),
        (format!("/api/1/orders/{order_id}/invoices"), false),
        ("/invoices".to_string(), true),
        ("/v1/invoices".to_string(), true),
        ("/api/1/invoices".to_string(), true),
        (format!("/orders/{order_id}/checkouts"), false),
        (format!("/api/1/orders/{order_id}/checkouts"), false),
        ("/checkouts".to_string(), true),
        ("/api/1/checkouts".to_string(), true),
        (format!("/orders/{order_id}/payment_links"), false),
        (format!("/api/1/orders/{order_id}/payment_links"), false),
        ("/payment_links".to_string(), true),
        ("/api/1/payment_links".to_string(), true),
        (format!("/orders/{order_id}"), false),
        (format!("/v1/orders/{order_id}"), false),
        (format!("/api/1/orders/{order_id}"), false),
    ]
}

/// Paths the order itself can be read from
pub fn order_paths(order_id: &str) -> [String; 3] {
    [
        format!("/orders/{order_id}"),
        format!("/v1/orders/{order_id}"),
        format!("/api/1/orders/{order_id}"),
    ]
}

/// Outcome of both resolution passes
#[derive(Debug, Clone, Default)]
pub struct PaymentLinkOutcome {
    pub link: Option<String>,
    /// Body of the last accepted creation call
    pub created: Option<Value>,
    pub create_log: AttemptLog,
    pub fetch_log: AttemptLog,
}

impl Booqable {
    /// Create or locate a payment link for `order_id` on `base`
    pub async fn resolve_payment_link(&self, runner: &Runner, base: &str, order_id: &str) -> PaymentLinkOutcome {
        let auths = self.space().write_auths();
        let credentials = self.space().credentials();
        let mut outcome = PaymentLinkOutcome::default();

        let mut creations = Vec::new();
        for auth in &auths {
            for (path, body) in create_candidates(order_id) {
                creations.push(RequestDescriptor::post(base, path, *auth, credentials, body));
            }
        }
        let mut created = None;
        let hit = runner
            .first_success(creations, &mut outcome.create_log, |response| {
                if !response.is_success() {
                    return None;
                }
                created = Some(response.json.clone());
                find_payment_url(&response.json)
            })
            .await;
        outcome.created = created;
        if let Some(hit) = hit {
            tracing::info!(order_id, path = %hit.request.path, "Payment link obtained on creation");
            outcome.link = Some(hit.value);
            return outcome;
        }

        let mut reads = Vec::new();
        for auth in &auths {
            for (path, filtered) in fetch_candidates(order_id) {
                let request = RequestDescriptor::get(base, path, *auth, credentials);
                reads.push(if filtered {
                    request.with_query("order_id", order_id)
                } else {
                    request
                });
            }
        }
        let hit = runner
            .first_success(reads, &mut outcome.fetch_log, |response| {
                response
                    .is_success()
                    .then(|| find_payment_url(&response.json))
                    .flatten()
            })
            .await;
        match hit {
            Some(hit) => {
                tracing::info!(order_id, path = %hit.request.path, "Payment link found on read-back");
                outcome.link = Some(hit.value);
            }
            None => tracing::warn!(
                order_id,
                create_attempts = outcome.create_log.len(),
                fetch_attempts = outcome.fetch_log.len(),
                "No payment link could be obtained"
            ),
        }
        outcome
    }

    /// Read the order resource, returning its body
    pub async fn fetch_order(&self, runner: &Runner, base: &str, order_id: &str, log: &mut AttemptLog) -> Option<Value> {
        let credentials = self.space().credentials();
        let mut reads = Vec::new();
        for auth in self.space().write_auths() {
            for path in order_paths(order_id) {
                reads.push(RequestDescriptor::get(base, path, auth, credentials));
            }
        }
        runner
            .first_success(reads, log, accept_success)
            .await
            .map(|hit| hit.value)
    }

    /// Get or attach a payment link for an existing order
    pub async fn payment_link(&self, request: &PaymentLinkRequest) -> Result<PaymentLinkResponse, BooqableError> {
        if request.order_id.is_empty() {
            return Err(SharedError::validation("orderId", "orderId is required").into());
        }
        let runner = self.runner();
        let config = self.discover_base(&runner).await?;
        let outcome = self
            .resolve_payment_link(&runner, &config.base, &request.order_id)
            .await;

        match outcome.link {
            Some(link) => Ok(PaymentLinkResponse {
                ok: true,
                invoice_created: outcome.created.is_some(),
                payment_link: link,
                created: outcome.created,
                tried: TriedSummary {
                    create: outcome.create_log.head(TRACE_LIMIT),
                    fetch: outcome.fetch_log.head(TRACE_LIMIT),
                },
            }),
            None => Err(BooqableError::Rejected {
                message: if outcome.created.is_some() {
                    "Invoice created but no payment link could be found.".to_string()
                } else {
                    "No invoice/checkout endpoint accepted.".to_string()
                },
                trace: Trace::split(&outcome.create_log, &outcome.fetch_log),
            }),
        }
    }
}
