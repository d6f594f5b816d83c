/**
 * Booking Orchestrator
 *
 * Creates a parent booking upstream and attaches resolved line items to it.
 *
 * # Creation
 *
 * Every header auth scheme is tried against every order path with three
 * wrapper shapes (`order`, `reservation`, `booking`), each spelling the
 * start and end fields its own way. The first 2xx whose body carries an id
 * wins. A 2xx without an id does not count as a created booking.
 *
 * # Line Items
 *
 * Each resolved item is attached on its own through up to six
 * (path, payload) shapes per auth scheme. A failed item does not stop the
 * next one. The orchestration is not transactional: a booking may be
 * created with none of its items attached, which the returned counts show.
 */

use serde_json::{json, Map, Value};

use crate::shared::booking::{
    BookingAttempts, CreateBookingRequest, CreateBookingResponse, CreateWithPaylinkResponse,
    CustomerSummary,
};

use super::candidates::ORDER_CREATE_PATHS;
use super::client::RequestDescriptor;
use super::email::{build_payment_email, OrderSummary, LINK_UNAVAILABLE};
use super::normalize::wrapped_id;
use super::resolver::{ProductIndex, RESOLVE_PAGE_SIZE};
use super::runner::{AttemptLog, Runner};
use super::{Booqable, BooqableError};

/// Attempts kept per phase in the booking response
const BOOKING_TRACE_LIMIT: usize = 5;

const ORDER_WRAPPERS: &[&str] = &["order", "reservation", "booking"];

/// A line item ready to be attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedItem {
    pub product_id: String,
    pub quantity: u32,
    pub title: Option<String>,
}

/// Outcome of item resolution
#[derive(Debug, Clone, Default)]
pub struct ItemResolution {
    pub resolved: Vec<ResolvedItem>,
    pub unresolved: usize,
}

/// A booking accepted upstream
#[derive(Debug, Clone)]
pub struct CreatedOrder {
    pub order_id: String,
    /// Full creation response
    pub created: Value,
    /// The unwrapped order object
    pub order: Value,
}

/// Counts of one attachment pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Attachment {
    pub attached: usize,
    pub failed: usize,
}

fn customer_payload(request: &CreateBookingRequest, customer_id: Option<&str>) -> Value {
    match customer_id {
        Some(id) => json!({ "id": id }),
        None => {
            let customer = &request.customer;
            json!({
                "name": customer.name.as_deref().unwrap_or(""),
                "email": customer.email.as_deref().unwrap_or(""),
                "phone": customer.phone.as_deref().unwrap_or(""),
            })
        }
    }
}

/// The three creation shapes, in the order they are tried
pub fn order_payloads(request: &CreateBookingRequest, customer_id: Option<&str>) -> Vec<Value> {
    let customer = customer_payload(request, customer_id);
    let notes = request.notes.as_deref().unwrap_or("");
    let start = request.start_at.as_deref();
    let end = request.end_at.as_deref();

    vec![
        json!({ "order": { "customer": customer, "starts_at": start, "ends_at": end, "notes": notes } }),
        json!({ "reservation": { "customer": customer, "start_at": start, "end_at": end, "notes": notes } }),
        json!({ "booking": { "customer": customer, "start_time": start, "end_time": end, "notes": notes } }),
    ]
}

fn line_fields(item: &ResolvedItem, order_id: Option<&str>) -> Value {
    let mut fields = Map::new();
    if let Some(order_id) = order_id {
        fields.insert("order_id".to_string(), json!(order_id));
    }
    fields.insert("product_id".to_string(), json!(item.product_id));
    fields.insert("quantity".to_string(), json!(item.quantity));
    fields.insert("title".to_string(), json!(item.title));
    Value::Object(fields)
}

/// Attachment shapes for one item, in the order they are tried
pub fn line_item_candidates(order_id: &str, item: &ResolvedItem) -> Vec<(String, Value)> {
    let nested = line_fields(item, None);
    let flat = line_fields(item, Some(order_id));
    vec![
        (format!("/orders/{order_id}/order_lines"), json!({ "order_line": nested })),
        (format!("/orders/{order_id}/lines"), json!({ "line": nested })),
        ("/order_lines".to_string(), json!({ "order_line": flat })),
        ("/lines".to_string(), json!({ "line": flat })),
        (format!("/v1/orders/{order_id}/order_lines"), json!({ "order_line": nested })),
        ("/v1/order_lines".to_string(), json!({ "order_line": flat })),
    ]
}

/// Read a created booking from a 2xx body
fn created_order(body: &Value) -> Option<CreatedOrder> {
    let order_id = wrapped_id(body, ORDER_WRAPPERS)?;
    let order = ORDER_WRAPPERS
        .iter()
        .find_map(|key| body.get(*key).filter(|v| v.is_object()))
        .unwrap_or(body)
        .clone();
    Some(CreatedOrder {
        order_id,
        created: body.clone(),
        order,
    })
}

impl Booqable {
    /// Resolve requested items to product ids
    ///
    /// Items carrying a product id are taken as-is. The rest are matched
    /// against one product listing; a failed listing leaves them unresolved.
    pub async fn resolve_items(&self, runner: &Runner, request: &CreateBookingRequest) -> ItemResolution {
        let needs_lookup = request
            .items
            .iter()
            .any(|item| !item.product_id.as_deref().is_some_and(|id| !id.trim().is_empty()));

        let index = if needs_lookup {
            match self.list_products(runner, RESOLVE_PAGE_SIZE).await {
                Ok(listing) => listing.index,
                Err(e) => {
                    tracing::warn!("Could not list products to resolve booking items: {}", e);
                    ProductIndex::default()
                }
            }
        } else {
            ProductIndex::default()
        };

        let mut resolution = ItemResolution::default();
        for item in &request.items {
            let direct = item
                .product_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty());
            let resolved = match direct {
                Some(id) => Some(ResolvedItem {
                    product_id: id.to_string(),
                    quantity: item.quantity,
                    title: item.name.clone().or_else(|| item.title.clone()),
                }),
                None => index.resolve_item(item).map(|product| ResolvedItem {
                    product_id: product.id.clone(),
                    quantity: item.quantity,
                    title: item
                        .title
                        .clone()
                        .or_else(|| item.name.clone())
                        .or_else(|| Some(product.name.clone()).filter(|n| !n.is_empty())),
                }),
            };
            match resolved {
                Some(resolved) => resolution.resolved.push(resolved),
                None => {
                    tracing::debug!(?item, "Booking item did not match any product");
                    resolution.unresolved += 1;
                }
            }
        }
        resolution
    }

    /// Create the parent booking
    ///
    /// The first 2xx ends the search. If its body carries no id the
    /// creation has failed and `None` is returned.
    pub async fn create_order(
        &self,
        runner: &Runner,
        base: &str,
        request: &CreateBookingRequest,
        customer_id: Option<&str>,
        log: &mut AttemptLog,
    ) -> Option<CreatedOrder> {
        let credentials = self.space().credentials();
        let payloads = order_payloads(request, customer_id);

        let mut candidates = Vec::new();
        for auth in self.space().write_auths() {
            for path in ORDER_CREATE_PATHS {
                for payload in &payloads {
                    candidates.push(RequestDescriptor::post(base, *path, auth, credentials, payload.clone()));
                }
            }
        }

        let hit = runner
            .first_success(candidates, log, |response| {
                response.is_success().then(|| created_order(&response.json))
            })
            .await?;
        let Some(order) = hit.value else {
            tracing::warn!(path = %hit.request.path, "Booqable accepted the booking but returned no id");
            return None;
        };
        tracing::info!(order_id = %order.order_id, path = %hit.request.path, "Created Booqable booking");
        Some(order)
    }

    /// Attach each item independently, first accepting shape wins
    pub async fn attach_items(
        &self,
        runner: &Runner,
        base: &str,
        order_id: &str,
        items: &[ResolvedItem],
        log: &mut AttemptLog,
    ) -> Attachment {
        let credentials = self.space().credentials();
        let auths = self.space().write_auths();
        let mut attachment = Attachment::default();

        for item in items {
            let mut candidates = Vec::new();
            for auth in &auths {
                for (path, body) in line_item_candidates(order_id, item) {
                    candidates.push(RequestDescriptor::post(base, path, *auth, credentials, body));
                }
            }
            let hit = runner
                .first_success(candidates, log, |response| response.is_success().then_some(()))
                .await;
            match hit {
                Some(_) => attachment.attached += 1,
                None => {
                    tracing::warn!(order_id, product_id = %item.product_id, "No line item shape accepted");
                    attachment.failed += 1;
                }
            }
        }
        attachment
    }

    /// Create a booking and attach its items
    pub async fn create_booking(&self, request: &CreateBookingRequest) -> Result<CreateBookingResponse, BooqableError> {
        let runner = self.runner();
        let config = self.discover_base(&runner).await?;
        let resolution = self.resolve_items(&runner, request).await;

        let mut create_log = AttemptLog::new();
        let Some(order) = self
            .create_order(&runner, &config.base, request, None, &mut create_log)
            .await
        else {
            return Err(BooqableError::rejected("Create failed (no endpoint accepted).", &create_log));
        };

        let mut item_log = AttemptLog::new();
        let attachment = self
            .attach_items(&runner, &config.base, &order.order_id, &resolution.resolved, &mut item_log)
            .await;

        Ok(CreateBookingResponse {
            ok: true,
            created: order.created,
            order_id: order.order_id,
            items_requested: request.items.len(),
            items_attached: attachment.attached,
            items_unresolved: resolution.unresolved,
            items_failed: attachment.failed,
            attempts: BookingAttempts {
                create: create_log.head(BOOKING_TRACE_LIMIT),
                items: item_log.head(BOOKING_TRACE_LIMIT),
            },
        })
    }

    /// Create a booking for a reused or new customer, then draft the
    /// payment email
    pub async fn create_booking_with_paylink(
        &self,
        request: &CreateBookingRequest,
        business: &str,
    ) -> Result<CreateWithPaylinkResponse, BooqableError> {
        let runner = self.runner();
        let config = self.discover_base(&runner).await?;

        let mut customer_log = AttemptLog::new();
        let customer = self
            .find_or_create_customer(&runner, &config.base, &request.customer, &mut customer_log)
            .await;

        let mut create_log = AttemptLog::new();
        let Some(order) = self
            .create_order(&runner, &config.base, request, customer.id.as_deref(), &mut create_log)
            .await
        else {
            return Err(BooqableError::rejected("Failed to create order/booking.", &create_log));
        };

        let (attachment, unresolved) = if request.items.is_empty() {
            (Attachment::default(), 0)
        } else {
            let resolution = self.resolve_items(&runner, request).await;
            let mut item_log = AttemptLog::new();
            let attachment = self
                .attach_items(&runner, &config.base, &order.order_id, &resolution.resolved, &mut item_log)
                .await;
            (attachment, resolution.unresolved)
        };

        let link = self
            .resolve_payment_link(&runner, &config.base, &order.order_id)
            .await
            .link;
        let summary = OrderSummary::from_value(&order.order);
        let email = build_payment_email(
            link.as_deref().unwrap_or(LINK_UNAVAILABLE),
            &summary,
            request.customer.name.as_deref(),
            business,
        );

        Ok(CreateWithPaylinkResponse {
            ok: true,
            order_id: order.order_id,
            customer: CustomerSummary {
                reused: customer.existing,
                created: customer.created,
                id: customer.id,
            },
            items_requested: request.items.len(),
            items_attached: attachment.attached,
            items_unresolved: unresolved,
            payment_link: link,
            email,
        })
    }
}
