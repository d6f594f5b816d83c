//! Booking Operation Types
//!
//! Request and response bodies of the operations exposed to the route layer.
//! Field names are camelCase on the wire; request bodies also accept the
//! snake_case spellings older clients send.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::inventory::InventoryItem;
use super::reservation::Reservation;

/// One upstream call made while searching a candidate space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub base: String,
    pub path: String,
    pub method: String,
    pub auth: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Truncated response body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<String>,
}

/// Accept an id sent either as a string or as a number
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// Optional id, string or number; blank values count as absent
fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = id_string(deserializer)?;
    Ok(Some(id).filter(|id| !id.is_empty()))
}

/// Quantity given as a number or a numeric string, null meaning one
fn lenient_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let parsed = match &value {
        None | Some(Value::Null) => return Ok(default_quantity()),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match parsed {
        Some(n) if n.is_finite() && n >= 0.0 && n <= f64::from(u32::MAX) => Ok(n.round() as u32),
        _ => Err(serde::de::Error::custom(format!(
            "invalid quantity {}",
            value.unwrap_or(Value::Null)
        ))),
    }
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Requested line item, identified by product id, SKU or name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingItemInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default, alias = "product_id", deserialize_with = "opt_id_string")]
    pub product_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_quantity", alias = "qty", deserialize_with = "lenient_quantity")]
    pub quantity: u32,
}

impl BookingItemInput {
    pub fn named(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: Some(name.into()),
            sku: None,
            product_id: None,
            title: None,
            quantity,
        }
    }

    pub fn with_sku(sku: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: None,
            sku: Some(sku.into()),
            product_id: None,
            title: None,
            quantity,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[serde(default)]
    pub customer: CustomerInput,
    #[serde(default, alias = "start", alias = "starts_at")]
    pub start_at: Option<String>,
    #[serde(default, alias = "end", alias = "ends_at")]
    pub end_at: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<BookingItemInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingAttempts {
    pub create: Vec<Attempt>,
    pub items: Vec<Attempt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingResponse {
    pub ok: bool,
    /// Raw creation response of the parent booking
    pub created: Value,
    pub order_id: String,
    pub items_requested: usize,
    pub items_attached: usize,
    pub items_unresolved: usize,
    /// Resolved items no attachment shape accepted
    pub items_failed: usize,
    pub attempts: BookingAttempts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub reused: bool,
    pub created: bool,
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWithPaylinkResponse {
    pub ok: bool,
    pub order_id: String,
    pub customer: CustomerSummary,
    pub items_requested: usize,
    pub items_attached: usize,
    pub items_unresolved: usize,
    pub payment_link: Option<String>,
    pub email: EmailDraft,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLinkRequest {
    #[serde(default, alias = "order_id", deserialize_with = "id_string")]
    pub order_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriedSummary {
    pub create: Vec<Attempt>,
    pub fetch: Vec<Attempt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLinkResponse {
    pub ok: bool,
    pub invoice_created: bool,
    pub payment_link: String,
    pub created: Option<Value>,
    pub tried: TriedSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaylinkEmailRequest {
    #[serde(default, alias = "order_id", deserialize_with = "id_string")]
    pub order_id: String,
    #[serde(default, alias = "customer_name")]
    pub customer_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaylinkEmailResponse {
    pub ok: bool,
    pub payment_link: String,
    pub email: EmailDraft,
    pub created: bool,
    pub tried: TriedSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub ok: bool,
    pub imported: usize,
    pub skipped: usize,
    pub pages: u32,
    pub base: String,
    pub endpoint: String,
    pub auth: String,
    pub page_limit_reached: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductsQuery {
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub sku: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductsResponse {
    pub ok: bool,
    pub base: String,
    pub endpoint: String,
    pub count: usize,
    pub products: Vec<ProductSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkPaidRequest {
    #[serde(default, alias = "order_id", deserialize_with = "id_string")]
    pub order_id: String,
    /// Dollars as a decimal number or string, or integer cents
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkPaidResponse {
    pub ok: bool,
    pub order_id: String,
    pub amount_cents: i64,
    pub currency: String,
    pub receipt: Value,
    pub tried: Vec<Attempt>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkConfirmedRequest {
    #[serde(default, alias = "order_id", deserialize_with = "id_string")]
    pub order_id: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkConfirmedResponse {
    pub ok: bool,
    pub order_id: String,
    pub new_status: String,
    pub result: Value,
    pub tried: Vec<Attempt>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationsResponse {
    pub ok: bool,
    pub reservations: Vec<Reservation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryResponse {
    pub ok: bool,
    pub items: Vec<InventoryItem>,
}
