//! Record normalization
//!
//! Upstream records name the same logical field in several ways. Each field
//! has an ordered alias table; the first alias holding a usable value wins.
//! Supporting a new spelling means adding an entry to a table.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::shared::error::SharedError;
use crate::shared::inventory::InventoryItem;
use crate::shared::reservation::{
    Delivery, PaymentInfo, Reservation, ReservationCustomer, ReservationItem, Totals,
};

pub const START_ALIASES: &[&str] = &["start_at", "starts_at", "starts_on", "start", "start_time"];
pub const END_ALIASES: &[&str] = &["end_at", "ends_at", "ends_on", "end", "end_time"];
pub const STATUS_ALIASES: &[&str] = &["status"];
pub const LINE_ALIASES: &[&str] = &["items", "lines", "order_lines"];
pub const LINE_ID_ALIASES: &[&str] = &["item_id", "product_id", "id"];
pub const LINE_NAME_ALIASES: &[&str] = &["name", "title"];
pub const QUANTITY_ALIASES: &[&str] = &["quantity", "qty"];
pub const SUBTOTAL_ALIASES: &[&str] = &["subtotal_amount", "subtotal"];
pub const TAX_ALIASES: &[&str] = &["tax_amount", "tax"];
pub const DELIVERY_AMOUNT_ALIASES: &[&str] = &["delivery_amount"];
pub const DEPOSIT_ALIASES: &[&str] = &["deposit_amount", "security_deposit_amount"];
pub const TOTAL_ALIASES: &[&str] = &["total_amount", "grand_total_amount"];
pub const PAID_ALIASES: &[&str] = &["amount_paid", "paid_amount"];
pub const SKU_ALIASES: &[&str] = &["sku", "code"];
pub const STOCK_ALIASES: &[&str] = &["stock", "quantity", "stock_count"];

/// Render an identifier that may be a string or a number
pub fn value_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First alias holding a non-null, non-empty value
pub fn first_present<'a>(record: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|key| match record.get(*key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(value) => Some(value),
    })
}

pub fn string_field(record: &Value, aliases: &[&str]) -> Option<String> {
    first_present(record, aliases).and_then(|value| match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Numeric field accepting numbers and numeric strings
///
/// Non-finite values ("NaN", "inf") are skipped like any other unusable value.
pub fn number_field(record: &Value, aliases: &[&str]) -> Option<f64> {
    aliases.iter().find_map(|key| {
        let n = match record.get(*key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        n.filter(|n| n.is_finite())
    })
}

/// Id of a created resource, looked up under each wrapper key, then at the root
pub fn wrapped_id(body: &Value, wrappers: &[&str]) -> Option<String> {
    wrappers
        .iter()
        .find_map(|key| body.get(*key).and_then(|inner| inner.get("id")).and_then(value_id))
        .or_else(|| body.get("id").and_then(value_id))
}

/// Parse the timestamp spellings seen upstream
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
                return Some(naive.and_utc());
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(naive.and_utc());
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        }
        Value::Number(n) => n.as_i64().and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    }
}

fn timestamp_field(record: &Value, aliases: &[&str]) -> Option<DateTime<Utc>> {
    aliases
        .iter()
        .filter_map(|key| record.get(*key))
        .find_map(parse_timestamp)
}

fn normalize_customer(customer: &Value) -> ReservationCustomer {
    let name = string_field(customer, &["name"]).unwrap_or_else(|| {
        [
            string_field(customer, &["first_name"]),
            string_field(customer, &["last_name"]),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
    });
    ReservationCustomer {
        name,
        email: string_field(customer, &["email"]),
        phone: string_field(customer, &["phone"]),
        external_customer_id: customer.get("id").and_then(value_id),
    }
}

fn normalize_line(line: &Value) -> ReservationItem {
    ReservationItem {
        external_item_id: first_present(line, LINE_ID_ALIASES).and_then(value_id),
        quantity: number_field(line, QUANTITY_ALIASES)
            .map(|q| q.round() as i64)
            .unwrap_or(1),
        name: string_field(line, LINE_NAME_ALIASES).unwrap_or_else(|| "Item".to_string()),
    }
}

/// Map an upstream booking/order record onto a canonical reservation
///
/// Fails only when the record carries no usable id.
pub fn normalize_reservation(
    record: &Value,
    synced_at: DateTime<Utc>,
) -> Result<Reservation, SharedError> {
    let external_id = record
        .get("id")
        .and_then(value_id)
        .ok_or_else(|| SharedError::normalization("reservation record has no id"))?;

    let mut reservation = Reservation::new(external_id, synced_at);
    if let Some(status) = string_field(record, STATUS_ALIASES) {
        reservation.status = status;
    }
    if let Some(customer) = record.get("customer").filter(|c| c.is_object()) {
        reservation.customer = normalize_customer(customer);
    }
    reservation.items = first_present(record, LINE_ALIASES)
        .and_then(Value::as_array)
        .map(|lines| lines.iter().map(normalize_line).collect())
        .unwrap_or_default();
    reservation.start_at = timestamp_field(record, START_ALIASES);
    reservation.end_at = timestamp_field(record, END_ALIASES);
    reservation.delivery = record
        .get("delivery")
        .filter(|d| d.is_object())
        .map(|delivery| Delivery {
            address: string_field(delivery, &["address"]).unwrap_or_default(),
            notes: string_field(delivery, &["notes"]).unwrap_or_default(),
        });
    reservation.totals = Totals {
        subtotal: number_field(record, SUBTOTAL_ALIASES).unwrap_or(0.0),
        tax: number_field(record, TAX_ALIASES).unwrap_or(0.0),
        delivery: number_field(record, DELIVERY_AMOUNT_ALIASES).unwrap_or(0.0),
        security_deposit: number_field(record, DEPOSIT_ALIASES).unwrap_or(0.0),
        grand_total: number_field(record, TOTAL_ALIASES).unwrap_or(0.0),
    };
    let defaults = PaymentInfo::default();
    reservation.payment = PaymentInfo {
        required: record
            .get("payment_required")
            .and_then(Value::as_bool)
            .unwrap_or(defaults.required),
        collected: number_field(record, PAID_ALIASES).unwrap_or(defaults.collected),
        currency: string_field(record, &["currency"]).unwrap_or(defaults.currency),
    };
    reservation.notes = string_field(record, &["notes"]).unwrap_or_default();
    Ok(reservation)
}

/// Map an upstream inventory item onto the canonical record
pub fn normalize_inventory_item(
    record: &Value,
    synced_at: DateTime<Utc>,
) -> Result<InventoryItem, SharedError> {
    let external_id = record
        .get("id")
        .and_then(value_id)
        .ok_or_else(|| SharedError::normalization("inventory record has no id"))?;

    let images = record
        .get("images")
        .and_then(Value::as_array)
        .map(|images| {
            images
                .iter()
                .filter_map(|image| match image {
                    Value::String(url) => Some(url.clone()),
                    other => other.get("url").and_then(Value::as_str).map(str::to_string),
                })
                .collect()
        })
        .unwrap_or_default();

    let category = match record.get("category") {
        Some(Value::Object(_)) => record.get("category").and_then(|c| string_field(c, &["name"])),
        _ => string_field(record, &["category"]),
    };

    Ok(InventoryItem {
        id: uuid::Uuid::new_v4(),
        external_id,
        name: string_field(record, LINE_NAME_ALIASES).unwrap_or_default(),
        sku: string_field(record, SKU_ALIASES),
        category,
        stock_count: number_field(record, STOCK_ALIASES)
            .map(|n| n.round() as i64)
            .unwrap_or(0),
        images,
        active: record.get("active") != Some(&Value::Bool(false)),
        last_synced_at: synced_at,
    })
}
