//! Canonical Reservation Record
//!
//! The locally normalized representation of an upstream booking/order,
//! independent of the upstream's field naming. Exactly one record exists per
//! `(external_system, external_id)` pair; synchronization overwrites fields of
//! an existing record and never duplicates it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// External system tag of records imported from Booqable
pub const BOOQABLE_SYSTEM: &str = "booqable";

/// Customer sub-record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationCustomer {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub external_customer_id: Option<String>,
}

/// One line of a reservation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationItem {
    /// Upstream item/product id
    pub external_item_id: Option<String>,
    pub quantity: i64,
    pub name: String,
}

/// Delivery sub-record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub address: String,
    pub notes: String,
}

/// Money totals, in the upstream's major currency units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub delivery: f64,
    pub security_deposit: f64,
    pub grand_total: f64,
}

/// Payment sub-record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub required: bool,
    pub collected: f64,
    pub currency: String,
}

impl Default for PaymentInfo {
    fn default() -> Self {
        Self {
            required: true,
            collected: 0.0,
            currency: "USD".to_string(),
        }
    }
}

/// Canonical reservation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// Local id, assigned on first insert and kept on every later sync
    pub id: Uuid,
    pub external_system: String,
    pub external_id: String,
    pub status: String,
    pub customer: ReservationCustomer,
    pub items: Vec<ReservationItem>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub delivery: Option<Delivery>,
    pub totals: Totals,
    pub payment: PaymentInfo,
    pub notes: String,
    pub last_synced_at: DateTime<Utc>,
}

impl Reservation {
    /// Create an empty record for an upstream id
    pub fn new(external_id: impl Into<String>, synced_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            external_system: BOOQABLE_SYSTEM.to_string(),
            external_id: external_id.into(),
            status: "pending".to_string(),
            customer: ReservationCustomer::default(),
            items: Vec::new(),
            start_at: None,
            end_at: None,
            delivery: None,
            totals: Totals::default(),
            payment: PaymentInfo::default(),
            notes: String::new(),
            last_synced_at: synced_at,
        }
    }

    /// Check whether the record matches a free-text query
    ///
    /// Matches case-insensitively on customer name and email, external id and
    /// status. An empty query matches everything.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let haystacks = [
            Some(self.customer.name.as_str()),
            self.customer.email.as_deref(),
            Some(self.external_id.as_str()),
            Some(self.status.as_str()),
        ];
        haystacks
            .into_iter()
            .flatten()
            .any(|h| h.to_lowercase().contains(&needle))
    }
}
