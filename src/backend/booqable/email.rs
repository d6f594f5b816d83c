//! Payment-link email drafts
//!
//! Builds the subject and body of the message that hands a customer their
//! payment link. Nothing is sent from here; the draft is returned to the
//! caller.

use serde_json::Value;

use crate::shared::booking::{EmailDraft, PaylinkEmailRequest, PaylinkEmailResponse, TriedSummary};
use crate::shared::SharedError;

use super::normalize::{first_present, string_field, value_id};
use super::runner::AttemptLog;
use super::{Booqable, BooqableError, Trace};

/// Attempts kept per pass in the email response
const EMAIL_TRACE_LIMIT: usize = 5;

/// Minor-unit total fields, in order of preference
const TOTAL_CENTS_ALIASES: &[&str] = &[
    "grand_total_with_tax_in_cents",
    "grand_total_in_cents",
    "total_in_cents",
    "amount_in_cents",
];

/// Shown in place of the link when none could be obtained
pub const LINK_UNAVAILABLE: &str = "Payment link unavailable";

/// The fields of an order an email draft needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSummary {
    pub number: Option<String>,
    pub customer_name: Option<String>,
    pub total_cents: Option<i64>,
}

impl OrderSummary {
    /// Read from an order body, wrapped in `order` or `data` or bare
    pub fn from_value(body: &Value) -> Self {
        let order = ["order", "data"]
            .iter()
            .find_map(|key| body.get(*key).filter(|v| v.is_object()))
            .unwrap_or(body);

        let number = ["number", "id"]
            .iter()
            .find_map(|key| order.get(*key).and_then(value_id));
        let customer_name = order
            .get("customer")
            .and_then(|c| string_field(c, &["name"]))
            .or_else(|| string_field(order, &["customer_name"]));
        let total_cents = first_present(order, TOTAL_CENTS_ALIASES).and_then(|v| match v {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
            Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.round() as i64),
            _ => None,
        });

        Self {
            number,
            customer_name,
            total_cents,
        }
    }
}

/// Render minor units as US dollars, e.g. `$1,234.56`
///
/// en-US grouping only: comma thousands separator, dot decimal point.
pub fn format_usd(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, digit) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}${grouped}.{:02}", cents % 100)
}

/// Business name without a leading "The "
fn short_name(business: &str) -> &str {
    business
        .strip_prefix("The ")
        .unwrap_or(business)
}

pub fn build_payment_email(
    link: &str,
    order: &OrderSummary,
    override_name: Option<&str>,
    business: &str,
) -> EmailDraft {
    let name = override_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .or(order.customer_name.as_deref())
        .unwrap_or("there");

    let subject = match &order.number {
        Some(number) => format!("{} - Invoice & Payment Link (#{number})", short_name(business)),
        None => format!("{} - Invoice & Payment Link", short_name(business)),
    };

    let total_line = match order.total_cents {
        Some(cents) if cents != 0 => format!("Invoice total: {}", format_usd(cents)),
        _ => "Here is your secure payment link:".to_string(),
    };

    let body = [
        format!("Hi {name},"),
        String::new(),
        format!("Thanks for booking with {business}!"),
        total_line,
        link.to_string(),
        String::new(),
        "You can pay online in one click. If you have any questions or need changes, just reply to this email."
            .to_string(),
        String::new(),
        format!("-- {business}"),
    ]
    .join("\n");

    EmailDraft { subject, body }
}

impl Booqable {
    /// Obtain a payment link for an order and draft the email around it
    pub async fn paylink_email(
        &self,
        request: &PaylinkEmailRequest,
        business: &str,
    ) -> Result<PaylinkEmailResponse, BooqableError> {
        if request.order_id.is_empty() {
            return Err(SharedError::validation("orderId", "orderId is required").into());
        }
        let runner = self.runner();
        let config = self.discover_base(&runner).await?;
        let outcome = self
            .resolve_payment_link(&runner, &config.base, &request.order_id)
            .await;

        let Some(link) = outcome.link else {
            return Err(BooqableError::Rejected {
                message: "Could not obtain payment link.".to_string(),
                trace: Trace::split(&outcome.create_log, &outcome.fetch_log),
            });
        };

        let mut order_log = AttemptLog::new();
        let summary = self
            .fetch_order(&runner, &config.base, &request.order_id, &mut order_log)
            .await
            .map(|body| OrderSummary::from_value(&body))
            .unwrap_or_default();

        Ok(PaylinkEmailResponse {
            ok: true,
            email: build_payment_email(&link, &summary, request.customer_name.as_deref(), business),
            payment_link: link,
            created: outcome.created.is_some(),
            tried: TriedSummary {
                create: outcome.create_log.head(EMAIL_TRACE_LIMIT),
                fetch: outcome.fetch_log.head(EMAIL_TRACE_LIMIT),
            },
        })
    }
}
