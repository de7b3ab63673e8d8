//! Provider-neutral content of the e-invoice issued for a completed order.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::foundation::ValidationError;
use crate::domain::order::Order;

use super::InvoiceAmounts;

/// Placeholder the e-invoice provider accepts for absent buyer fields.
pub const NOT_AVAILABLE: &str = "N/A";

/// Buyer block of the invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buyer {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

/// Everything needed to create one single-line invoice for an order.
///
/// The transaction UUID is fixed when the draft is built, so a retried
/// creation after a token refresh refers to the same invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    pub transaction_uuid: Uuid,
    /// Issue date, truncated to whole seconds.
    pub issued_at: DateTime<Utc>,
    pub buyer: Buyer,
    pub item_name: String,
    pub amounts: InvoiceAmounts,
}

impl InvoiceDraft {
    /// Builds the invoice content for `order`, issued at `now`.
    ///
    /// # Errors
    ///
    /// Propagates amount validation failures (negative or out-of-range price).
    pub fn for_order(order: &Order, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let amounts = InvoiceAmounts::from_price(order.price)?;

        Ok(Self {
            transaction_uuid: Uuid::new_v4(),
            issued_at: truncate_to_seconds(now),
            buyer: Buyer {
                name: order.full_name.clone(),
                address: non_blank_or_na(order.location.as_deref()),
                phone: order.phone_number.clone(),
                email: non_blank_or_na(order.email.as_deref()),
            },
            item_name: order.item_name().to_string(),
            amounts,
        })
    }

    /// Issue date as epoch milliseconds, the unit the provider expects.
    pub fn issued_at_millis(&self) -> i64 {
        self.issued_at.timestamp() * 1000
    }
}

fn non_blank_or_na(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn truncate_to_seconds(at: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(at.timestamp(), 0).unwrap_or(at)
}
