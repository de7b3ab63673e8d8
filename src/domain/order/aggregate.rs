//! Order aggregate as seen by the payment webhook pipeline.
//!
//! Orders are created by the order-placement flow; this service only reads
//! them and performs the single Pending -> Completed transition.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, OrderId};

use super::OrderStatus;

/// A customer order correlated with the payment gateway by `mrc_order_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Order id assigned by the payment gateway, if it issued one.
    pub gateway_order_id: Option<i64>,
    /// Merchant correlation key sent to and echoed back by the gateway.
    pub mrc_order_id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub location: Option<String>,
    pub phone_number: String,
    /// Customer's description of the issue to be handled.
    pub note: String,
    /// Name of the purchased support package.
    pub title: String,
    pub period: String,
    pub price: Decimal,
    /// Requested appointment time as entered at order placement.
    pub time: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    /// Moves the order to `target`, stamping `updated_at`.
    ///
    /// # Errors
    ///
    /// `InvalidStateTransition` unless the order is Pending and the target is Completed.
    pub fn transition_to(
        &mut self,
        target: OrderStatus,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("cannot move order from {} to {}", self.status, target),
            )
            .with_detail("order_id", self.id.to_string()));
        }
        self.status = target;
        self.updated_at = Some(now);
        Ok(())
    }

    /// Item description used on invoices: the note if present, else the package title.
    pub fn item_name(&self) -> &str {
        if self.note.trim().is_empty() {
            &self.title
        } else {
            &self.note
        }
    }
}

/// Outcome of a conditional status write.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionalUpdate {
    /// The order was Pending and now carries the new status.
    Applied(Order),
    /// The order was not Pending (e.g. a duplicate delivery); nothing changed.
    NoOp,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn pending_order(mrc_order_id: &str) -> Order {
        Order {
            id: OrderId::new(),
            gateway_order_id: Some(120_345),
            mrc_order_id: mrc_order_id.to_string(),
            full_name: "Nguyen Van A".to_string(),
            email: Some("customer@example.com".to_string()),
            location: None,
            phone_number: "0912345678".to_string(),
            note: "Laptop will not boot".to_string(),
            title: "Remote support - 1 hour".to_string(),
            period: "1h".to_string(),
            price: Decimal::new(19_999_950, 2),
            time: "2024-05-01T09:30:00Z".to_string(),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::pending_order;
    use super::*;

    #[test]
    fn pending_order_completes_and_stamps_updated_at() {
        let mut order = pending_order("ORDER_1700000000");
        let now = Utc::now();

        order.transition_to(OrderStatus::Completed, now).unwrap();

        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.updated_at, Some(now));
    }

    #[test]
    fn completed_order_cannot_transition_again() {
        let mut order = pending_order("ORDER_1700000000");
        order.transition_to(OrderStatus::Completed, Utc::now()).unwrap();

        let err = order
            .transition_to(OrderStatus::Completed, Utc::now())
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn completed_order_never_reverts_to_pending() {
        let mut order = pending_order("ORDER_1700000000");
        order.transition_to(OrderStatus::Completed, Utc::now()).unwrap();

        assert!(order.transition_to(OrderStatus::Pending, Utc::now()).is_err());
        assert_eq!(order.status, OrderStatus::Completed);
    }

    #[test]
    fn item_name_prefers_note() {
        let order = pending_order("ORDER_1");
        assert_eq!(order.item_name(), "Laptop will not boot");
    }

    #[test]
    fn item_name_falls_back_to_title() {
        let mut order = pending_order("ORDER_1");
        order.note = "  ".to_string();
        assert_eq!(order.item_name(), "Remote support - 1 hour");
    }
}
