//! OrderRepository port - lookup and conditional status write for orders.
//!
//! Orders are created by the order-placement flow; this service only reads
//! them and moves them from `Pending` to `Completed` exactly once.
//!
//! ## Idempotency
//!
//! `update_status_if_pending` is the single serialization point for
//! concurrent deliveries of the same webhook. Implementations MUST make it an
//! atomic compare-and-swap over `status`: of N concurrent callers for the same
//! order, exactly one observes `ConditionalUpdate::Applied`.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrderId};
use crate::domain::order::{ConditionalUpdate, Order, OrderStatus};

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Finds an order by its merchant correlation key.
    ///
    /// Returns `None` if no order carries this `mrc_order_id`.
    async fn find_by_mrc_order_id(&self, mrc_order_id: &str) -> Result<Option<Order>, DomainError>;

    /// Sets `status` to `new_status` only if the order is still `Pending`.
    ///
    /// Returns the updated order on success, `NoOp` if the order was already
    /// moved on (duplicate delivery) or does not exist.
    async fn update_status_if_pending(
        &self,
        id: &OrderId,
        new_status: OrderStatus,
    ) -> Result<ConditionalUpdate, DomainError>;
}
