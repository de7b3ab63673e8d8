//! In-memory order store for tests and local runs.
//!
//! The conditional status write holds the write lock across the check and the
//! update, which makes it a compare-and-swap just like the Postgres adapter's
//! single-statement update.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, OrderId};
use crate::domain::order::{ConditionalUpdate, Order, OrderStatus};
use crate::ports::OrderRepository;

/// Order store backed by a `HashMap`.
///
/// # Example
///
/// ```ignore
/// let store = InMemoryOrderRepository::with_orders(vec![order]);
/// let found = store.find_by_mrc_order_id("ORDER_1").await?;
/// ```
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orders(orders: impl IntoIterator<Item = Order>) -> Self {
        Self {
            orders: RwLock::new(orders.into_iter().map(|o| (o.id, o)).collect()),
        }
    }

    /// Inserts or replaces an order, as the order-placement flow would.
    pub fn insert(&self, order: Order) -> Result<(), DomainError> {
        self.orders
            .write()
            .map_err(|_| poisoned())?
            .insert(order.id, order);
        Ok(())
    }

    // === Test Helpers ===

    /// Returns the stored order with `mrc_order_id`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn get(&self, mrc_order_id: &str) -> Option<Order> {
        self.orders
            .read()
            .expect("InMemoryOrderRepository: orders lock poisoned")
            .values()
            .find(|o| o.mrc_order_id == mrc_order_id)
            .cloned()
    }
}

fn poisoned() -> DomainError {
    DomainError::new(ErrorCode::InternalError, "Order store lock poisoned")
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn find_by_mrc_order_id(&self, mrc_order_id: &str) -> Result<Option<Order>, DomainError> {
        let orders = self.orders.read().map_err(|_| poisoned())?;
        Ok(orders
            .values()
            .find(|o| o.mrc_order_id == mrc_order_id)
            .cloned())
    }

    async fn update_status_if_pending(
        &self,
        id: &OrderId,
        new_status: OrderStatus,
    ) -> Result<ConditionalUpdate, DomainError> {
        let mut orders = self.orders.write().map_err(|_| poisoned())?;

        match orders.get_mut(id) {
            Some(order) if order.is_pending() => {
                order.transition_to(new_status, Utc::now())?;
                Ok(ConditionalUpdate::Applied(order.clone()))
            }
            _ => Ok(ConditionalUpdate::NoOp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::fixtures::pending_order;
    use std::sync::Arc;

    #[tokio::test]
    async fn finds_by_correlation_key() {
        let store = InMemoryOrderRepository::with_orders(vec![pending_order("ORDER_1")]);

        assert!(store.find_by_mrc_order_id("ORDER_1").await.unwrap().is_some());
        assert!(store.find_by_mrc_order_id("ORDER_2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn conditional_update_applies_once() {
        let order = pending_order("ORDER_1");
        let id = order.id;
        let store = InMemoryOrderRepository::with_orders(vec![order]);

        let first = store
            .update_status_if_pending(&id, OrderStatus::Completed)
            .await
            .unwrap();
        let second = store
            .update_status_if_pending(&id, OrderStatus::Completed)
            .await
            .unwrap();

        match first {
            ConditionalUpdate::Applied(o) => {
                assert_eq!(o.status, OrderStatus::Completed);
                assert!(o.updated_at.is_some());
            }
            ConditionalUpdate::NoOp => panic!("first update should apply"),
        }
        assert!(matches!(second, ConditionalUpdate::NoOp));
    }

    #[tokio::test]
    async fn unknown_order_is_noop() {
        let store = InMemoryOrderRepository::new();
        let result = store
            .update_status_if_pending(&OrderId::new(), OrderStatus::Completed)
            .await
            .unwrap();
        assert!(matches!(result, ConditionalUpdate::NoOp));
    }

    #[tokio::test]
    async fn invalid_target_status_is_rejected() {
        let order = pending_order("ORDER_1");
        let id = order.id;
        let store = InMemoryOrderRepository::with_orders(vec![order]);

        let result = store
            .update_status_if_pending(&id, OrderStatus::Cancelled)
            .await;

        assert!(result.is_err());
        assert_eq!(store.get("ORDER_1").unwrap().status, OrderStatus::Pending);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_yield_exactly_one_winner() {
        let order = pending_order("ORDER_1");
        let id = order.id;
        let store = Arc::new(InMemoryOrderRepository::with_orders(vec![order]));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .update_status_if_pending(&id, OrderStatus::Completed)
                    .await
                    .unwrap()
            }));
        }

        let mut applied = 0;
        for handle in handles {
            if let ConditionalUpdate::Applied(_) = handle.await.unwrap() {
                applied += 1;
            }
        }
        assert_eq!(applied, 1);
    }
}
