//! MessagingProvider port - templated customer messages keyed by phone number.

use async_trait::async_trait;

use crate::domain::notification::{NotificationError, Receipt};
use crate::domain::order::Order;

#[async_trait]
pub trait MessagingProvider: Send + Sync {
    /// Sends the payment-confirmation template to the order's phone number.
    async fn send(&self, order: &Order) -> Result<Receipt, NotificationError>;
}
