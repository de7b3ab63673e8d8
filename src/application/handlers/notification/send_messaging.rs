//! MessagingNotifier - payment confirmation over the customer messaging channel.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::notification::{Channel, NotificationError, Receipt};
use crate::domain::order::Order;
use crate::ports::MessagingProvider;

use super::OrderNotifier;

pub struct MessagingNotifier {
    provider: Arc<dyn MessagingProvider>,
}

impl MessagingNotifier {
    pub fn new(provider: Arc<dyn MessagingProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl OrderNotifier for MessagingNotifier {
    fn channel(&self) -> Channel {
        Channel::Messaging
    }

    async fn notify(&self, order: &Order) -> Result<Receipt, NotificationError> {
        if order.phone_number.trim().is_empty() {
            return Err(NotificationError::invalid_request("order has no phone number"));
        }
        self.provider.send(order).await
    }
}
