//! Notification handlers - one notifier per fan-out channel.

mod payment_email;
mod send_messaging;
mod ticket;

pub use payment_email::{EmailRecipient, PaymentEmailNotifier};
pub use send_messaging::MessagingNotifier;
pub use ticket::{ticket_subject, TicketNotifier};

use async_trait::async_trait;

use crate::domain::notification::{Channel, NotificationError, Receipt};
use crate::domain::order::Order;

/// A single downstream side effect of a completed order.
///
/// Implementations make one attempt per call; failures are returned, never
/// retried by the fan-out.
#[async_trait]
pub trait OrderNotifier: Send + Sync {
    fn channel(&self) -> Channel;

    async fn notify(&self, order: &Order) -> Result<Receipt, NotificationError>;
}
