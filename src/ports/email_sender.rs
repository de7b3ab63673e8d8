//! EmailSender port - transactional email transport.

use async_trait::async_trait;

use crate::domain::notification::{NotificationError, Receipt};

/// A fully rendered email, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Sends one message. A single attempt; no retries.
    async fn send(&self, message: &EmailMessage) -> Result<Receipt, NotificationError>;
}
