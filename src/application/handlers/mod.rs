//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod invoice;
pub mod notification;
pub mod webhook;

pub use invoice::IssueInvoiceHandler;
pub use notification::{
    ticket_subject, EmailRecipient, MessagingNotifier, OrderNotifier, PaymentEmailNotifier,
    TicketNotifier,
};
pub use webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
    NotificationFanOut, WebhookStage,
};
