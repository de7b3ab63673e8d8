//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
    IssueInvoiceHandler, MessagingNotifier, NotificationFanOut, OrderNotifier,
    PaymentEmailNotifier, TicketNotifier, WebhookStage,
};
