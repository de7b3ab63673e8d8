//! Webhook handlers - payment gateway callback processing and notification fan-out.

mod fan_out;
mod handle_payment_webhook;

pub use fan_out::NotificationFanOut;
pub use handle_payment_webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
    WebhookStage,
};
