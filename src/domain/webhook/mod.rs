//! Webhook module - authentication and decoding of payment gateway callbacks.

mod envelope;
mod order_event;
mod webhook_errors;
mod webhook_verifier;

pub use envelope::{WebhookAck, WebhookEnvelope, ACKNOWLEDGED_MESSAGE};
pub use order_event::{decode, OrderEvent, ORDER_STAT_CAPTURED, TXN_STAT_SUCCESS};
pub use webhook_errors::{WebhookError, MAX_RESPONSE_MESSAGE_CHARS};
pub use webhook_verifier::{sign_payload, verify, SignatureVerifier};
