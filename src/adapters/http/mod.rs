//! HTTP adapters - REST endpoints exposed to the payment gateway.

pub mod webhook;

pub use webhook::{webhook_router, WebhookAppState};
