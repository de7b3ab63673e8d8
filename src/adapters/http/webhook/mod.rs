//! HTTP adapter for the payment gateway callback.
//!
//! - `POST /webhook` - Receive a payment notification
//! - `GET /health` - Liveness check

mod handlers;
mod routes;

pub use handlers::{health, receive_payment_webhook, HealthResponse, WebhookAppState};
pub use routes::webhook_router;
