//! Axum router for the webhook service.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{health, receive_payment_webhook, WebhookAppState};

/// Create the service router.
///
/// # Routes
/// - `POST /webhook` - Payment gateway callback (signature verified)
/// - `GET /health` - Liveness check
///
/// The webhook handler enforces `request_timeout` itself so a slow delivery
/// is still answered `200 OK` with a `WebhookAck`.
pub fn webhook_router(state: WebhookAppState) -> Router {
    Router::new()
        .route("/webhook", post(receive_payment_webhook))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
