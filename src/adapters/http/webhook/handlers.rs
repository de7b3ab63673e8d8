//! HTTP handlers for the webhook endpoint.
//!
//! The gateway reads the JSON body, not the status line, so every delivery is
//! answered `200 OK` with a `WebhookAck`.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, HeaderName};
use serde::Serialize;
use tracing::{error, warn};

use crate::application::handlers::webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler,
};
use crate::domain::webhook::{WebhookAck, WebhookEnvelope};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the webhook routes.
#[derive(Clone)]
pub struct WebhookAppState {
    pub handler: Arc<HandlePaymentWebhookHandler>,
    /// Header carrying the body signature.
    pub signature_header: HeaderName,
    /// How long the caller waits for an acknowledgement.
    pub request_timeout: Duration,
}

impl WebhookAppState {
    pub fn new(
        handler: HandlePaymentWebhookHandler,
        signature_header: HeaderName,
        request_timeout: Duration,
    ) -> Self {
        Self {
            handler: Arc::new(handler),
            signature_header,
            request_timeout,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /webhook - Handle a payment gateway callback
///
/// Processing runs on its own task. When it outlasts `request_timeout` the
/// caller gets `err_code "1"` while the task carries on, so a commit already
/// under way still completes and a redelivery sees it as a duplicate.
pub async fn receive_payment_webhook(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<WebhookAck> {
    let signature = headers
        .get(&state.signature_header)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let cmd = HandlePaymentWebhookCommand {
        envelope: WebhookEnvelope::new(body.to_vec(), signature),
    };

    let handler = Arc::clone(&state.handler);
    let task = tokio::spawn(async move { handler.respond(cmd).await });
    let ack = match tokio::time::timeout(state.request_timeout, task).await {
        Ok(Ok(ack)) => ack,
        Ok(Err(e)) => {
            error!(error = %e, "Webhook processing task failed");
            WebhookAck {
                err_code: "1".to_string(),
                message: "Internal error".to_string(),
            }
        }
        Err(_) => {
            warn!(
                timeout_ms = state.request_timeout.as_millis() as u64,
                "Webhook processing exceeded request timeout"
            );
            WebhookAck {
                err_code: "1".to_string(),
                message: "Request timed out".to_string(),
            }
        }
    };

    Json(ack)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health - Liveness check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
