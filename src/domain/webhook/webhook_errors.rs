//! Webhook error types for payment gateway callbacks.
//!
//! Every failure up to and including the order status commit is reported to
//! the gateway synchronously as `err_code = "1"`; the HTTP status is never
//! used to convey the business outcome.

use thiserror::Error;

use crate::domain::foundation::DomainError;

/// Maximum number of characters of an error message echoed back to the gateway.
pub const MAX_RESPONSE_MESSAGE_CHARS: usize = 255;

/// Errors that terminate webhook processing before fan-out.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// HMAC signature missing or not matching the raw body.
    #[error("Invalid signature")]
    SignatureInvalid,

    /// Body is not JSON of the expected shape.
    #[error("Malformed payload: {0}")]
    PayloadMalformed(String),

    /// The gateway reported an interim state (not captured, or transaction not successful).
    #[error("Invalid order status")]
    StatusNotFinal { order_stat: String, txn_stat: String },

    /// No local order carries the payload's `mrc_order_id`.
    #[error("Order not found")]
    OrderNotFound(String),

    /// The order store failed before anything was written.
    #[error("Order store error: {0}")]
    Store(String),

    /// The conditional status write failed mid-flight; the order may or may
    /// not have been committed and needs manual reconciliation.
    #[error("Order status commit uncertain: {0}")]
    CommitUncertain(String),
}

impl WebhookError {
    /// Gateway-facing error code. All pre-commit failures share code `"1"`.
    pub fn err_code(&self) -> &'static str {
        "1"
    }

    /// Message echoed to the gateway, truncated to 255 characters.
    pub fn response_message(&self) -> String {
        truncate_chars(&self.to_string(), MAX_RESPONSE_MESSAGE_CHARS)
    }

    /// True for outcomes that are expected traffic rather than faults.
    pub fn is_expected(&self) -> bool {
        matches!(self, WebhookError::StatusNotFinal { .. })
    }
}

impl From<DomainError> for WebhookError {
    fn from(err: DomainError) -> Self {
        WebhookError::Store(err.to_string())
    }
}

/// Truncates on a character boundary.
pub(crate) fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
