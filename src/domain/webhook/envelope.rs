//! Request-scoped webhook input and the gateway-facing response body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::webhook_errors::WebhookError;

/// Acknowledgement text the gateway expects on success.
pub const ACKNOWLEDGED_MESSAGE: &str = "some message";

/// Raw webhook request as received, before any interpretation.
#[derive(Debug, Clone)]
pub struct WebhookEnvelope {
    /// Exact body bytes; signatures are computed over these.
    pub raw_body: Vec<u8>,
    /// Signature declared by the sender, if any.
    pub signature: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl WebhookEnvelope {
    pub fn new(raw_body: impl Into<Vec<u8>>, signature: Option<String>) -> Self {
        Self {
            raw_body: raw_body.into(),
            signature,
            received_at: Utc::now(),
        }
    }
}

/// Response body returned to the gateway: `{"err_code": "0"|"1", "message": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookAck {
    pub err_code: String,
    pub message: String,
}

impl WebhookAck {
    /// Successful acknowledgement.
    pub fn success() -> Self {
        Self {
            err_code: "0".to_string(),
            message: ACKNOWLEDGED_MESSAGE.to_string(),
        }
    }

    /// Failure acknowledgement with a bounded-length message.
    pub fn failure(err: &WebhookError) -> Self {
        Self {
            err_code: err.err_code().to_string(),
            message: err.response_message(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.err_code == "0"
    }
}
