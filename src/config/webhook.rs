//! Webhook configuration

use axum::http::HeaderName;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Inbound payment webhook settings
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Secret shared with the payment gateway for HMAC signatures
    pub secret_key: SecretString,

    /// Header carrying the hex HMAC-SHA256 of the raw body
    #[serde(default = "default_signature_header")]
    pub signature_header: String,
}

impl WebhookConfig {
    /// Signature header as an HTTP header name.
    pub fn header_name(&self) -> Result<HeaderName, ValidationError> {
        HeaderName::from_bytes(self.signature_header.as_bytes())
            .map_err(|_| ValidationError::InvalidHeaderName("WEBHOOK_SIGNATURE_HEADER"))
    }

    /// Validate webhook configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.secret_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("WEBHOOK_SECRET_KEY"));
        }
        self.header_name().map(|_| ())
    }
}

fn default_signature_header() -> String {
    "X-Webhook-Signature".to_string()
}
