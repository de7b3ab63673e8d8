//! Customer messaging (ZNS) configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::{validate_base_url, validate_timeout, ValidationError};

/// Messaging provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MessagingConfig {
    pub base_url: String,

    /// Sent as the `API-KEY` header
    pub api_key: SecretString,

    /// Official account the message is sent from
    pub oa_id: String,

    /// Payment-confirmation template
    pub template_id: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl MessagingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate messaging configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_base_url(&self.base_url, "MESSAGING_BASE_URL")?;
        if self.api_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("MESSAGING_API_KEY"));
        }
        if self.oa_id.is_empty() {
            return Err(ValidationError::MissingRequired("MESSAGING_OA_ID"));
        }
        if self.template_id.is_empty() {
            return Err(ValidationError::MissingRequired("MESSAGING_TEMPLATE_ID"));
        }
        validate_timeout(self.timeout_secs, "MESSAGING_TIMEOUT_SECS")
    }
}

fn default_timeout() -> u64 {
    10
}
