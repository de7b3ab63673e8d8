//! Support ticketing (contact center) configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::{validate_base_url, validate_timeout, ValidationError};

/// Ticketing provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TicketingConfig {
    pub base_url: String,

    pub username: String,

    pub password: SecretString,

    /// Department new tickets are assigned to
    #[serde(default = "default_department")]
    pub department: u32,

    #[serde(default = "default_priority")]
    pub priority: u32,

    /// Defaults applied to customers created on the fly
    #[serde(default = "default_country")]
    pub customer_country: u32,

    #[serde(default = "default_currency")]
    pub customer_currency: u32,

    #[serde(default = "default_language")]
    pub customer_language: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl TicketingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate ticketing configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_base_url(&self.base_url, "TICKETING_BASE_URL")?;
        if self.username.is_empty() {
            return Err(ValidationError::MissingRequired("TICKETING_USERNAME"));
        }
        if self.password.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("TICKETING_PASSWORD"));
        }
        validate_timeout(self.timeout_secs, "TICKETING_TIMEOUT_SECS")
    }
}

fn default_department() -> u32 {
    1
}

fn default_priority() -> u32 {
    2
}

fn default_country() -> u32 {
    243
}

fn default_currency() -> u32 {
    3
}

fn default_language() -> String {
    "vietnamese".to_string()
}

fn default_timeout() -> u64 {
    15
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_username() {
        let config = TicketingConfig {
            base_url: "https://crm.example.vn/api".to_string(),
            username: String::new(),
            password: SecretString::new("pw".to_string()),
            department: default_department(),
            priority: default_priority(),
            customer_country: default_country(),
            customer_currency: default_currency(),
            customer_language: default_language(),
            timeout_secs: default_timeout(),
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("TICKETING_USERNAME"))
        );
    }
}
