//! Email configuration

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

use super::error::{validate_timeout, ValidationError};

/// Email configuration (SMTP relay)
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: String,

    /// Defaults to 465 (implicit TLS), or 587 when `starttls` is set
    pub smtp_port: Option<u16>,

    /// Upgrade a plain connection with STARTTLS instead of implicit TLS
    #[serde(default)]
    pub starttls: bool,

    pub smtp_username: String,

    pub smtp_password: SecretString,

    #[serde(default = "default_from_email")]
    pub from_email: String,

    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Mailbox receiving the accounting copy of each payment
    pub accountant_email: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl EmailConfig {
    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    pub fn port(&self) -> u16 {
        self.smtp_port
            .unwrap_or(if self.starttls { 587 } else { 465 })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.smtp_host.is_empty() {
            return Err(ValidationError::MissingRequired("EMAIL_SMTP_HOST"));
        }
        if self.smtp_username.is_empty() {
            return Err(ValidationError::MissingRequired("EMAIL_SMTP_USERNAME"));
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidEmailAddress("EMAIL_FROM_EMAIL"));
        }
        if !self.accountant_email.contains('@') {
            return Err(ValidationError::InvalidEmailAddress("EMAIL_ACCOUNTANT_EMAIL"));
        }
        validate_timeout(self.timeout_secs, "EMAIL_TIMEOUT_SECS")
    }
}

fn default_from_email() -> String {
    "noreply@orderhook.local".to_string()
}

fn default_from_name() -> String {
    "Support Booking".to_string()
}

fn default_timeout() -> u64 {
    20
}
