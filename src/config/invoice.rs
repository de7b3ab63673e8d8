//! E-invoice provider configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::{validate_base_url, validate_timeout, ValidationError};

/// E-invoice provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceConfig {
    /// Provider base URL, without trailing slash
    pub base_url: String,

    /// Login username; also the supplier tax code in provider paths
    pub username: String,

    pub password: SecretString,

    pub template_code: String,

    #[serde(default = "default_invoice_series")]
    pub invoice_series: String,

    /// Signature submitted with the hash in the signing phase
    pub sign_signature: SecretString,

    pub certificate_serial: String,

    #[serde(default)]
    pub seller: SellerConfig,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Seller block printed on every invoice
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SellerConfig {
    #[serde(default)]
    pub legal_name: String,
    #[serde(default)]
    pub tax_code: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub bank_account: String,
    #[serde(default)]
    pub bank_name: String,
}

impl InvoiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate invoice configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_base_url(&self.base_url, "INVOICE_BASE_URL")?;
        if self.username.is_empty() {
            return Err(ValidationError::MissingRequired("INVOICE_USERNAME"));
        }
        if self.password.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("INVOICE_PASSWORD"));
        }
        if self.template_code.is_empty() {
            return Err(ValidationError::MissingRequired("INVOICE_TEMPLATE_CODE"));
        }
        if self.seller.tax_code.is_empty() {
            return Err(ValidationError::MissingRequired("INVOICE_SELLER__TAX_CODE"));
        }
        validate_timeout(self.timeout_secs, "INVOICE_TIMEOUT_SECS")
    }
}

fn default_invoice_series() -> String {
    "C25TAA".to_string()
}

fn default_timeout() -> u64 {
    30
}
