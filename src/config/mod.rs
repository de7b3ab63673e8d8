//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `ORDERHOOK` prefix and nested values use double underscores as separators.
//!
//! The loaded value is built once at startup and handed to the webhook
//! handler and to each provider adapter; nothing reads the environment later.
//!
//! # Example
//!
//! ```no_run
//! use orderhook::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod email;
mod error;
mod invoice;
mod messaging;
mod server;
mod ticketing;
mod webhook;

pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use invoice::{InvoiceConfig, SellerConfig};
pub use messaging::MessagingConfig;
pub use server::{Environment, ServerConfig};
pub use ticketing::TicketingConfig;
pub use webhook::WebhookConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Order store (PostgreSQL)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Inbound webhook signature settings
    pub webhook: WebhookConfig,

    /// SMTP transport and recipients
    pub email: EmailConfig,

    /// E-invoice provider
    pub invoice: InvoiceConfig,

    /// Customer messaging provider (ZNS)
    pub messaging: MessagingConfig,

    /// Support ticketing provider
    pub ticketing: TicketingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ORDERHOOK` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `ORDERHOOK__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `ORDERHOOK__INVOICE__SELLER__TAX_CODE=...` -> `invoice.seller.tax_code = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ORDERHOOK")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found, section by section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.webhook.validate()?;
        self.email.validate()?;
        self.invoice.validate()?;
        self.messaging.validate()?;
        self.ticketing.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
