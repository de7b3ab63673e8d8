//! Composition root: builds the adapters, notifiers and router from configuration.

use std::sync::Arc;

use axum::Router;
use thiserror::Error;

use crate::adapters::email::{SmtpEmailSender, SmtpSetupError};
use crate::adapters::http::{webhook_router, WebhookAppState};
use crate::adapters::invoice::SInvoiceClient;
use crate::adapters::messaging::ZnsClient;
use crate::adapters::ticketing::ContactCenterClient;
use crate::application::handlers::invoice::IssueInvoiceHandler;
use crate::application::handlers::notification::{
    MessagingNotifier, OrderNotifier, PaymentEmailNotifier, TicketNotifier,
};
use crate::application::handlers::webhook::{HandlePaymentWebhookHandler, NotificationFanOut};
use crate::config::{AppConfig, ValidationError};
use crate::domain::webhook::SignatureVerifier;
use crate::ports::{EmailSender, OrderRepository};

/// Failures while assembling the service at startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("email transport: {0}")]
    Email(#[from] SmtpSetupError),

    #[error("HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds one notifier per channel, in channel order.
pub fn build_notifiers(config: &AppConfig) -> Result<Vec<Arc<dyn OrderNotifier>>, StartupError> {
    let email: Arc<dyn EmailSender> = Arc::new(SmtpEmailSender::new(&config.email)?);
    let invoice = Arc::new(SInvoiceClient::new(config.invoice.clone())?);
    let messaging = Arc::new(ZnsClient::new(config.messaging.clone())?);
    let ticketing = Arc::new(ContactCenterClient::new(config.ticketing.clone())?);

    let notifiers: Vec<Arc<dyn OrderNotifier>> = vec![
        Arc::new(PaymentEmailNotifier::customer(email.clone())),
        Arc::new(PaymentEmailNotifier::accountant(
            email,
            config.email.accountant_email.clone(),
        )),
        Arc::new(IssueInvoiceHandler::new(invoice)),
        Arc::new(MessagingNotifier::new(messaging)),
        Arc::new(TicketNotifier::new(ticketing)),
    ];
    Ok(notifiers)
}

/// Builds the HTTP application around `repository` and `fan_out`.
///
/// Keep a clone of `fan_out` to drain it once the server stops.
pub fn build_router(
    config: &AppConfig,
    repository: Arc<dyn OrderRepository>,
    fan_out: NotificationFanOut,
) -> Result<Router, StartupError> {
    let handler = HandlePaymentWebhookHandler::new(
        SignatureVerifier::new(config.webhook.secret_key.clone()),
        repository,
        fan_out,
    );
    let state = WebhookAppState::new(
        handler,
        config.webhook.header_name()?,
        config.server.request_timeout(),
    );

    Ok(webhook_router(state))
}
