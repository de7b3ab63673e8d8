//! SMTP implementation of the `EmailSender` port.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::debug;

use crate::config::EmailConfig;
use crate::domain::notification::{NotificationError, Receipt};
use crate::ports::{EmailMessage, EmailSender};

#[derive(Debug, Error)]
pub enum SmtpSetupError {
    #[error("SMTP transport: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("sender address: {0}")]
    Sender(#[from] lettre::address::AddressError),
}

/// Sends mail through an authenticated SMTP relay.
///
/// Uses implicit TLS unless `starttls` is configured.
pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailSender {
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpSetupError> {
        let builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
        };

        let transport = builder
            .port(config.port())
            .timeout(Some(config.timeout()))
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.expose_secret().clone(),
            ))
            .build();

        let from = Mailbox::new(
            Some(config.from_name.clone()),
            config.from_email.parse()?,
        );

        Ok(Self { transport, from })
    }

    /// Builds the MIME message for `message`.
    fn build(&self, message: &EmailMessage) -> Result<Message, NotificationError> {
        let to = message
            .to
            .trim()
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::invalid_request(format!("recipient address: {}", e)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(message.html_body.clone())
            .map_err(|e| NotificationError::invalid_request(format!("build email message: {}", e)))
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<Receipt, NotificationError> {
        let mime = self.build(message)?;
        debug!(to = %message.to, subject = %message.subject, "Sending email");

        let response = self.transport.send(mime).await.map_err(smtp_error)?;
        let reference = response.message().next().map(str::to_string);

        Ok(Receipt { reference })
    }
}

/// Permanent SMTP replies (5xx) are rejections; everything else is treated
/// as the relay being unavailable.
fn smtp_error(e: lettre::transport::smtp::Error) -> NotificationError {
    if e.is_permanent() {
        let status = e
            .status()
            .and_then(|code| code.to_string().parse::<u16>().ok())
            .unwrap_or(550);
        NotificationError::rejected(status, e.to_string())
    } else if e.is_timeout() {
        NotificationError::unavailable("smtp timed out")
    } else {
        NotificationError::unavailable(format!("smtp: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn config() -> EmailConfig {
        EmailConfig {
            smtp_host: "smtp.example.org".to_string(),
            smtp_port: None,
            starttls: false,
            smtp_username: "postmaster@example.org".to_string(),
            smtp_password: SecretString::new("pw".to_string()),
            from_email: "support@example.org".to_string(),
            from_name: "Support Booking".to_string(),
            accountant_email: "books@example.org".to_string(),
            timeout_secs: 5,
        }
    }

    fn message(to: &str) -> EmailMessage {
        EmailMessage {
            to: to.to_string(),
            subject: "Payment confirmation".to_string(),
            html_body: "<p>Thanks</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn builds_html_message_with_display_name_sender() {
        let sender = SmtpEmailSender::new(&config()).unwrap();
        let mime = sender.build(&message("customer@example.com")).unwrap();

        let formatted = String::from_utf8(mime.formatted()).unwrap();
        assert!(formatted.contains("<support@example.org>"));
        assert!(formatted.contains("Support Booking"));
        assert!(formatted.contains("To: customer@example.com"));
        assert!(formatted.contains("Content-Type: text/html"));
    }

    #[tokio::test]
    async fn invalid_recipient_is_invalid_request() {
        let sender = SmtpEmailSender::new(&config()).unwrap();

        assert!(matches!(
            sender.build(&message("not an address")),
            Err(NotificationError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn malformed_sender_address_fails_setup() {
        let mut cfg = config();
        cfg.from_email = "support.example.org".to_string();

        assert!(matches!(
            SmtpEmailSender::new(&cfg),
            Err(SmtpSetupError::Sender(_))
        ));
    }

    #[tokio::test]
    async fn starttls_transport_builds() {
        let mut cfg = config();
        cfg.starttls = true;

        assert!(SmtpEmailSender::new(&cfg).is_ok());
        assert_eq!(cfg.port(), 587);
    }

    #[tokio::test]
    async fn unreachable_relay_is_downstream_unavailable() {
        let mut cfg = config();
        cfg.smtp_host = "127.0.0.1".to_string();
        cfg.smtp_port = Some(1);
        cfg.timeout_secs = 2;
        let sender = SmtpEmailSender::new(&cfg).unwrap();

        let result = sender.send(&message("customer@example.com")).await;

        assert!(matches!(
            result,
            Err(NotificationError::DownstreamUnavailable(_))
        ));
    }
}
