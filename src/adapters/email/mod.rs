//! Email adapter - SMTP delivery of payment-success emails.

mod smtp_sender;

pub use smtp_sender::{SmtpEmailSender, SmtpSetupError};
