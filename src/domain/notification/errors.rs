//! Errors raised by notification channels.
//!
//! These never reach the webhook caller: the fan-out logs them with the
//! channel identity and discards them.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    /// Network failure, timeout or 5xx from the downstream system.
    #[error("Downstream unavailable: {0}")]
    DownstreamUnavailable(String),

    /// The downstream system answered but refused the request.
    #[error("Downstream rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The downstream system answered with a body we cannot use.
    #[error("Malformed downstream response: {0}")]
    MalformedResponse(String),

    /// The provider's access token is no longer valid.
    #[error("Token expired")]
    TokenExpired,

    /// The order lacks data the channel needs (e.g. no email address).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl NotificationError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        NotificationError::DownstreamUnavailable(message.into())
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        NotificationError::Rejected {
            status,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        NotificationError::MalformedResponse(message.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        NotificationError::InvalidRequest(message.into())
    }

    /// True only for the token-expiry condition the invoice flow retries once.
    pub fn is_token_expired(&self) -> bool {
        matches!(self, NotificationError::TokenExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_displays_status_and_message() {
        let err = NotificationError::rejected(422, "phone invalid");
        assert_eq!(err.to_string(), "Downstream rejected request (422): phone invalid");
    }

    #[test]
    fn only_token_expired_is_token_expired() {
        assert!(NotificationError::TokenExpired.is_token_expired());
        assert!(!NotificationError::unavailable("connection refused").is_token_expired());
        assert!(!NotificationError::rejected(401, "bad credentials").is_token_expired());
    }
}
