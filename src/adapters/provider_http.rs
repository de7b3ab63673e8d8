//! Shared reqwest plumbing for the notification provider clients.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use crate::domain::notification::NotificationError;

/// Builds a client with the provider's request timeout.
pub(crate) fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

/// Maps transport failures (connect, timeout, TLS) to `DownstreamUnavailable`.
pub(crate) fn send_error(provider: &str, e: reqwest::Error) -> NotificationError {
    if e.is_timeout() {
        NotificationError::unavailable(format!("{} timed out", provider))
    } else if e.is_connect() {
        NotificationError::unavailable(format!("{} connection failed: {}", provider, e))
    } else {
        NotificationError::unavailable(format!("{}: {}", provider, e))
    }
}

/// Error body shape shared by the providers: `{"message": "..."}`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Passes 2xx responses through; reads the body of anything else into an error.
///
/// 5xx is `DownstreamUnavailable`, every other status is `Rejected`.
pub(crate) async fn check_status(
    provider: &str,
    response: Response,
) -> Result<Response, NotificationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(status_error(provider, status, &body))
}

pub(crate) fn status_error(provider: &str, status: StatusCode, body: &str) -> NotificationError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| body.chars().take(200).collect());

    if status.is_server_error() {
        NotificationError::unavailable(format!("{} returned {}: {}", provider, status, message))
    } else {
        NotificationError::rejected(status.as_u16(), message)
    }
}

/// Decodes a 2xx JSON body.
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    provider: &str,
    response: Response,
) -> Result<T, NotificationError> {
    response
        .json::<T>()
        .await
        .map_err(|e| NotificationError::malformed(format!("{} response: {}", provider, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_unavailable() {
        let err = status_error("invoice", StatusCode::BAD_GATEWAY, "upstream down");
        assert!(matches!(err, NotificationError::DownstreamUnavailable(_)));
    }

    #[test]
    fn client_errors_are_rejected_with_provider_message() {
        let err = status_error(
            "zns",
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"message":"phone invalid"}"#,
        );
        assert_eq!(err, NotificationError::rejected(422, "phone invalid"));
    }

    #[test]
    fn non_json_bodies_are_truncated() {
        let body = "x".repeat(500);
        match status_error("crm", StatusCode::BAD_REQUEST, &body) {
            NotificationError::Rejected { message, .. } => assert_eq!(message.len(), 200),
            other => panic!("unexpected {:?}", other),
        }
    }
}
