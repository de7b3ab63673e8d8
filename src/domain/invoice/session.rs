//! Short-lived credentials and artefacts of the invoice signing protocol.

use secrecy::{ExposeSecret, SecretString};

/// Maximum number of logins performed for one invoice: the initial login
/// plus a single refresh after the provider reports an expired token.
pub const MAX_LOGINS_PER_INVOICE: u8 = 2;

/// Bearer credential issued by the invoice provider's login endpoint.
#[derive(Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::new(token.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// First few characters, safe to log.
    pub fn masked(&self) -> String {
        let visible: String = self.expose().chars().take(6).collect();
        format!("{}...", visible)
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccessToken({})", self.masked())
    }
}

/// Digest returned by create-and-hash, to be signed in the second phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashString(pub String);

/// Provider response for a signed invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedInvoice {
    pub error_code: Option<i64>,
    pub description: Option<String>,
    pub raw: serde_json::Value,
}

/// Credential state for one invoice attempt.
///
/// Lives only for the duration of one fan-out; tracks how many logins were
/// performed so the token refresh happens at most once.
#[derive(Debug)]
pub struct InvoiceSigningSession {
    token: AccessToken,
    logins: u8,
}

impl InvoiceSigningSession {
    /// Starts a session from the token of the initial login.
    pub fn start(token: AccessToken) -> Self {
        Self { token, logins: 1 }
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    pub fn logins(&self) -> u8 {
        self.logins
    }

    /// True while a refresh is still allowed.
    pub fn can_refresh(&self) -> bool {
        self.logins < MAX_LOGINS_PER_INVOICE
    }

    /// Replaces the token after a re-login. Returns false (and keeps the old
    /// token) if the refresh budget is already spent.
    pub fn refresh(&mut self, token: AccessToken) -> bool {
        if !self.can_refresh() {
            return false;
        }
        self.token = token;
        self.logins += 1;
        true
    }
}
