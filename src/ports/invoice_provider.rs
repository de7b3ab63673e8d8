//! InvoiceProvider port - two-phase e-invoice signing.
//!
//! Protocol: `login` issues a short-lived access token, `create_and_hash`
//! registers the invoice and returns the digest to sign, `sign` submits the
//! signature. `create_and_hash` reports an expired credential as
//! `NotificationError::TokenExpired`, which the caller may retry once after a
//! fresh login.

use async_trait::async_trait;

use crate::domain::invoice::{AccessToken, HashString, InvoiceDraft, SignedInvoice};
use crate::domain::notification::NotificationError;

#[async_trait]
pub trait InvoiceProvider: Send + Sync {
    /// Authenticates against the provider and returns a fresh access token.
    async fn login(&self) -> Result<AccessToken, NotificationError>;

    /// Creates the invoice and returns the hash to be signed.
    async fn create_and_hash(
        &self,
        draft: &InvoiceDraft,
        token: &AccessToken,
    ) -> Result<HashString, NotificationError>;

    /// Inserts the signature for a previously created invoice.
    async fn sign(
        &self,
        hash: &HashString,
        token: &AccessToken,
    ) -> Result<SignedInvoice, NotificationError>;
}
