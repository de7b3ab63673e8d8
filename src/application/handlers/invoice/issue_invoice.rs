//! IssueInvoiceHandler - login, create-and-hash, sign.
//!
//! The provider's access token is short-lived. If create-and-hash reports it
//! expired, the handler logs in once more and retries create-and-hash once
//! with the same draft. A second expiry ends the invoice channel.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use crate::application::handlers::notification::OrderNotifier;
use crate::domain::invoice::{HashString, InvoiceDraft, InvoiceSigningSession, SignedInvoice};
use crate::domain::notification::{Channel, NotificationError, Receipt};
use crate::domain::order::Order;
use crate::ports::InvoiceProvider;

pub struct IssueInvoiceHandler {
    provider: Arc<dyn InvoiceProvider>,
}

impl IssueInvoiceHandler {
    pub fn new(provider: Arc<dyn InvoiceProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(&self, order: &Order) -> Result<SignedInvoice, NotificationError> {
        let draft = InvoiceDraft::for_order(order, Utc::now())
            .map_err(|e| NotificationError::invalid_request(e.to_string()))?;

        let mut session = InvoiceSigningSession::start(self.provider.login().await?);
        let hash = self.create_and_hash(&draft, &mut session, order).await?;

        let signed = self.provider.sign(&hash, session.token()).await?;
        match signed.error_code {
            Some(code) if code != 0 => Err(NotificationError::rejected(
                200,
                signed
                    .description
                    .clone()
                    .unwrap_or_else(|| format!("sign error code {}", code)),
            )),
            _ => Ok(signed),
        }
    }

    async fn create_and_hash(
        &self,
        draft: &InvoiceDraft,
        session: &mut InvoiceSigningSession,
        order: &Order,
    ) -> Result<HashString, NotificationError> {
        match self.provider.create_and_hash(draft, session.token()).await {
            Err(NotificationError::TokenExpired) if session.can_refresh() => {
                warn!(
                    mrc_order_id = %order.mrc_order_id,
                    token = %session.token().masked(),
                    "Invoice token expired, logging in again"
                );
                let fresh = self.provider.login().await?;
                session.refresh(fresh);
                self.provider.create_and_hash(draft, session.token()).await
            }
            other => other,
        }
    }
}

#[async_trait]
impl OrderNotifier for IssueInvoiceHandler {
    fn channel(&self) -> Channel {
        Channel::Invoice
    }

    async fn notify(&self, order: &Order) -> Result<Receipt, NotificationError> {
        let signed = self.handle(order).await?;
        info!(
            mrc_order_id = %order.mrc_order_id,
            description = signed.description.as_deref().unwrap_or("-"),
            "Invoice signed"
        );
        Ok(Receipt {
            reference: signed.description,
        })
    }
}
