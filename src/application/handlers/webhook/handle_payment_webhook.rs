//! HandlePaymentWebhookHandler - Command handler for payment gateway callbacks.
//!
//! Processing is a forward-only sequence of stages:
//!
//! `Received → Verified → Validated → OrderLocated → StatusCommitted → FanOutDispatched`
//!
//! Any failure before `StatusCommitted` ends processing with `err_code = "1"`.
//! The conditional status write is the idempotency guard: a duplicate
//! delivery observes `NoOp`, is acknowledged as success and never reaches
//! `FanOutDispatched`.

use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::foundation::OrderId;
use crate::domain::notification::FanOutReport;
use crate::domain::order::{ConditionalUpdate, OrderStatus};
use crate::domain::webhook::{decode, SignatureVerifier, WebhookAck, WebhookEnvelope, WebhookError};
use crate::ports::OrderRepository;

use super::NotificationFanOut;

/// Command to handle one webhook delivery.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    pub envelope: WebhookEnvelope,
}

/// Progress of one delivery through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookStage {
    Received,
    Verified,
    Validated,
    OrderLocated,
    StatusCommitted,
    FanOutDispatched,
}

impl fmt::Display for WebhookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WebhookStage::Received => "received",
            WebhookStage::Verified => "verified",
            WebhookStage::Validated => "validated",
            WebhookStage::OrderLocated => "order_located",
            WebhookStage::StatusCommitted => "status_committed",
            WebhookStage::FanOutDispatched => "fan_out_dispatched",
        };
        f.write_str(s)
    }
}

/// Result of a delivery that passed every pre-commit check.
#[derive(Debug)]
pub enum HandlePaymentWebhookResult {
    /// Genuine Pending → Completed transition; notifications are running.
    Completed {
        order_id: OrderId,
        mrc_order_id: String,
        /// Collects the per-channel outcomes; awaiting it is optional.
        fan_out: JoinHandle<FanOutReport>,
    },
    /// The order had already left `Pending`; nothing was dispatched.
    Duplicate {
        order_id: OrderId,
        mrc_order_id: String,
    },
}

impl HandlePaymentWebhookResult {
    pub fn stage(&self) -> WebhookStage {
        match self {
            HandlePaymentWebhookResult::Completed { .. } => WebhookStage::FanOutDispatched,
            HandlePaymentWebhookResult::Duplicate { .. } => WebhookStage::StatusCommitted,
        }
    }

    pub fn ack(&self) -> WebhookAck {
        WebhookAck::success()
    }
}

pub struct HandlePaymentWebhookHandler {
    verifier: SignatureVerifier,
    repository: Arc<dyn OrderRepository>,
    fan_out: NotificationFanOut,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        verifier: SignatureVerifier,
        repository: Arc<dyn OrderRepository>,
        fan_out: NotificationFanOut,
    ) -> Self {
        Self {
            verifier,
            repository,
            fan_out,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        let mut stage = WebhookStage::Received;
        let result = self.process(&cmd.envelope, &mut stage).await;

        if let Err(err) = &result {
            match err {
                WebhookError::CommitUncertain(_) => error!(
                    stage = %stage,
                    error = %err,
                    "Order status commit uncertain, manual reconciliation required"
                ),
                _ if err.is_expected() => info!(
                    stage = %stage,
                    reason = %err,
                    "Webhook acknowledged without action"
                ),
                _ => warn!(stage = %stage, error = %err, "Webhook rejected"),
            }
        }

        result
    }

    /// Handles the command and maps the outcome to the gateway response body.
    pub async fn respond(&self, cmd: HandlePaymentWebhookCommand) -> WebhookAck {
        match self.handle(cmd).await {
            Ok(result) => result.ack(),
            Err(err) => WebhookAck::failure(&err),
        }
    }

    async fn process(
        &self,
        envelope: &WebhookEnvelope,
        stage: &mut WebhookStage,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        // 1. Authenticate the exact bytes received
        let declared = envelope
            .signature
            .as_deref()
            .ok_or(WebhookError::SignatureInvalid)?;
        if !self.verifier.verify(&envelope.raw_body, declared) {
            return Err(WebhookError::SignatureInvalid);
        }
        *stage = WebhookStage::Verified;

        // 2. Decode and apply the captured/successful predicate
        let event = decode(&envelope.raw_body)?;
        *stage = WebhookStage::Validated;
        debug!(mrc_order_id = %event.mrc_order_id, "Webhook payload validated");

        // 3. Locate the order
        let order = self
            .repository
            .find_by_mrc_order_id(&event.mrc_order_id)
            .await?
            .ok_or_else(|| WebhookError::OrderNotFound(event.mrc_order_id.clone()))?;
        *stage = WebhookStage::OrderLocated;

        // 4. Conditional Pending -> Completed write
        let update = self
            .repository
            .update_status_if_pending(&order.id, OrderStatus::Completed)
            .await
            .map_err(|e| WebhookError::CommitUncertain(format!("order {}: {}", order.id, e)))?;
        *stage = WebhookStage::StatusCommitted;

        let committed = match update {
            ConditionalUpdate::Applied(committed) => committed,
            ConditionalUpdate::NoOp => {
                info!(
                    order_id = %order.id,
                    mrc_order_id = %order.mrc_order_id,
                    status = %order.status,
                    "Duplicate delivery, order no longer pending"
                );
                return Ok(HandlePaymentWebhookResult::Duplicate {
                    order_id: order.id,
                    mrc_order_id: order.mrc_order_id,
                });
            }
        };

        info!(
            order_id = %committed.id,
            mrc_order_id = %committed.mrc_order_id,
            "Order completed"
        );

        // 5. Fan out without waiting for the channels
        let order_id = committed.id;
        let mrc_order_id = committed.mrc_order_id.clone();
        let fan_out = self.fan_out.dispatch(committed);
        *stage = WebhookStage::FanOutDispatched;

        Ok(HandlePaymentWebhookResult::Completed {
            order_id,
            mrc_order_id,
            fan_out,
        })
    }
}
