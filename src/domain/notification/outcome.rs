//! Channels of the post-payment fan-out and their per-channel outcomes.

use serde::Serialize;
use std::fmt;

use super::NotificationError;

/// Independent downstream systems notified after an order completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    CustomerEmail,
    AccountantEmail,
    Invoice,
    Messaging,
    Ticketing,
}

impl Channel {
    /// Every channel, in dispatch order.
    pub const ALL: [Channel; 5] = [
        Channel::CustomerEmail,
        Channel::AccountantEmail,
        Channel::Invoice,
        Channel::Messaging,
        Channel::Ticketing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::CustomerEmail => "customer_email",
            Channel::AccountantEmail => "accountant_email",
            Channel::Invoice => "invoice",
            Channel::Messaging => "messaging",
            Channel::Ticketing => "ticketing",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Acknowledgement from a downstream system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Receipt {
    /// Provider-side identifier (message id, ticket id, ...), when one is returned.
    pub reference: Option<String>,
}

impl Receipt {
    pub fn with_reference(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
        }
    }
}

/// Result of one channel, kept only for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationOutcome {
    pub channel: Channel,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NotificationOutcome {
    pub fn from_result(channel: Channel, result: &Result<Receipt, NotificationError>) -> Self {
        match result {
            Ok(receipt) => Self {
                channel,
                success: true,
                reference: receipt.reference.clone(),
                error: None,
            },
            Err(e) => Self::failed(channel, e.to_string()),
        }
    }

    pub fn failed(channel: Channel, error: impl Into<String>) -> Self {
        Self {
            channel,
            success: false,
            reference: None,
            error: Some(error.into()),
        }
    }
}

/// Collected outcomes of one fan-out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FanOutReport {
    pub outcomes: Vec<NotificationOutcome>,
}

impl FanOutReport {
    pub fn push(&mut self, outcome: NotificationOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcome(&self, channel: Channel) -> Option<&NotificationOutcome> {
        self.outcomes.iter().find(|o| o.channel == channel)
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}
