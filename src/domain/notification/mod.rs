//! Notification module - fan-out channels, receipts and outcomes.

mod errors;
mod outcome;

pub use errors::NotificationError;
pub use outcome::{Channel, FanOutReport, NotificationOutcome, Receipt};
