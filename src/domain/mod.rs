//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, errors)
//! - `order` - Order aggregate and its status lifecycle
//! - `webhook` - Gateway signature verification, payload decoding, response body
//! - `invoice` - E-invoice amounts, content and signing session
//! - `notification` - Fan-out channels and outcomes

pub mod foundation;
pub mod invoice;
pub mod notification;
pub mod order;
pub mod webhook;
