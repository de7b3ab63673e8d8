//! Order module - the aggregate the payment webhook completes.

mod aggregate;
mod status;

pub use aggregate::{ConditionalUpdate, Order};
pub use status::OrderStatus;

#[cfg(test)]
pub(crate) use aggregate::fixtures;
