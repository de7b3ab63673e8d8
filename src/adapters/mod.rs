//! Adapters - implementations of the ports against real infrastructure.

pub mod email;
pub mod http;
pub mod invoice;
pub mod memory;
pub mod messaging;
pub mod postgres;
pub mod ticketing;

pub(crate) mod provider_http;
