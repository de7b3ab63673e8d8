//! Customer messaging adapter.
//!
//! Implements the `MessagingProvider` port by sending a templated ZNS message
//! through the CPaaS vendor gateway.

mod zns_client;

pub use zns_client::ZnsClient;
