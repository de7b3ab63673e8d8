//! Contact-center ticketing adapter.
//!
//! Implements the `TicketingProvider` port. Every call after `/auth/login`
//! carries the access token as a bearer credential.

mod contact_center_client;

pub use contact_center_client::ContactCenterClient;
