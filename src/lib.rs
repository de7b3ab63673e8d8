//! Orderhook - payment webhook ingestion for support-package orders.
//!
//! Verifies payment gateway callbacks, completes the matching order exactly
//! once, then notifies the customer, accounting, the e-invoice provider, the
//! messaging gateway and the ticketing system concurrently.

pub mod adapters;
pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
