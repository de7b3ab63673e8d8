//! E-invoice provider adapter.
//!
//! Implements the `InvoiceProvider` port: login, create-and-hash, sign.
//!
//! # Configuration
//!
//! Read from the `ORDERHOOK__INVOICE__*` environment variables; the password
//! and the signing signature are held as `secrecy::SecretString`.

mod sinvoice_client;

pub use sinvoice_client::SInvoiceClient;
