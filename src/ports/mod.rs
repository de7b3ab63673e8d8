//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Order Store
//!
//! - `OrderRepository` - Lookup by correlation key and atomic conditional status write
//!
//! ## Notification Channels
//!
//! - `InvoiceProvider` - login / create-and-hash / sign e-invoice protocol
//! - `EmailSender` - Transactional email transport
//! - `MessagingProvider` - Templated customer messages by phone number
//! - `TicketingProvider` - Customer directory and support tickets

mod email_sender;
mod invoice_provider;
mod messaging_provider;
mod order_repository;
mod ticketing_provider;

pub use email_sender::{EmailMessage, EmailSender};
pub use invoice_provider::InvoiceProvider;
pub use messaging_provider::MessagingProvider;
pub use order_repository::OrderRepository;
pub use ticketing_provider::{NewCustomer, NewTicket, TicketingCustomer, TicketingProvider};
