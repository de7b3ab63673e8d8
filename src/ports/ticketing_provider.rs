//! TicketingProvider port - support-ticket system with a customer directory.
//!
//! Customers are keyed by phone number, but the provider enforces no
//! uniqueness: two concurrent find-or-create sequences for the same phone
//! can both create a customer.

use async_trait::async_trait;

use crate::domain::invoice::AccessToken;
use crate::domain::notification::{NotificationError, Receipt};

/// Customer record as known to the ticketing system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketingCustomer {
    pub id: String,
    /// Contact person id used to link tickets, when the provider has one.
    pub contact_id: Option<String>,
}

/// Data for a new customer record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub email: Option<String>,
    pub phone_number: String,
}

/// Data for a new support ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub name: String,
    pub email: Option<String>,
    pub contact_id: Option<String>,
    pub subject: String,
}

#[async_trait]
pub trait TicketingProvider: Send + Sync {
    async fn login(&self) -> Result<AccessToken, NotificationError>;

    /// Returns the first customer registered with `phone`, if any.
    async fn find_customer_by_phone(
        &self,
        phone: &str,
        token: &AccessToken,
    ) -> Result<Option<TicketingCustomer>, NotificationError>;

    /// Creates a customer. The provider does not return the new record, so
    /// callers re-read it with `find_customer_by_phone`.
    async fn create_customer(
        &self,
        customer: &NewCustomer,
        token: &AccessToken,
    ) -> Result<(), NotificationError>;

    async fn create_ticket(
        &self,
        ticket: &NewTicket,
        token: &AccessToken,
    ) -> Result<Receipt, NotificationError>;
}
