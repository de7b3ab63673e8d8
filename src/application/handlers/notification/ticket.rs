//! TicketNotifier - opens a support ticket for a completed order.
//!
//! The customer record is found by phone number or created on the fly. The
//! ticketing system has no uniqueness constraint on phone numbers, so two
//! concurrent sequences for the same phone may both create a customer; the
//! duplicate is accepted and the ticket is linked to whichever record the
//! re-read returns.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::invoice::AccessToken;
use crate::domain::notification::{Channel, NotificationError, Receipt};
use crate::domain::order::Order;
use crate::ports::{NewCustomer, NewTicket, TicketingCustomer, TicketingProvider};

use super::OrderNotifier;

pub struct TicketNotifier {
    provider: Arc<dyn TicketingProvider>,
}

impl TicketNotifier {
    pub fn new(provider: Arc<dyn TicketingProvider>) -> Self {
        Self { provider }
    }

    async fn find_or_create_customer(
        &self,
        order: &Order,
        token: &AccessToken,
    ) -> Result<Option<TicketingCustomer>, NotificationError> {
        let phone = order.phone_number.as_str();

        if let Some(existing) = self.provider.find_customer_by_phone(phone, token).await? {
            return Ok(Some(existing));
        }

        let customer = NewCustomer {
            name: order.full_name.clone(),
            email: order.email.clone(),
            phone_number: order.phone_number.clone(),
        };
        self.provider.create_customer(&customer, token).await?;

        let created = self.provider.find_customer_by_phone(phone, token).await?;
        if created.is_none() {
            warn!(
                mrc_order_id = %order.mrc_order_id,
                "Ticketing customer created but not found on re-read"
            );
        }
        Ok(created)
    }
}

#[async_trait]
impl OrderNotifier for TicketNotifier {
    fn channel(&self) -> Channel {
        Channel::Ticketing
    }

    async fn notify(&self, order: &Order) -> Result<Receipt, NotificationError> {
        let token = self.provider.login().await?;

        let contact_id = match self.find_or_create_customer(order, &token).await {
            Ok(customer) => customer.and_then(|c| c.contact_id),
            Err(e) => {
                warn!(
                    mrc_order_id = %order.mrc_order_id,
                    error = %e,
                    "Ticketing customer lookup failed, creating ticket without contact"
                );
                None
            }
        };

        let ticket = NewTicket {
            name: order.full_name.clone(),
            email: order.email.clone(),
            contact_id,
            subject: ticket_subject(order),
        };

        let receipt = self.provider.create_ticket(&ticket, &token).await?;
        info!(
            mrc_order_id = %order.mrc_order_id,
            ticket = receipt.reference.as_deref().unwrap_or("-"),
            "Support ticket created"
        );
        Ok(receipt)
    }
}

/// Ticket subject carrying the package, the customer's issue and the appointment.
pub fn ticket_subject(order: &Order) -> String {
    format!(
        "[Support package: {}]\nIssue: {}\nAppointment: {}",
        order.title, order.note, order.time
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::fixtures::pending_order;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeTicketing {
        customers: Mutex<Vec<(String, TicketingCustomer)>>,
        lookup_fails: bool,
        created_customers: Mutex<Vec<NewCustomer>>,
        tickets: Mutex<Vec<NewTicket>>,
    }

    impl FakeTicketing {
        fn with_customer(phone: &str, contact_id: &str) -> Self {
            let fake = Self::default();
            fake.customers.lock().unwrap().push((
                phone.to_string(),
                TicketingCustomer {
                    id: "1".to_string(),
                    contact_id: Some(contact_id.to_string()),
                },
            ));
            fake
        }
    }

    #[async_trait]
    impl TicketingProvider for FakeTicketing {
        async fn login(&self) -> Result<AccessToken, NotificationError> {
            Ok(AccessToken::new("ticket-token"))
        }

        async fn find_customer_by_phone(
            &self,
            phone: &str,
            _token: &AccessToken,
        ) -> Result<Option<TicketingCustomer>, NotificationError> {
            if self.lookup_fails {
                return Err(NotificationError::unavailable("connection reset"));
            }
            Ok(self
                .customers
                .lock()
                .unwrap()
                .iter()
                .find(|(p, _)| p == phone)
                .map(|(_, c)| c.clone()))
        }

        async fn create_customer(
            &self,
            customer: &NewCustomer,
            _token: &AccessToken,
        ) -> Result<(), NotificationError> {
            self.created_customers.lock().unwrap().push(customer.clone());
            self.customers.lock().unwrap().push((
                customer.phone_number.clone(),
                TicketingCustomer {
                    id: "99".to_string(),
                    contact_id: Some("c-99".to_string()),
                },
            ));
            Ok(())
        }

        async fn create_ticket(
            &self,
            ticket: &NewTicket,
            _token: &AccessToken,
        ) -> Result<Receipt, NotificationError> {
            self.tickets.lock().unwrap().push(ticket.clone());
            Ok(Receipt::with_reference("T-1"))
        }
    }

    #[tokio::test]
    async fn existing_customer_is_linked_without_creating() {
        let fake = Arc::new(FakeTicketing::with_customer("0912345678", "c-7"));
        let notifier = TicketNotifier::new(fake.clone());

        notifier.notify(&pending_order("ORDER_1")).await.unwrap();

        assert!(fake.created_customers.lock().unwrap().is_empty());
        let tickets = fake.tickets.lock().unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].contact_id.as_deref(), Some("c-7"));
    }

    #[tokio::test]
    async fn missing_customer_is_created_then_linked() {
        let fake = Arc::new(FakeTicketing::default());
        let notifier = TicketNotifier::new(fake.clone());

        notifier.notify(&pending_order("ORDER_1")).await.unwrap();

        assert_eq!(fake.created_customers.lock().unwrap().len(), 1);
        assert_eq!(
            fake.tickets.lock().unwrap()[0].contact_id.as_deref(),
            Some("c-99")
        );
    }

    #[tokio::test]
    async fn lookup_failure_still_creates_ticket_without_contact() {
        let fake = Arc::new(FakeTicketing {
            lookup_fails: true,
            ..Default::default()
        });
        let notifier = TicketNotifier::new(fake.clone());

        let receipt = notifier.notify(&pending_order("ORDER_1")).await.unwrap();

        assert_eq!(receipt.reference.as_deref(), Some("T-1"));
        assert_eq!(fake.tickets.lock().unwrap()[0].contact_id, None);
    }

    #[test]
    fn subject_lists_package_issue_and_appointment() {
        let subject = ticket_subject(&pending_order("ORDER_1"));
        assert_eq!(
            subject,
            "[Support package: Remote support - 1 hour]\nIssue: Laptop will not boot\nAppointment: 2024-05-01T09:30:00Z"
        );
    }
}
