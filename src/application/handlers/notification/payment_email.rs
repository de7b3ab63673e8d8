//! PaymentEmailNotifier - payment-success emails to the customer and to accounting.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::notification::{Channel, NotificationError, Receipt};
use crate::domain::order::Order;
use crate::ports::{EmailMessage, EmailSender};

use super::OrderNotifier;

/// Who receives the payment-success email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailRecipient {
    /// The address stored on the order.
    Customer,
    /// A fixed accounting mailbox from configuration.
    Accountant(String),
}

/// Sends one payment-success email per completed order.
///
/// Two instances run in every fan-out, one per recipient, so a failure to
/// reach the customer does not suppress the accounting copy.
pub struct PaymentEmailNotifier {
    sender: Arc<dyn EmailSender>,
    recipient: EmailRecipient,
}

impl PaymentEmailNotifier {
    pub fn customer(sender: Arc<dyn EmailSender>) -> Self {
        Self {
            sender,
            recipient: EmailRecipient::Customer,
        }
    }

    pub fn accountant(sender: Arc<dyn EmailSender>, address: impl Into<String>) -> Self {
        Self {
            sender,
            recipient: EmailRecipient::Accountant(address.into()),
        }
    }

    pub fn recipient(&self) -> &EmailRecipient {
        &self.recipient
    }

    /// Renders the message for `order`.
    pub fn compose(&self, order: &Order) -> Result<EmailMessage, NotificationError> {
        match &self.recipient {
            EmailRecipient::Customer => {
                let to = order
                    .email
                    .as_deref()
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .ok_or_else(|| NotificationError::invalid_request("order has no email address"))?;

                Ok(EmailMessage {
                    to: to.to_string(),
                    subject: format!("Payment confirmation for order {}", order.mrc_order_id),
                    html_body: customer_body(order),
                })
            }
            EmailRecipient::Accountant(address) => Ok(EmailMessage {
                to: address.clone(),
                subject: format!("Payment received: order {}", order.mrc_order_id),
                html_body: accountant_body(order),
            }),
        }
    }
}

#[async_trait]
impl OrderNotifier for PaymentEmailNotifier {
    fn channel(&self) -> Channel {
        match self.recipient {
            EmailRecipient::Customer => Channel::CustomerEmail,
            EmailRecipient::Accountant(_) => Channel::AccountantEmail,
        }
    }

    async fn notify(&self, order: &Order) -> Result<Receipt, NotificationError> {
        let message = self.compose(order)?;
        self.sender.send(&message).await
    }
}

fn customer_body(order: &Order) -> String {
    format!(
        "<p>Dear {name},</p>\
         <p>We have received your payment for order <strong>{mrc}</strong>.</p>\
         <table>\
         <tr><td>Service package</td><td>{title}</td></tr>\
         <tr><td>Period</td><td>{period}</td></tr>\
         <tr><td>Issue</td><td>{note}</td></tr>\
         <tr><td>Appointment</td><td>{time}</td></tr>\
         <tr><td>Amount</td><td>{price} VND</td></tr>\
         </table>\
         <p>Our support team will contact you at {phone} before the appointment.</p>",
        name = escape_html(&order.full_name),
        mrc = escape_html(&order.mrc_order_id),
        title = escape_html(&order.title),
        period = escape_html(&order.period),
        note = escape_html(&order.note),
        time = escape_html(&order.time),
        price = order.price,
        phone = escape_html(&order.phone_number),
    )
}

fn accountant_body(order: &Order) -> String {
    format!(
        "<p>A payment has been completed.</p>\
         <table>\
         <tr><td>Order</td><td>{mrc}</td></tr>\
         <tr><td>Gateway order id</td><td>{gateway}</td></tr>\
         <tr><td>Customer</td><td>{name}</td></tr>\
         <tr><td>Phone</td><td>{phone}</td></tr>\
         <tr><td>Email</td><td>{email}</td></tr>\
         <tr><td>Service package</td><td>{title}</td></tr>\
         <tr><td>Amount</td><td>{price} VND</td></tr>\
         </table>",
        mrc = escape_html(&order.mrc_order_id),
        gateway = order
            .gateway_order_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string()),
        name = escape_html(&order.full_name),
        phone = escape_html(&order.phone_number),
        email = escape_html(order.email.as_deref().unwrap_or("-")),
        title = escape_html(&order.title),
        price = order.price,
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
