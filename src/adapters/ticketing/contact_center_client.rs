//! Contact-center REST client: customer directory and support tickets.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::adapters::provider_http::{build_client, check_status, read_json, send_error};
use crate::config::TicketingConfig;
use crate::domain::invoice::AccessToken;
use crate::domain::notification::{NotificationError, Receipt};
use crate::ports::{NewCustomer, NewTicket, TicketingCustomer, TicketingProvider};

const PROVIDER: &str = "ticketing";

pub struct ContactCenterClient {
    config: TicketingConfig,
    client: Client,
}

impl ContactCenterClient {
    pub fn new(config: TicketingConfig) -> Result<Self, reqwest::Error> {
        let client = build_client(config.timeout())?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }
}

#[async_trait]
impl TicketingProvider for ContactCenterClient {
    async fn login(&self) -> Result<AccessToken, NotificationError> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginRequest {
                username: &self.config.username,
                password: self.config.password.expose_secret(),
            })
            .send()
            .await
            .map_err(|e| send_error(PROVIDER, e))?;

        let response = check_status(PROVIDER, response).await?;
        let body: LoginResponse = read_json(PROVIDER, response).await?;

        match body.access_token {
            Some(token) if !token.is_empty() => Ok(AccessToken::new(token)),
            _ => Err(NotificationError::malformed("ticketing login returned no access_token")),
        }
    }

    async fn find_customer_by_phone(
        &self,
        phone: &str,
        token: &AccessToken,
    ) -> Result<Option<TicketingCustomer>, NotificationError> {
        let response = self
            .client
            .get(self.url("/customers"))
            .query(&[("phone", phone)])
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(|e| send_error(PROVIDER, e))?;

        let response = check_status(PROVIDER, response).await?;
        let body: CustomerList = read_json(PROVIDER, response).await?;

        Ok(body.into_records().into_iter().find_map(|record| {
            id_string(&record.id).map(|id| TicketingCustomer {
                id,
                contact_id: record.contact_id.as_ref().and_then(id_string),
            })
        }))
    }

    async fn create_customer(
        &self,
        customer: &NewCustomer,
        token: &AccessToken,
    ) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(self.url("/customers"))
            .bearer_auth(token.expose())
            .json(&CustomerRequest {
                lastname: &customer.name,
                email: customer.email.as_deref().unwrap_or_default(),
                phonenumber: &customer.phone_number,
                country: self.config.customer_country,
                default_currency: self.config.customer_currency,
                default_language: &self.config.customer_language,
            })
            .send()
            .await
            .map_err(|e| send_error(PROVIDER, e))?;

        check_status(PROVIDER, response).await?;
        Ok(())
    }

    async fn create_ticket(
        &self,
        ticket: &NewTicket,
        token: &AccessToken,
    ) -> Result<Receipt, NotificationError> {
        let response = self
            .client
            .post(self.url("/tickets"))
            .bearer_auth(token.expose())
            .json(&TicketRequest {
                name: &ticket.name,
                email: ticket.email.as_deref().unwrap_or_default(),
                contactid: ticket.contact_id.as_deref(),
                department: self.config.department,
                priority: self.config.priority,
                subject: &ticket.subject,
            })
            .send()
            .await
            .map_err(|e| send_error(PROVIDER, e))?;

        let response = check_status(PROVIDER, response).await?;
        let body: Value = response.json().await.unwrap_or_default();

        Ok(Receipt {
            reference: body
                .get("ticketid")
                .or_else(|| body.get("id"))
                .and_then(id_string),
        })
    }
}

/// Ids come back as either JSON strings or numbers.
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: Option<String>,
}

#[derive(Deserialize)]
struct CustomerRecord {
    #[serde(alias = "userid")]
    id: Value,
    #[serde(default, alias = "contactid")]
    contact_id: Option<Value>,
}

/// Customer search result, either a bare array or wrapped in `data`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CustomerList {
    Bare(Vec<CustomerRecord>),
    Wrapped {
        #[serde(default)]
        data: Vec<CustomerRecord>,
    },
}

impl CustomerList {
    fn into_records(self) -> Vec<CustomerRecord> {
        match self {
            CustomerList::Bare(records) => records,
            CustomerList::Wrapped { data } => data,
        }
    }
}

#[derive(Serialize)]
struct CustomerRequest<'a> {
    lastname: &'a str,
    email: &'a str,
    phonenumber: &'a str,
    country: u32,
    default_currency: u32,
    default_language: &'a str,
}

#[derive(Serialize)]
struct TicketRequest<'a> {
    name: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    contactid: Option<&'a str>,
    department: u32,
    priority: u32,
    subject: &'a str,
}
