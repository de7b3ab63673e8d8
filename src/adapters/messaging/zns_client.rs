//! ZNS template message client.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::debug;

use crate::adapters::provider_http::{build_client, check_status, send_error};
use crate::config::MessagingConfig;
use crate::domain::notification::{NotificationError, Receipt};
use crate::domain::order::Order;
use crate::ports::MessagingProvider;

const PROVIDER: &str = "messaging";
const SEND_PATH: &str = "/vendor/v1/zalo/send-zns";

pub struct ZnsClient {
    config: MessagingConfig,
    client: Client,
}

impl ZnsClient {
    pub fn new(config: MessagingConfig) -> Result<Self, reqwest::Error> {
        let client = build_client(config.timeout())?;
        Ok(Self { config, client })
    }

    fn request<'a>(&'a self, order: &'a Order) -> ZnsRequest<'a> {
        ZnsRequest {
            oa_id: &self.config.oa_id,
            phone: &order.phone_number,
            template_id: &self.config.template_id,
            template_data: TemplateData {
                customer_name: &order.full_name,
                customer_code: &order.phone_number,
                service_package: &order.title,
                issue: &order.note,
                appointment: appointment_time(&order.time),
            },
        }
    }
}

#[async_trait]
impl MessagingProvider for ZnsClient {
    async fn send(&self, order: &Order) -> Result<Receipt, NotificationError> {
        debug!(mrc_order_id = %order.mrc_order_id, "Sending ZNS message");

        let response = self
            .client
            .post(format!("{}{}", self.config.base_url, SEND_PATH))
            .header("API-KEY", self.config.api_key.expose_secret())
            .header(reqwest::header::ACCEPT, "*/*")
            .json(&self.request(order))
            .send()
            .await
            .map_err(|e| send_error(PROVIDER, e))?;

        let response = check_status(PROVIDER, response).await?;

        // The gateway body is informational only; a 2xx is a delivery.
        let body: serde_json::Value = response.json().await.unwrap_or_default();
        Ok(Receipt {
            reference: message_id(&body),
        })
    }
}

/// Form-style values stored without an offset; read as UTC.
const NAIVE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Appointment rendered as `YYYY-MM-DD HH:MM:SS` (UTC), or empty when the
/// order time cannot be parsed.
fn appointment_time(raw: &str) -> String {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.naive_utc())
        .ok()
        .or_else(|| {
            NAIVE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        })
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

fn message_id(body: &serde_json::Value) -> Option<String> {
    let id = body
        .get("msg_id")
        .or_else(|| body.get("data").and_then(|d| d.get("msg_id")))?;
    match id {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Serialize)]
struct ZnsRequest<'a> {
    oa_id: &'a str,
    phone: &'a str,
    template_id: &'a str,
    template_data: TemplateData<'a>,
}

/// Template parameters; the keys are defined by the registered template.
#[derive(Serialize)]
struct TemplateData<'a> {
    #[serde(rename = "Ten_khach_hang")]
    customer_name: &'a str,
    #[serde(rename = "ma_khach_hang")]
    customer_code: &'a str,
    #[serde(rename = "goi_dich_vu")]
    service_package: &'a str,
    #[serde(rename = "van_de_can_tu_van")]
    issue: &'a str,
    #[serde(rename = "thoi_gian_tu_van")]
    appointment: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::fixtures::pending_order;
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> MessagingConfig {
        MessagingConfig {
            base_url: base_url.to_string(),
            api_key: SecretString::new("zns-key".to_string()),
            oa_id: "4321".to_string(),
            template_id: "305263".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn appointment_time_formats_rfc3339() {
        assert_eq!(appointment_time("2024-05-01T09:30:00Z"), "2024-05-01 09:30:00");
        assert_eq!(appointment_time("2024-05-01T16:30:00+07:00"), "2024-05-01 09:30:00");
        assert_eq!(appointment_time("next tuesday"), "");
        assert_eq!(appointment_time(""), "");
    }

    #[test]
    fn appointment_time_accepts_form_values_without_offset() {
        assert_eq!(appointment_time("2024-05-01T09:30"), "2024-05-01 09:30:00");
        assert_eq!(appointment_time("2024-05-01T09:30:15"), "2024-05-01 09:30:15");
        assert_eq!(appointment_time("2024-05-01 09:30:00"), "2024-05-01 09:30:00");
        assert_eq!(appointment_time(" 2024-05-01T09:30 "), "2024-05-01 09:30:00");
        assert_eq!(appointment_time("2024-05-01"), "");
    }

    #[test]
    fn message_id_is_read_from_top_level_or_data() {
        assert_eq!(message_id(&json!({"msg_id": "m-1"})), Some("m-1".to_string()));
        assert_eq!(message_id(&json!({"data": {"msg_id": 42}})), Some("42".to_string()));
        assert_eq!(message_id(&json!({"error": 0})), None);
    }

    #[tokio::test]
    async fn send_posts_template_with_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .and(header("API-KEY", "zns-key"))
            .and(body_partial_json(json!({
                "oa_id": "4321",
                "phone": "0912345678",
                "template_id": "305263",
                "template_data": {
                    "Ten_khach_hang": "Nguyen Van A",
                    "ma_khach_hang": "0912345678",
                    "goi_dich_vu": "Remote support - 1 hour",
                    "van_de_can_tu_van": "Laptop will not boot",
                    "thoi_gian_tu_van": "2024-05-01 09:30:00"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"msg_id": "m-9"}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ZnsClient::new(config(&server.uri())).unwrap();
        let receipt = client.send(&pending_order("ORDER_1")).await.unwrap();

        assert_eq!(receipt.reference.as_deref(), Some("m-9"));
    }

    #[tokio::test]
    async fn gateway_rejection_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "invalid phone"})))
            .mount(&server)
            .await;

        let client = ZnsClient::new(config(&server.uri())).unwrap();
        let result = client.send(&pending_order("ORDER_1")).await;

        assert_eq!(
            result,
            Err(NotificationError::Rejected {
                status: 400,
                message: "invalid phone".to_string()
            })
        );
    }

    #[tokio::test]
    async fn non_json_success_body_is_still_delivered() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .mount(&server)
            .await;

        let client = ZnsClient::new(config(&server.uri())).unwrap();
        let receipt = client.send(&pending_order("ORDER_1")).await.unwrap();

        assert_eq!(receipt.reference, None);
    }
}
