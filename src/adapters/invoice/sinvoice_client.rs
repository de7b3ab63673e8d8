//! E-invoice provider client.
//!
//! Implements `InvoiceProvider` over the provider's REST API. The access token
//! from `/auth/login` is sent as an `access_token` cookie. An expired token on
//! create-and-hash shows up either as HTTP 401 or as an error message that
//! mentions the token; both map to `NotificationError::TokenExpired`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adapters::provider_http::{
    build_client, check_status, read_json, send_error, status_error, ErrorBody,
};
use crate::config::InvoiceConfig;
use crate::domain::invoice::{
    AccessToken, HashString, InvoiceDraft, SignedInvoice, TAX_PERCENTAGE,
};
use crate::domain::notification::NotificationError;
use crate::ports::InvoiceProvider;

const PROVIDER: &str = "invoice";
const INVOICE_WS_PATH: &str = "/services/einvoiceapplication/api/InvoiceAPI/InvoiceWS";
const INVOICE_TYPE: &str = "1";
const CURRENCY: &str = "VND";
const ADJUSTMENT_TYPE: &str = "1";
const UNIT_NAME: &str = "Cái";
const PAYMENT_METHOD: &str = "Chuyển khoản";

pub struct SInvoiceClient {
    config: InvoiceConfig,
    client: Client,
}

impl SInvoiceClient {
    pub fn new(config: InvoiceConfig) -> Result<Self, reqwest::Error> {
        let client = build_client(config.timeout())?;
        Ok(Self { config, client })
    }

    fn login_url(&self) -> String {
        format!("{}/auth/login", self.config.base_url)
    }

    fn create_url(&self) -> String {
        format!(
            "{}{}/createInvoiceUsbTokenGetHash/{}",
            self.config.base_url, INVOICE_WS_PATH, self.config.username
        )
    }

    fn sign_url(&self) -> String {
        format!(
            "{}{}/createInvoiceUsbTokenInsertSignature",
            self.config.base_url, INVOICE_WS_PATH
        )
    }

    fn cookie(token: &AccessToken) -> String {
        format!("access_token={}", token.expose())
    }

    /// Full provider request body for `draft`.
    fn invoice_request(&self, draft: &InvoiceDraft) -> InvoiceRequest {
        let seller = &self.config.seller;
        let amounts = &draft.amounts;

        InvoiceRequest {
            general_invoice_info: GeneralInvoiceInfo {
                transaction_uuid: draft.transaction_uuid.to_string(),
                invoice_type: INVOICE_TYPE.to_string(),
                template_code: self.config.template_code.clone(),
                invoice_series: self.config.invoice_series.clone(),
                invoice_issued_date: draft.issued_at_millis(),
                currency_code: CURRENCY.to_string(),
                exchange_rate: 1,
                adjustment_type: ADJUSTMENT_TYPE.to_string(),
                payment_status: true,
                cus_get_invoice_right: true,
                certificate_serial: self.config.certificate_serial.clone(),
            },
            seller_info: SellerInfo {
                seller_legal_name: seller.legal_name.clone(),
                seller_tax_code: seller.tax_code.clone(),
                seller_address_line: seller.address.clone(),
                seller_phone_number: seller.phone.clone(),
                seller_email: seller.email.clone(),
                seller_website: seller.website.clone(),
                seller_bank_account: seller.bank_account.clone(),
                seller_bank_name: seller.bank_name.clone(),
            },
            buyer_info: BuyerInfo {
                buyer_name: draft.buyer.name.clone(),
                buyer_address_line: draft.buyer.address.clone(),
                buyer_phone_number: draft.buyer.phone.clone(),
                buyer_email: draft.buyer.email.clone(),
            },
            payments: vec![Payment {
                payment_method_name: PAYMENT_METHOD.to_string(),
            }],
            item_info: vec![ItemInfo {
                item_name: draft.item_name.clone(),
                unit_name: UNIT_NAME.to_string(),
                unit_price: amounts.price,
                quantity: 1,
                item_total_amount_without_tax: amounts.price,
                tax_percentage: TAX_PERCENTAGE,
                tax_amount: amounts.tax,
                item_total_amount_with_tax: amounts.total,
            }],
            tax_breakdowns: vec![TaxBreakdown {
                tax_percentage: TAX_PERCENTAGE,
                taxable_amount: amounts.price,
                tax_amount: amounts.tax,
            }],
            summarize_info: SummarizeInfo {
                total_amount_without_tax: amounts.price,
                total_tax_amount: amounts.tax,
                total_amount_with_tax: amounts.total,
            },
        }
    }
}

/// True when an error response from create-and-hash means the token expired:
/// a 401, or a `message` mentioning "token" in any letter case.
fn is_token_expiry(status: StatusCode, body: &str) -> bool {
    if status == StatusCode::UNAUTHORIZED {
        return true;
    }
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .map(|m| m.to_lowercase().contains("token"))
        .unwrap_or(false)
}

#[async_trait]
impl InvoiceProvider for SInvoiceClient {
    async fn login(&self) -> Result<AccessToken, NotificationError> {
        let response = self
            .client
            .post(self.login_url())
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
            _ => Err(NotificationError::malformed("invoice login returned no access_token")),
        }
    }

    async fn create_and_hash(
        &self,
        draft: &InvoiceDraft,
        token: &AccessToken,
    ) -> Result<HashString, NotificationError> {
        debug!(
            transaction_uuid = %draft.transaction_uuid,
            token = %token.masked(),
            "Creating invoice"
        );

        let response = self
            .client
            .post(self.create_url())
            .header(reqwest::header::COOKIE, Self::cookie(token))
            .json(&self.invoice_request(draft))
            .send()
            .await
            .map_err(|e| send_error(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if is_token_expiry(status, &body) {
                return Err(NotificationError::TokenExpired);
            }
            return Err(status_error(PROVIDER, status, &body));
        }

        let body: CreateResponse = read_json(PROVIDER, response).await?;
        body.result
            .and_then(|r| r.hash_string)
            .filter(|h| !h.is_empty())
            .map(HashString)
            .ok_or_else(|| NotificationError::malformed("invoice response missing hashString"))
    }

    async fn sign(
        &self,
        hash: &HashString,
        token: &AccessToken,
    ) -> Result<SignedInvoice, NotificationError> {
        let response = self
            .client
            .post(self.sign_url())
            .header(reqwest::header::COOKIE, Self::cookie(token))
            .json(&SignRequest {
                supplier_tax_code: &self.config.username,
                template_code: &self.config.template_code,
                hash_string: &hash.0,
                signature: self.config.sign_signature.expose_secret(),
            })
            .send()
            .await
            .map_err(|e| send_error(PROVIDER, e))?;

        let response = check_status(PROVIDER, response).await?;
        let raw: serde_json::Value = read_json(PROVIDER, response).await?;

        Ok(SignedInvoice {
            error_code: raw.get("errorCode").and_then(|v| v.as_i64()),
            description: raw
                .get("description")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            raw,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Wire Types
// ════════════════════════════════════════════════════════════════════════════════

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
struct CreateResponse {
    result: Option<CreateResult>,
}

#[derive(Deserialize)]
struct CreateResult {
    #[serde(rename = "hashString")]
    hash_string: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignRequest<'a> {
    supplier_tax_code: &'a str,
    template_code: &'a str,
    hash_string: &'a str,
    signature: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InvoiceRequest {
    general_invoice_info: GeneralInvoiceInfo,
    seller_info: SellerInfo,
    buyer_info: BuyerInfo,
    payments: Vec<Payment>,
    item_info: Vec<ItemInfo>,
    tax_breakdowns: Vec<TaxBreakdown>,
    summarize_info: SummarizeInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeneralInvoiceInfo {
    transaction_uuid: String,
    invoice_type: String,
    template_code: String,
    invoice_series: String,
    invoice_issued_date: i64,
    currency_code: String,
    exchange_rate: u32,
    adjustment_type: String,
    payment_status: bool,
    cus_get_invoice_right: bool,
    certificate_serial: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SellerInfo {
    seller_legal_name: String,
    seller_tax_code: String,
    seller_address_line: String,
    seller_phone_number: String,
    seller_email: String,
    seller_website: String,
    seller_bank_account: String,
    seller_bank_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BuyerInfo {
    buyer_name: String,
    buyer_address_line: String,
    buyer_phone_number: String,
    buyer_email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Payment {
    payment_method_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemInfo {
    item_name: String,
    unit_name: String,
    unit_price: i64,
    quantity: u32,
    item_total_amount_without_tax: i64,
    tax_percentage: u32,
    tax_amount: i64,
    item_total_amount_with_tax: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaxBreakdown {
    tax_percentage: u32,
    taxable_amount: i64,
    tax_amount: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummarizeInfo {
    total_amount_without_tax: i64,
    total_tax_amount: i64,
    total_amount_with_tax: i64,
}
