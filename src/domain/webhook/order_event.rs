//! Decoding of payment gateway order callbacks.
//!
//! The gateway posts `{"order": {"mrc_order_id": .., "stat": ..}, "txn": {"stat": ..}, ..}`
//! for every state change of a payment. Only a captured order (`order.stat == "c"`)
//! with a successful transaction (`txn.stat == 1`) completes the local order;
//! anything else is an interim notification.

use serde::Deserialize;
use serde_json::Value;

use super::webhook_errors::WebhookError;

/// Order state reported by the gateway once payment is captured.
pub const ORDER_STAT_CAPTURED: &str = "c";

/// Transaction state reported by the gateway for a successful transaction.
pub const TXN_STAT_SUCCESS: i64 = 1;

/// A final, successful payment notification for one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEvent {
    pub mrc_order_id: String,
    pub order_stat: String,
    pub txn_stat: i64,
}

#[derive(Debug, Deserialize)]
struct RawPayload {
    order: RawOrder,
    txn: RawTxn,
}

#[derive(Debug, Deserialize)]
struct RawOrder {
    mrc_order_id: String,
    #[serde(default)]
    stat: Value,
}

#[derive(Debug, Deserialize)]
struct RawTxn {
    #[serde(default)]
    stat: Value,
}

/// Parses the raw body and applies the captured-and-successful predicate.
///
/// # Errors
///
/// - `PayloadMalformed` if the body is not JSON of the expected shape
/// - `StatusNotFinal` if the payload describes an interim state
pub fn decode(raw_body: &[u8]) -> Result<OrderEvent, WebhookError> {
    let payload: RawPayload = serde_json::from_slice(raw_body)
        .map_err(|e| WebhookError::PayloadMalformed(e.to_string()))?;

    let mrc_order_id = payload.order.mrc_order_id.trim().to_string();
    if mrc_order_id.is_empty() {
        return Err(WebhookError::PayloadMalformed(
            "order.mrc_order_id is empty".to_string(),
        ));
    }

    let captured = payload.order.stat.as_str() == Some(ORDER_STAT_CAPTURED);
    let succeeded = payload.txn.stat.as_i64() == Some(TXN_STAT_SUCCESS);

    if !(captured && succeeded) {
        return Err(WebhookError::StatusNotFinal {
            order_stat: describe(&payload.order.stat),
            txn_stat: describe(&payload.txn.stat),
        });
    }

    Ok(OrderEvent {
        mrc_order_id,
        order_stat: ORDER_STAT_CAPTURED.to_string(),
        txn_stat: TXN_STAT_SUCCESS,
    })
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "<missing>".to_string(),
        other => other.to_string(),
    }
}
