//! NowPayments hosted-invoice client and IPN payload types.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

const API_BASE: &str = "https://api.nowpayments.io/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Route the IPN webhook is served under by the api binary.
pub const IPN_ROUTE: &str = "/market-signals-bot/nowpayments-webhook";

/// Paid subscriptions run for this many days from confirmation.
pub const SUBSCRIPTION_DAYS: i64 = 30;

/// Buyer context round-tripped through the invoice's order description so
/// the IPN handler can find the user again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderInfo {
    pub telegram_id: String,
    pub strategy: String,
}

/// The subset of the IPN callback body the webhook acts on.
#[derive(Debug, Deserialize)]
pub struct IpnPayload {
    pub payment_status: String,
    #[serde(default)]
    pub payment_id: Option<serde_json::Value>,
    #[serde(default)]
    pub pay_amount: Option<f64>,
    #[serde(default)]
    pub pay_currency: Option<String>,
    #[serde(default)]
    pub order_description: Option<String>,
}

impl IpnPayload {
    /// NowPayments sends `payment_id` as a number in some payloads and a
    /// string in others; normalize to a string for storage.
    pub fn payment_id_str(&self) -> Option<String> {
        match &self.payment_id {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NowPaymentsClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl NowPaymentsClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(API_BASE, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: String) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Create a hosted invoice and return its payment URL.
    pub async fn create_invoice(
        &self,
        order: &OrderInfo,
        amount_usd: f64,
        ipn_callback_url: &str,
    ) -> Result<String> {
        #[derive(Deserialize)]
        struct InvoiceResponse {
            invoice_url: String,
        }

        let body = json!({
            "price_amount": amount_usd,
            "price_currency": "usd",
            "pay_currency": "usdt",
            "order_id": order.telegram_id,
            "order_description": serde_json::to_string(order)?,
            "ipn_callback_url": ipn_callback_url,
        });

        let response = self
            .client
            .post(format!("{}/invoice", self.base_url))
            .header("x-api-key", &self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let invoice: InvoiceResponse = response.json().await?;
        Ok(invoice.invoice_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_id_accepts_number_or_string() {
        let numeric: IpnPayload =
            serde_json::from_str(r#"{"payment_status":"finished","payment_id":4522480693}"#)
                .unwrap();
        assert_eq!(numeric.payment_id_str().as_deref(), Some("4522480693"));

        let string: IpnPayload =
            serde_json::from_str(r#"{"payment_status":"finished","payment_id":"abc-123"}"#)
                .unwrap();
        assert_eq!(string.payment_id_str().as_deref(), Some("abc-123"));

        let missing: IpnPayload = serde_json::from_str(r#"{"payment_status":"waiting"}"#).unwrap();
        assert_eq!(missing.payment_id_str(), None);
    }

    #[test]
    fn order_info_round_trips_through_description() {
        let order = OrderInfo {
            telegram_id: "5512345".to_string(),
            strategy: "fib_retrace".to_string(),
        };
        let encoded = serde_json::to_string(&order).unwrap();
        let decoded: OrderInfo = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.telegram_id, "5512345");
        assert_eq!(decoded.strategy, "fib_retrace");
    }
}
