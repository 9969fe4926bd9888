// src/application/dto/mod.rs
// Wire-level shapes of the Kite web API

pub mod parser;

use rust_decimal::Decimal;
use serde::Deserialize;
use url::form_urlencoded;

use crate::domain::model::OrderRequest;

/// `{"status": ..., "data": ..., "message": ..., "error_type": ...}`
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub status: String,
    pub data: Option<serde_json::Value>,
    pub message: Option<String>,
    pub error_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrderIdData {
    pub order_id: String,
}

#[derive(Debug, Deserialize)]
pub struct OrderDto {
    pub order_id: String,
    #[serde(default)]
    pub status: Option<String>,
    pub tradingsymbol: String,
    pub exchange: String,
    pub transaction_type: String,
    pub order_type: String,
    pub product: String,
    pub variety: String,
    #[serde(default)]
    pub validity: Option<String>,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub filled_quantity: u32,
    #[serde(default)]
    pub pending_quantity: u32,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub trigger_price: Decimal,
    #[serde(default)]
    pub average_price: Decimal,
    #[serde(default)]
    pub order_timestamp: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HoldingDto {
    pub tradingsymbol: String,
    pub exchange: String,
    #[serde(default)]
    pub isin: String,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub t1_quantity: i64,
    #[serde(default)]
    pub average_price: Decimal,
    #[serde(default)]
    pub last_price: Decimal,
    #[serde(default)]
    pub pnl: Decimal,
}

/// Encodes an order as the form body of `POST /orders/{variety}`.
/// Prices are only sent for the order types that carry them.
pub fn encode_order_form(order: &OrderRequest) -> String {
    let mut form = form_urlencoded::Serializer::new(String::new());
    form.append_pair("variety", order.variety.as_str())
        .append_pair("exchange", order.exchange.as_str())
        .append_pair("tradingsymbol", &order.tradingsymbol)
        .append_pair("transaction_type", order.transaction_type.as_str())
        .append_pair("quantity", &order.quantity.to_string())
        .append_pair("product", order.product.as_str())
        .append_pair("order_type", order.order_type.as_str());

    if let Some(price) = order.order_type.price() {
        form.append_pair("price", &price.normalize().to_string());
    }
    form.append_pair("validity", order.validity.as_str());

    if let Some(trigger) = order.order_type.trigger_price() {
        form.append_pair("trigger_price", &trigger.normalize().to_string());
    }

    form.finish()
}
