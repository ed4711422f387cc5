use crate::json::{f64_from_any, string_from_any};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSummary {
    pub symbol: String,
    pub base: String,
    pub quote: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, deserialize_with = "f64_from_any")]
    pub min_price_increment: f64,
    #[serde(default, deserialize_with = "f64_from_any")]
    pub min_size_increment: f64,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct Quote {
    #[serde(deserialize_with = "f64_from_any")]
    pub price: f64,
    #[serde(deserialize_with = "f64_from_any")]
    pub size: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBook {
    #[serde(default)]
    pub buy_quote: Vec<Quote>,
    #[serde(default)]
    pub sell_quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    #[serde(default, deserialize_with = "string_from_any")]
    pub serial_id: String,
    #[serde(deserialize_with = "f64_from_any")]
    pub price: f64,
    #[serde(deserialize_with = "f64_from_any")]
    pub size: f64,
    #[serde(default)]
    pub side: String,
    /// Unix milliseconds
    pub timestamp: i64,
}

#[derive(Debug, Deserialize)]
pub struct WalletBalance {
    pub currency: String,
    #[serde(default, deserialize_with = "f64_from_any")]
    pub total: f64,
    #[serde(default, deserialize_with = "f64_from_any")]
    pub available: f64,
}

/// Envelope used by order query, cancel and withdraw responses
#[derive(Debug, Deserialize)]
pub struct JsonResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrder {
    #[serde(rename = "orderID", deserialize_with = "string_from_any")]
    pub order_id: String,
    #[serde(default, deserialize_with = "f64_from_any")]
    pub average_fill_price: f64,
    #[serde(default, deserialize_with = "f64_from_any")]
    pub fill_size: f64,
    #[serde(default, deserialize_with = "string_from_any")]
    pub status: String,
}
