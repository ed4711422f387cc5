use crate::models::{DataSource, OrderSide};
use serde::{Deserialize, Serialize};

/// One price level of an order book
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MakerLevel {
    pub rate: f64,
    pub quantity: f64,
}

/// Order book snapshot taken around a single HTTP call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Maker {
    pub worker_ip: Option<String>,
    pub source: DataSource,
    /// Unix milliseconds right before the request was sent
    pub before_timestamp: i64,
    /// Unix milliseconds right after the response was decoded
    pub after_timestamp: i64,
    pub bids: Vec<MakerLevel>,
    pub asks: Vec<MakerLevel>,
}

/// A public trade
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeDetail {
    pub id: String,
    pub quantity: f64,
    pub rate: f64,
    /// Unix milliseconds
    pub timestamp: i64,
    /// None when the exchange reports a side string we don't recognise
    pub direction: Option<OrderSide>,
}
