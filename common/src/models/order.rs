use crate::models::Pair;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "Buy"),
            OrderSide::Sell => write!(f, "Sell"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    New,
    Partial,
    Filled,
    /// Cancel request accepted, final state not yet confirmed
    Canceling,
    Cancelled,
    Rejected,
    Expired,
    Other,
}

/// An order placed through a connector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub pair: Pair,
    pub order_id: String,
    pub rate: f64,
    pub quantity: f64,
    pub side: OrderSide,
    pub status: OrderStatus,
    /// Average fill price reported by the exchange
    pub deal_rate: f64,
    /// Filled quantity reported by the exchange
    pub deal_quantity: f64,
    /// Raw body of the placement response
    pub json_response: String,
    /// Raw body of the cancel response
    pub cancel_status: String,
}

impl Order {
    pub fn new(pair: Pair, order_id: impl Into<String>, side: OrderSide, quantity: f64, rate: f64) -> Self {
        Self {
            pair,
            order_id: order_id.into(),
            rate,
            quantity,
            side,
            status: OrderStatus::New,
            deal_rate: 0.0,
            deal_quantity: 0.0,
            json_response: String::new(),
            cancel_status: String::new(),
        }
    }
}
