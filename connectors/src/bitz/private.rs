//! Order and account field mapping for Bit-Z.

use crate::json::value_to_f64;
use common::{
    models::{OrderSide, OrderStatus},
    Result,
};
use serde_json::Value;

pub(super) fn side_code(side: OrderSide) -> &'static str {
    match side {
        OrderSide::Buy => "1",
        OrderSide::Sell => "2",
    }
}

/// Entrust sheet status codes
pub(super) fn map_status(code: &str) -> OrderStatus {
    match code {
        "0" => OrderStatus::New,
        "1" => OrderStatus::Partial,
        "2" => OrderStatus::Filled,
        "3" => OrderStatus::Cancelled,
        _ => OrderStatus::Other,
    }
}

pub(super) fn optional_f64(value: Option<&Value>) -> Result<Option<f64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value_to_f64(value).map(Some),
    }
}
