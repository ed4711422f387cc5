//! Order envelopes and status mapping for BTSE.

use super::model::{JsonResponse, PlaceOrder};
use common::{
    models::{OrderSide, OrderStatus},
    Error, Result,
};
use serde_json::Value;

pub(super) fn side_label(side: OrderSide) -> &'static str {
    match side {
        OrderSide::Buy => "BUY",
        OrderSide::Sell => "SELL",
    }
}

/// Unwrap a `{ success, message, data }` envelope
pub(super) fn decode_envelope(body: &str, operation: &str) -> Result<Value> {
    let envelope: JsonResponse = serde_json::from_str(body).map_err(|e| {
        Error::ParseError(format!("BTSE {} Json Unmarshal Err: {} {}", operation, e, body))
    })?;
    if !envelope.success {
        return Err(Error::ExchangeError(format!(
            "BTSE {} Failed: {}",
            operation, envelope.message
        )));
    }
    Ok(envelope.data)
}

/// Order payloads arrive either as an object or a one-element array
pub(super) fn parse_place_order(value: Value) -> Result<PlaceOrder> {
    let value = match value {
        Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
        Value::Array(_) => {
            return Err(Error::ParseError("BTSE order response is empty".to_string()));
        }
        other => other,
    };
    Ok(serde_json::from_value(value)?)
}

pub(super) fn map_status(status: &str) -> OrderStatus {
    match status.to_uppercase().as_str() {
        "NEW" => OrderStatus::New,
        "PARTIALLY_FILLED" => OrderStatus::Partial,
        "FILLED" => OrderStatus::Filled,
        "CANCELED" | "CANCELLED" => OrderStatus::Cancelled,
        "REJECTED" => OrderStatus::Rejected,
        "EXPIRED" => OrderStatus::Expired,
        _ => OrderStatus::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_strings_map_case_insensitively() {
        assert_eq!(map_status("NEW"), OrderStatus::New);
        assert_eq!(map_status("partially_filled"), OrderStatus::Partial);
        assert_eq!(map_status("FILLED"), OrderStatus::Filled);
        assert_eq!(map_status("CANCELED"), OrderStatus::Cancelled);
        assert_eq!(map_status("Expired"), OrderStatus::Expired);
        assert_eq!(map_status("REJECTED"), OrderStatus::Rejected);
        assert_eq!(map_status("TRIGGER_INSERTED"), OrderStatus::Other);
    }

    #[test]
    fn place_order_accepts_object_or_array() {
        let object = parse_place_order(json!({"orderID": "abc", "status": "NEW"})).unwrap();
        let array = parse_place_order(json!([{"orderID": 77, "fillSize": "0.5"}])).unwrap();
        assert_eq!(object.order_id, "abc");
        assert_eq!(array.order_id, "77");
        assert_eq!(array.fill_size, 0.5);
        assert!(parse_place_order(json!([])).is_err());
    }

    #[test]
    fn failed_envelope_carries_the_message() {
        let err = decode_envelope(r#"{"success":false,"message":"order not found"}"#, "CancelOrder")
            .unwrap_err();
        assert!(matches!(err, Error::ExchangeError(msg) if msg == "BTSE CancelOrder Failed: order not found"));
    }
}
