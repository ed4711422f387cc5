//! Helpers for exchange payloads that mix quoted and bare numbers.

use common::{Error, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn value_to_f64(value: &Value) -> Result<f64> {
    match value {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| Error::ParseError(format!("number is not f64: {}", number))),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|e| Error::ParseError(format!("invalid number '{}': {}", text, e))),
        other => Err(Error::ParseError(format!("unexpected value for number: {}", other))),
    }
}

pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// `deserialize_with` target for fields sent either as `"1.5"` or `1.5`
pub fn f64_from_any<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(0.0);
    }
    value_to_f64(&value).map_err(serde::de::Error::custom)
}

/// `deserialize_with` target for ids sent either as strings or numbers
pub fn string_from_any<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Level {
        #[serde(deserialize_with = "f64_from_any")]
        price: f64,
        #[serde(deserialize_with = "string_from_any")]
        id: String,
    }

    #[test]
    fn accepts_quoted_and_bare_numbers() {
        let quoted: Level = serde_json::from_value(json!({"price": "1.25", "id": 42})).unwrap();
        let bare: Level = serde_json::from_value(json!({"price": 1.25, "id": "42"})).unwrap();
        assert_eq!(quoted.price, 1.25);
        assert_eq!(bare.price, 1.25);
        assert_eq!(quoted.id, "42");
        assert_eq!(bare.id, "42");
    }

    #[test]
    fn rejects_garbage() {
        assert!(value_to_f64(&json!("abc")).is_err());
        assert!(value_to_f64(&json!([1])).is_err());
    }
}
