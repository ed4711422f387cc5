use crate::json::{f64_from_any, string_from_any};
use common::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Envelope wrapped around every Bit-Z response
#[derive(Debug, Deserialize)]
pub struct BitzResponse {
    pub status: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub data: Value,
}

/// Decode an envelope and its payload, failing on any status but 200
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    let response: BitzResponse = serde_json::from_str(body)
        .map_err(|e| Error::ParseError(format!("Bitz response is not an envelope: {} {}", e, body)))?;
    if response.status != 200 {
        return Err(Error::ExchangeError(format!(
            "Bitz status {}: {}",
            response.status, response.msg
        )));
    }
    serde_json::from_value(response.data)
        .map_err(|e| Error::ParseError(format!("Bitz payload unmarshal failed: {} {}", e, body)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub name: String,
    pub coin_from: String,
    pub coin_to: String,
    #[serde(default, deserialize_with = "f64_from_any")]
    pub number_float: f64,
    #[serde(default, deserialize_with = "f64_from_any")]
    pub price_float: f64,
    #[serde(default, deserialize_with = "string_from_any")]
    pub status: String,
}

pub type SymbolList = HashMap<String, SymbolInfo>;

#[derive(Debug, Deserialize)]
pub struct Depth {
    #[serde(default)]
    pub asks: Vec<Vec<Value>>,
    #[serde(default)]
    pub bids: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
pub struct TradeRecord {
    #[serde(deserialize_with = "string_from_any")]
    pub id: String,
    /// Unix seconds
    #[serde(rename = "T")]
    pub time: i64,
    pub p: String,
    pub n: String,
    #[serde(default)]
    pub s: String,
}

#[derive(Debug, Deserialize)]
pub struct UserAssets {
    #[serde(default)]
    pub info: Vec<AssetInfo>,
}

#[derive(Debug, Deserialize)]
pub struct AssetInfo {
    pub name: String,
    #[serde(default, deserialize_with = "f64_from_any")]
    pub num: f64,
    /// Available amount
    #[serde(default, deserialize_with = "f64_from_any")]
    pub over: f64,
    #[serde(default, deserialize_with = "f64_from_any")]
    pub lock: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrustSheet {
    #[serde(deserialize_with = "string_from_any")]
    pub id: String,
    #[serde(default, deserialize_with = "f64_from_any")]
    pub price: f64,
    #[serde(default, deserialize_with = "f64_from_any")]
    pub number: f64,
    #[serde(default, deserialize_with = "f64_from_any")]
    pub number_over: f64,
    #[serde(default)]
    pub number_deal: Option<Value>,
    #[serde(default)]
    pub average_price: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct CoinOut {
    #[serde(default, deserialize_with = "string_from_any")]
    pub id: String,
}
