//! Parsing of Bit-Z market data responses.

use super::model::{decode, TradeRecord};
use crate::json::value_to_f64;
use common::{
    models::{MakerLevel, OrderSide, TradeDetail},
    Error, Result,
};
use serde_json::Value;

/// Smallest increment for a number of decimal places
pub(super) fn precision_step(decimals: f64) -> f64 {
    10f64.powi(-(decimals as i32))
}

/// Depth rows are `[price, amount, total]`
pub(super) fn parse_levels(rows: &[Vec<Value>]) -> Result<Vec<MakerLevel>> {
    rows.iter()
        .map(|row| {
            if row.len() < 2 {
                return Err(Error::ParseError(format!("Bitz depth row too short: {:?}", row)));
            }
            Ok(MakerLevel {
                rate: value_to_f64(&row[0])?,
                quantity: value_to_f64(&row[1])?,
            })
        })
        .collect()
}

/// Bit-Z lists trades newest first with second timestamps; return them
/// oldest first in milliseconds.
pub(super) fn parse_trade_history(body: &str) -> Result<Vec<TradeDetail>> {
    let records: Vec<TradeRecord> = decode(body)?;

    records
        .iter()
        .rev()
        .map(|trade| {
            let rate = trade.p.parse::<f64>().map_err(|e| {
                Error::ParseError(format!("Bitz price parse failed: {} {}", e, trade.p))
            })?;
            let quantity = trade.n.parse::<f64>().map_err(|e| {
                Error::ParseError(format!("Bitz amount parse failed: {} {}", e, trade.n))
            })?;
            let direction = match trade.s.as_str() {
                "buy" => Some(OrderSide::Buy),
                "sell" => Some(OrderSide::Sell),
                _ => None,
            };
            Ok(TradeDetail {
                id: trade.id.clone(),
                quantity,
                rate,
                timestamp: trade.time * 1000,
                direction,
            })
        })
        .collect()
}
