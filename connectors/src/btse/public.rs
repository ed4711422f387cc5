//! Parsing of BTSE market data responses.

use super::model::{Quote, Trade};
use common::{
    models::{MakerLevel, OrderSide, TradeDetail},
    Error, Result,
};

pub(super) fn positive_or(value: f64, default: f64) -> f64 {
    if value > 0.0 {
        value
    } else {
        default
    }
}

pub(super) fn to_levels(quotes: &[Quote]) -> Vec<MakerLevel> {
    quotes
        .iter()
        .map(|quote| MakerLevel {
            rate: quote.price,
            quantity: quote.size,
        })
        .collect()
}

/// BTSE lists trades newest first with millisecond timestamps; return them
/// oldest first.
pub(super) fn parse_trade_history(body: &str) -> Result<Vec<TradeDetail>> {
    let mut trades: Vec<Trade> = serde_json::from_str(body)
        .map_err(|e| Error::ParseError(format!("BTSE trades unmarshal failed: {} {}", e, body)))?;
    trades.sort_by_key(|trade| trade.timestamp);

    Ok(trades
        .into_iter()
        .map(|trade| {
            let direction = if trade.side.eq_ignore_ascii_case("buy") {
                Some(OrderSide::Buy)
            } else if trade.side.eq_ignore_ascii_case("sell") {
                Some(OrderSide::Sell)
            } else {
                None
            };
            TradeDetail {
                id: trade.serial_id,
                quantity: trade.size,
                rate: trade.price,
                timestamp: trade.timestamp,
                direction,
            }
        })
        .collect())
}
