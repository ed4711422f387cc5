use crate::models::{Coin, Pair};
use serde::{Deserialize, Serialize};

/// Where an exchange's coin and pair constraints come from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum DataSource {
    /// Discovered from the exchange listing endpoints
    #[default]
    #[serde(rename = "api")]
    ExchangeApi,
    /// Preloaded from a constraint snapshot file
    #[serde(rename = "json")]
    JsonFile,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ChainType {
    #[default]
    Mainnet,
    Bep2,
    Erc20,
    Trc20,
    Other,
}

/// Per-exchange metadata for a coin
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoinConstraint {
    pub coin_id: u32,
    pub coin: Coin,
    /// Symbol the exchange uses for this coin
    pub ex_symbol: String,
    pub chain_type: ChainType,
    pub tx_fee: f64,
    pub withdraw: bool,
    pub deposit: bool,
    pub confirmation: u32,
    pub listed: bool,
}

/// Per-exchange metadata for a trading pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PairConstraint {
    pub pair_id: u32,
    pub pair: Pair,
    /// Symbol the exchange uses for this market
    pub ex_symbol: String,
    pub maker_fee: f64,
    pub taker_fee: f64,
    /// Smallest quantity increment
    pub lot_size: f64,
    /// Smallest price increment
    pub price_filter: f64,
    pub listed: bool,
}
