use crate::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Coin {
    /// Registry-assigned identifier, 0 until the coin is registered
    pub id: u32,
    /// Upper-case framework code (e.g., "BTC", "ETH")
    pub code: String,
    /// Human-readable name (e.g., "Bitcoin")
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub explorer: String,
}

impl Coin {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into().to_uppercase(),
            ..Default::default()
        }
    }
}

/// Exchange identifiers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExchangeName {
    #[serde(rename = "bitz")]
    Bitz,
    #[serde(rename = "btse")]
    Btse,
}

impl ExchangeName {
    pub const ALL: [ExchangeName; 2] = [ExchangeName::Bitz, ExchangeName::Btse];
}

impl std::fmt::Display for ExchangeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExchangeName::Bitz => write!(f, "bitz"),
            ExchangeName::Btse => write!(f, "btse"),
        }
    }
}

impl FromStr for ExchangeName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bitz" => Ok(ExchangeName::Bitz),
            "btse" => Ok(ExchangeName::Btse),
            other => Err(Error::ParseError(format!(
                "Unknown exchange: {}. Supported exchanges: bitz, btse",
                other
            ))),
        }
    }
}

/// A market between two coins. `base` is the coin prices are quoted in,
/// `target` is the coin being bought or sold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Pair {
    pub id: u32,
    pub base: Coin,
    pub target: Coin,
    /// "{BASE}_{TARGET}", e.g. "BTC_ETH"
    pub name: String,
}

impl Pair {
    pub fn new(id: u32, base: Coin, target: Coin) -> Self {
        let name = Self::format_name(&base.code, &target.code);
        Self {
            id,
            base,
            target,
            name,
        }
    }

    pub fn format_name(base: &str, target: &str) -> String {
        format!("{}_{}", base.to_uppercase(), target.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_name_is_base_then_target() {
        let pair = Pair::new(1, Coin::new("btc"), Coin::new("eth"));
        assert_eq!(pair.name, "BTC_ETH");
        assert_eq!(pair.base.code, "BTC");
    }

    #[test]
    fn exchange_name_parses_case_insensitively() {
        assert_eq!("BTSE".parse::<ExchangeName>().unwrap(), ExchangeName::Btse);
        assert_eq!(" bitz ".parse::<ExchangeName>().unwrap(), ExchangeName::Bitz);
        assert!("kraken".parse::<ExchangeName>().is_err());
        assert_eq!(ExchangeName::Bitz.to_string(), "bitz");
    }
}
