use crate::models::{Pair, TradeDetail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PublicOperationKind {
    TradeHistory,
    CoinPrice,
}

impl std::fmt::Display for PublicOperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublicOperationKind::TradeHistory => write!(f, "TradeHistory"),
            PublicOperationKind::CoinPrice => write!(f, "CoinPrice"),
        }
    }
}

/// A public data request handed to a connector; results are written back
/// into the operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicOperation {
    pub kind: PublicOperationKind,
    pub pair: Pair,
    /// Optional proxy URL used for this call only
    pub proxy: Option<String>,
    /// Record the request URI and raw response body
    pub debug_mode: bool,
    pub request_uri: String,
    pub call_response: String,
    pub trade_history: Vec<TradeDetail>,
}

impl PublicOperation {
    pub fn new(kind: PublicOperationKind, pair: Pair) -> Self {
        Self {
            kind,
            pair,
            proxy: None,
            debug_mode: false,
            request_uri: String::new(),
            call_response: String::new(),
            trade_history: Vec::new(),
        }
    }

    pub fn trade_history(pair: Pair) -> Self {
        Self::new(PublicOperationKind::TradeHistory, pair)
    }
}
