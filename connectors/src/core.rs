use crate::config::ExchangeConfig;
use common::{
    models::{Coin, CoinConstraint, DataSource, ExchangeName, Pair, PairConstraint},
    BalanceMap, Error, Registry, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::info;

/// Coin and pair constraints of one exchange, as stored on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConstraintSnapshot {
    pub coins: Vec<CoinConstraint>,
    pub pairs: Vec<PairConstraint>,
}

/// State every connector carries: configuration, the shared registry, its
/// own constraint tables and its balances.
pub struct ExchangeCore {
    config: ExchangeConfig,
    registry: Arc<Registry>,
    coin_constraints: RwLock<HashMap<u32, CoinConstraint>>,
    pair_constraints: RwLock<HashMap<u32, PairConstraint>>,
    balances: BalanceMap,
}

impl ExchangeCore {
    pub fn new(config: ExchangeConfig, registry: Arc<Registry>) -> Self {
        Self {
            config,
            registry,
            coin_constraints: RwLock::new(HashMap::new()),
            pair_constraints: RwLock::new(HashMap::new()),
            balances: BalanceMap::new(),
        }
    }

    pub fn name(&self) -> ExchangeName {
        self.config.name
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn source(&self) -> DataSource {
        self.config.source
    }

    /// Fail with `MissingCredentials` unless both key and secret are set
    pub fn require_credentials(&self) -> Result<()> {
        if self.config.has_credentials() {
            Ok(())
        } else {
            Err(Error::MissingCredentials(self.config.name.to_string()))
        }
    }

    pub fn get_coin_constraint(&self, coin: &Coin) -> Option<CoinConstraint> {
        let table = self.coin_constraints.read().unwrap_or_else(|p| p.into_inner());
        table.get(&coin.id).cloned()
    }

    pub fn set_coin_constraint(&self, constraint: CoinConstraint) {
        let mut table = self.coin_constraints.write().unwrap_or_else(|p| p.into_inner());
        table.insert(constraint.coin_id, constraint);
    }

    pub fn get_pair_constraint(&self, pair: &Pair) -> Option<PairConstraint> {
        let table = self.pair_constraints.read().unwrap_or_else(|p| p.into_inner());
        table.get(&pair.id).cloned()
    }

    pub fn set_pair_constraint(&self, constraint: PairConstraint) {
        let mut table = self.pair_constraints.write().unwrap_or_else(|p| p.into_inner());
        table.insert(constraint.pair_id, constraint);
    }

    /// Reverse lookup from the exchange's coin symbol
    pub fn get_coin_by_symbol(&self, symbol: &str) -> Option<Coin> {
        let table = self.coin_constraints.read().unwrap_or_else(|p| p.into_inner());
        table
            .values()
            .find(|c| c.ex_symbol.eq_ignore_ascii_case(symbol))
            .map(|c| c.coin.clone())
    }

    /// Reverse lookup from the exchange's market symbol
    pub fn get_pair_by_symbol(&self, symbol: &str) -> Option<Pair> {
        let table = self.pair_constraints.read().unwrap_or_else(|p| p.into_inner());
        table
            .values()
            .find(|p| p.ex_symbol.eq_ignore_ascii_case(symbol))
            .map(|p| p.pair.clone())
    }

    /// Exchange symbol for a coin, empty when the coin is not listed here
    pub fn get_symbol_by_coin(&self, coin: &Coin) -> String {
        self.get_coin_constraint(coin)
            .map(|c| c.ex_symbol)
            .unwrap_or_default()
    }

    /// Exchange symbol for a pair, empty when the pair is not listed here
    pub fn get_symbol_by_pair(&self, pair: &Pair) -> String {
        self.get_pair_constraint(pair)
            .map(|p| p.ex_symbol)
            .unwrap_or_default()
    }

    pub fn coins(&self) -> Vec<Coin> {
        let mut coins: Vec<Coin> = self
            .coin_constraints
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .values()
            .map(|c| c.coin.clone())
            .collect();
        coins.sort_by_key(|c| c.id);
        coins
    }

    pub fn pairs(&self) -> Vec<Pair> {
        let mut pairs: Vec<Pair> = self
            .pair_constraints
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .values()
            .map(|p| p.pair.clone())
            .collect();
        pairs.sort_by_key(|p| p.id);
        pairs
    }

    pub fn has_coin(&self, coin: &Coin) -> bool {
        self.get_coin_constraint(coin).is_some()
    }

    pub fn has_pair(&self, pair: &Pair) -> bool {
        self.get_pair_constraint(pair).is_some()
    }

    pub fn tx_fee(&self, coin: &Coin) -> f64 {
        self.get_coin_constraint(coin).map(|c| c.tx_fee).unwrap_or(0.0)
    }

    pub fn can_withdraw(&self, coin: &Coin) -> bool {
        self.get_coin_constraint(coin).map(|c| c.withdraw).unwrap_or(false)
    }

    pub fn can_deposit(&self, coin: &Coin) -> bool {
        self.get_coin_constraint(coin).map(|c| c.deposit).unwrap_or(false)
    }

    pub fn confirmation(&self, coin: &Coin) -> u32 {
        self.get_coin_constraint(coin).map(|c| c.confirmation).unwrap_or(0)
    }

    pub fn maker_fee(&self, pair: &Pair) -> f64 {
        self.get_pair_constraint(pair).map(|p| p.maker_fee).unwrap_or(0.0)
    }

    pub fn taker_fee(&self, pair: &Pair) -> f64 {
        self.get_pair_constraint(pair).map(|p| p.taker_fee).unwrap_or(0.0)
    }

    pub fn lot_size(&self, pair: &Pair) -> f64 {
        self.get_pair_constraint(pair).map(|p| p.lot_size).unwrap_or(0.0)
    }

    pub fn price_filter(&self, pair: &Pair) -> f64 {
        self.get_pair_constraint(pair).map(|p| p.price_filter).unwrap_or(0.0)
    }

    pub fn balance(&self, coin: &Coin) -> f64 {
        self.balances.get(&coin.code)
    }

    pub fn set_balance(&self, coin: &Coin, available: f64) {
        self.balances.set(&coin.code, available);
    }

    pub fn balances(&self) -> Vec<(String, f64)> {
        self.balances.snapshot()
    }

    pub fn snapshot(&self) -> ConstraintSnapshot {
        let mut coins: Vec<CoinConstraint> = self
            .coin_constraints
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .values()
            .cloned()
            .collect();
        coins.sort_by_key(|c| c.coin_id);

        let mut pairs: Vec<PairConstraint> = self
            .pair_constraints
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .values()
            .cloned()
            .collect();
        pairs.sort_by_key(|p| p.pair_id);

        ConstraintSnapshot { coins, pairs }
    }

    /// Replace the constraint tables with a snapshot, registering its coins
    /// and pairs in the shared registry. Ids are re-keyed to the registry's.
    pub fn apply_snapshot(&self, snapshot: ConstraintSnapshot) {
        for mut constraint in snapshot.coins {
            let coin = self.registry.add_coin(constraint.coin);
            constraint.coin_id = coin.id;
            constraint.coin = coin;
            self.set_coin_constraint(constraint);
        }
        for mut constraint in snapshot.pairs {
            if let Some(pair) = self.registry.add_pair(constraint.pair.clone()) {
                constraint.pair_id = pair.id;
                constraint.pair = pair;
                self.set_pair_constraint(constraint);
            }
        }
    }

    pub fn load_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let snapshot: ConstraintSnapshot = serde_json::from_str(&content)?;
        info!(
            "{} loaded {} coin and {} pair constraints from {}",
            self.name(),
            snapshot.coins.len(),
            snapshot.pairs.len(),
            path.display()
        );
        self.apply_snapshot(snapshot);
        Ok(())
    }

    pub fn write_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
