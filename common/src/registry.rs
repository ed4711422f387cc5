use crate::models::{Coin, Pair};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

#[derive(Default)]
struct Inner {
    coins: HashMap<String, Coin>,
    pairs: HashMap<String, Pair>,
    next_coin_id: u32,
    next_pair_id: u32,
}

/// Coin and pair identities shared by every connector in the process
#[derive(Default)]
pub struct Registry {
    inner: RwLock<Inner>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Look up a coin by code, ignoring case
    pub fn get_coin(&self, code: &str) -> Option<Coin> {
        self.read().coins.get(&code.to_uppercase()).cloned()
    }

    /// Register a coin. An id of 0 (or one already in use) gets the next free
    /// id; a code that is already registered returns the stored coin unchanged.
    pub fn add_coin(&self, mut coin: Coin) -> Coin {
        coin.code = coin.code.to_uppercase();
        let mut inner = self.write();
        if let Some(existing) = inner.coins.get(&coin.code) {
            return existing.clone();
        }
        let id_taken = coin.id == 0 || inner.coins.values().any(|c| c.id == coin.id);
        if id_taken {
            inner.next_coin_id += 1;
            coin.id = inner.next_coin_id;
        } else {
            inner.next_coin_id = inner.next_coin_id.max(coin.id);
        }
        debug!("Registered coin {} with id {}", coin.code, coin.id);
        inner.coins.insert(coin.code.clone(), coin.clone());
        coin
    }

    pub fn get_or_add_coin(&self, code: &str) -> Coin {
        match self.get_coin(code) {
            Some(coin) => coin,
            None => self.add_coin(Coin::new(code)),
        }
    }

    /// Return the pair for two registered coins, creating it on first use
    pub fn get_pair(&self, base: &Coin, target: &Coin) -> Option<Pair> {
        let base = self.get_coin(&base.code)?;
        let target = self.get_coin(&target.code)?;
        let name = Pair::format_name(&base.code, &target.code);

        let mut inner = self.write();
        if let Some(pair) = inner.pairs.get(&name) {
            return Some(pair.clone());
        }
        inner.next_pair_id += 1;
        let pair = Pair::new(inner.next_pair_id, base, target);
        debug!("Registered pair {} with id {}", pair.name, pair.id);
        inner.pairs.insert(name, pair.clone());
        Some(pair)
    }

    /// Register a pair loaded from elsewhere, keeping its id when it is free
    pub fn add_pair(&self, pair: Pair) -> Option<Pair> {
        let base = self.add_coin(pair.base);
        let target = self.add_coin(pair.target);
        let name = Pair::format_name(&base.code, &target.code);

        let mut inner = self.write();
        if let Some(existing) = inner.pairs.get(&name) {
            return Some(existing.clone());
        }
        let id_taken = pair.id == 0 || inner.pairs.values().any(|p| p.id == pair.id);
        let id = if id_taken {
            inner.next_pair_id += 1;
            inner.next_pair_id
        } else {
            inner.next_pair_id = inner.next_pair_id.max(pair.id);
            pair.id
        };
        let pair = Pair::new(id, base, target);
        inner.pairs.insert(name, pair.clone());
        Some(pair)
    }

    /// Look up a pair by its "BASE_TARGET" name, ignoring case
    pub fn get_pair_by_name(&self, name: &str) -> Option<Pair> {
        self.read().pairs.get(&name.to_uppercase()).cloned()
    }

    pub fn coins(&self) -> Vec<Coin> {
        let mut coins: Vec<Coin> = self.read().coins.values().cloned().collect();
        coins.sort_by_key(|c| c.id);
        coins
    }

    pub fn pairs(&self) -> Vec<Pair> {
        let mut pairs: Vec<Pair> = self.read().pairs.values().cloned().collect();
        pairs.sort_by_key(|p| p.id);
        pairs
    }
}
