use std::collections::HashMap;
use std::sync::RwLock;

/// Available balance per coin code
#[derive(Debug, Default)]
pub struct BalanceMap {
    inner: RwLock<HashMap<String, f64>>,
}

impl BalanceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, code: &str, available: f64) {
        let mut inner = self.inner.write().unwrap_or_else(|p| p.into_inner());
        inner.insert(code.to_uppercase(), available);
    }

    /// Balance for a coin code, 0.0 when nothing has been recorded
    pub fn get(&self, code: &str) -> f64 {
        let inner = self.inner.read().unwrap_or_else(|p| p.into_inner());
        inner.get(&code.to_uppercase()).copied().unwrap_or(0.0)
    }

    pub fn snapshot(&self) -> Vec<(String, f64)> {
        let inner = self.inner.read().unwrap_or_else(|p| p.into_inner());
        let mut balances: Vec<(String, f64)> =
            inner.iter().map(|(code, value)| (code.clone(), *value)).collect();
        balances.sort_by(|a, b| a.0.cmp(&b.0));
        balances
    }

    pub fn clear(&self) {
        self.inner.write().unwrap_or_else(|p| p.into_inner()).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_code_reads_as_zero() {
        let balances = BalanceMap::new();
        assert_eq!(balances.get("BTC"), 0.0);
    }

    #[test]
    fn snapshot_is_sorted_and_overwrites() {
        let balances = BalanceMap::new();
        balances.set("eth", 2.0);
        balances.set("BTC", 0.5);
        balances.set("ETH", 3.0);

        assert_eq!(
            balances.snapshot(),
            vec![("BTC".to_string(), 0.5), ("ETH".to_string(), 3.0)]
        );

        balances.clear();
        assert!(balances.snapshot().is_empty());
    }
}
