use common::{
    models::{CoinConstraint, ExchangeName, Maker, Pair, PairConstraint, PublicOperation, TradeDetail},
    Error, Registry, Result,
};
use connectors::ExchangeConnector;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExchangeSummary {
    pub name: ExchangeName,
    pub coins: usize,
    pub pairs: usize,
}

/// Routes gateway requests to the configured exchange connectors
pub struct GatewayService {
    /// Registry shared by every connector
    registry: Arc<Registry>,
    connectors: BTreeMap<ExchangeName, Arc<dyn ExchangeConnector>>,
}

impl GatewayService {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            connectors: BTreeMap::new(),
        }
    }

    pub fn add_connector(&mut self, connector: Arc<dyn ExchangeConnector>) {
        info!("Serving {} through the gateway", connector.name());
        self.connectors.insert(connector.name(), connector);
    }

    pub fn exchanges(&self) -> Vec<ExchangeSummary> {
        self.connectors
            .values()
            .map(|connector| ExchangeSummary {
                name: connector.name(),
                coins: connector.core().coins().len(),
                pairs: connector.core().pairs().len(),
            })
            .collect()
    }

    fn connector(&self, exchange: &str) -> Result<&Arc<dyn ExchangeConnector>> {
        let name: ExchangeName = exchange
            .parse()
            .map_err(|_| Error::NotFound(format!("Exchange '{}' not found", exchange)))?;
        self.connectors
            .get(&name)
            .ok_or_else(|| Error::NotFound(format!("Exchange '{}' is not enabled", name)))
    }

    fn pair(&self, name: &str) -> Result<Pair> {
        self.registry
            .get_pair_by_name(name)
            .ok_or_else(|| Error::NotFound(format!("Pair '{}' not found", name)))
    }

    pub fn coins(&self, exchange: &str) -> Result<Vec<CoinConstraint>> {
        let core = self.connector(exchange)?.core();
        Ok(core.snapshot().coins)
    }

    pub fn pairs(&self, exchange: &str) -> Result<Vec<PairConstraint>> {
        let core = self.connector(exchange)?.core();
        Ok(core.snapshot().pairs)
    }

    pub async fn order_book(&self, exchange: &str, pair: &str) -> Result<Maker> {
        let connector = self.connector(exchange)?;
        let pair = self.pair(pair)?;
        debug!("Order book for {} on {}", pair.name, connector.name());
        connector.order_book(&pair).await
    }

    pub async fn trades(&self, exchange: &str, pair: &str) -> Result<Vec<TradeDetail>> {
        let connector = self.connector(exchange)?;
        let mut operation = PublicOperation::trade_history(self.pair(pair)?);
        connector.load_public_data(&mut operation).await?;
        Ok(operation.trade_history)
    }

    /// Refresh the exchange balances and return them keyed by coin code
    pub async fn balances(&self, exchange: &str) -> Result<BTreeMap<String, f64>> {
        let connector = self.connector(exchange)?;
        connector.update_all_balances().await?;
        Ok(connector.core().balances().into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use common::models::{
        ChainType, Coin, DataSource, MakerLevel, Order, OrderSide,
    };
    use connectors::{ExchangeConfig, ExchangeCore};

    /// Connector serving fixed data without any network traffic
    struct StaticConnector {
        core: ExchangeCore,
    }

    impl StaticConnector {
        fn new(registry: Arc<Registry>) -> Self {
            let core = ExchangeCore::new(ExchangeConfig::new(ExchangeName::Btse), registry.clone());
            let btc = registry.get_or_add_coin("BTC");
            let usd = registry.get_or_add_coin("USD");
            core.set_coin_constraint(CoinConstraint {
                coin_id: btc.id,
                coin: btc.clone(),
                ex_symbol: "BTC".to_string(),
                chain_type: ChainType::Mainnet,
                tx_fee: 0.0,
                withdraw: true,
                deposit: true,
                confirmation: 6,
                listed: true,
            });
            if let Some(pair) = registry.get_pair(&usd, &btc) {
                core.set_pair_constraint(PairConstraint {
                    pair_id: pair.id,
                    pair,
                    ex_symbol: "BTC-USD".to_string(),
                    maker_fee: 0.001,
                    taker_fee: 0.002,
                    lot_size: 0.0001,
                    price_filter: 0.5,
                    listed: true,
                });
            }
            Self { core }
        }
    }

    #[async_trait]
    impl ExchangeConnector for StaticConnector {
        fn name(&self) -> ExchangeName {
            ExchangeName::Btse
        }

        fn core(&self) -> &ExchangeCore {
            &self.core
        }

        async fn get_coins_data(&self) -> Result<()> {
            Ok(())
        }

        async fn get_pairs_data(&self) -> Result<()> {
            Ok(())
        }

        async fn order_book(&self, _pair: &Pair) -> Result<Maker> {
            Ok(Maker {
                worker_ip: None,
                source: DataSource::ExchangeApi,
                before_timestamp: 1,
                after_timestamp: 2,
                bids: vec![MakerLevel { rate: 100.0, quantity: 1.0 }],
                asks: vec![],
            })
        }

        async fn load_public_data(&self, operation: &mut PublicOperation) -> Result<()> {
            operation.trade_history = vec![TradeDetail {
                id: "1".to_string(),
                quantity: 0.5,
                rate: 101.0,
                timestamp: 1_700_000_000_000,
                direction: Some(OrderSide::Buy),
            }];
            Ok(())
        }

        async fn update_all_balances(&self) -> Result<()> {
            if let Some(btc) = self.core.registry().get_coin("BTC") {
                self.core.set_balance(&btc, 2.5);
            }
            Ok(())
        }

        async fn withdraw(&self, _coin: &Coin, _quantity: f64, _address: &str, _tag: &str) -> Result<()> {
            Err(Error::UnsupportedOperation("withdraw".to_string()))
        }

        async fn limit_buy(&self, _pair: &Pair, _quantity: f64, _rate: f64) -> Result<Order> {
            Err(Error::UnsupportedOperation("limit_buy".to_string()))
        }

        async fn limit_sell(&self, _pair: &Pair, _quantity: f64, _rate: f64) -> Result<Order> {
            Err(Error::UnsupportedOperation("limit_sell".to_string()))
        }

        async fn order_status(&self, _order: &mut Order) -> Result<()> {
            Ok(())
        }

        async fn cancel_order(&self, _order: &mut Order) -> Result<()> {
            Ok(())
        }
    }

    fn service() -> GatewayService {
        let registry = Arc::new(Registry::new());
        let mut service = GatewayService::new(registry.clone());
        service.add_connector(Arc::new(StaticConnector::new(registry)));
        service
    }

    #[test]
    fn lists_enabled_exchanges_with_counts() {
        let service = service();
        assert_eq!(
            service.exchanges(),
            vec![ExchangeSummary {
                name: ExchangeName::Btse,
                coins: 1,
                pairs: 1,
            }]
        );
    }

    #[test]
    fn unknown_or_disabled_exchange_is_not_found() {
        let service = service();
        assert!(matches!(service.coins("kraken"), Err(Error::NotFound(_))));
        assert!(matches!(service.pairs("bitz"), Err(Error::NotFound(_))));
        assert_eq!(service.pairs("BTSE").unwrap()[0].ex_symbol, "BTC-USD");
    }

    #[tokio::test]
    async fn market_data_is_resolved_by_pair_name() {
        let service = service();
        let maker = service.order_book("btse", "usd_btc").await.unwrap();
        assert_eq!(maker.bids[0].rate, 100.0);

        let trades = service.trades("btse", "USD_BTC").await.unwrap();
        assert_eq!(trades.len(), 1);

        assert!(matches!(
            service.order_book("btse", "USD_DOGE").await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn balances_are_refreshed_before_reading() {
        let service = service();
        let balances = service.balances("btse").await.unwrap();
        assert_eq!(balances.get("BTC"), Some(&2.5));
    }
}
