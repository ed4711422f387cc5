pub mod bitz;
pub mod btse;
pub mod config;
pub mod core;
pub mod http;
pub mod json;
pub mod signing;

use async_trait::async_trait;
use common::{
    models::{Coin, DataSource, ExchangeName, Maker, Order, Pair, PublicOperation},
    Error, Registry, Result,
};
use std::sync::Arc;
use tracing::info;

pub use crate::config::ExchangeConfig;
pub use crate::core::{ConstraintSnapshot, ExchangeCore};

/// Interface every exchange connector implements
#[async_trait]
pub trait ExchangeConnector: Send + Sync {
    fn name(&self) -> ExchangeName;

    /// Constraint tables, balances and configuration of this exchange
    fn core(&self) -> &ExchangeCore;

    /// Load coin and pair constraints according to the configured source
    async fn init_data(&self) -> Result<()> {
        let core = self.core();
        if core.source() == DataSource::JsonFile {
            let uri = core.config().source_uri.clone().ok_or_else(|| {
                Error::ConfigError(format!("{} has no constraint file configured", self.name()))
            })?;
            core.load_snapshot(&uri)?;
        }
        self.get_coins_data().await?;
        self.get_pairs_data().await?;
        info!(
            "{} initialised with {} coins and {} pairs",
            self.name(),
            core.coins().len(),
            core.pairs().len()
        );
        Ok(())
    }

    /// Reconcile listed coins against the registry and constraint table
    async fn get_coins_data(&self) -> Result<()>;

    /// Reconcile listed markets against the registry and constraint table
    async fn get_pairs_data(&self) -> Result<()>;

    async fn order_book(&self, pair: &Pair) -> Result<Maker>;

    /// Fetch the public data named by `operation.kind` into the operation
    async fn load_public_data(&self, operation: &mut PublicOperation) -> Result<()>;

    /// Refresh the available balance of every known coin
    async fn update_all_balances(&self) -> Result<()>;

    async fn withdraw(&self, coin: &Coin, quantity: f64, address: &str, tag: &str) -> Result<()>;

    async fn limit_buy(&self, pair: &Pair, quantity: f64, rate: f64) -> Result<Order>;

    async fn limit_sell(&self, pair: &Pair, quantity: f64, rate: f64) -> Result<Order>;

    /// Update status and fill information of an order in place
    async fn order_status(&self, order: &mut Order) -> Result<()>;

    async fn cancel_order(&self, order: &mut Order) -> Result<()>;
}

/// Create the connector for the exchange named in `config`
pub fn build_connector(
    config: ExchangeConfig,
    registry: Arc<Registry>,
) -> Result<Arc<dyn ExchangeConnector>> {
    config.validate()?;
    let connector: Arc<dyn ExchangeConnector> = match config.name {
        ExchangeName::Bitz => Arc::new(bitz::BitzConnector::new(config, registry)?),
        ExchangeName::Btse => Arc::new(btse::BtseConnector::new(config, registry)?),
    };
    Ok(connector)
}
