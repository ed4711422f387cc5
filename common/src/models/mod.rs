mod coin;
mod constraint;
mod market;
mod operation;
mod order;

pub use coin::{Coin, ExchangeName, Pair};
pub use constraint::{ChainType, CoinConstraint, DataSource, PairConstraint};
pub use market::{Maker, MakerLevel, TradeDetail};
pub use operation::{PublicOperation, PublicOperationKind};
pub use order::{Order, OrderSide, OrderStatus};
