pub mod balance;
pub mod error;
pub mod models;
pub mod registry;

pub use balance::BalanceMap;
pub use error::Error;
pub use registry::Registry;
pub type Result<T> = std::result::Result<T, Error>;
