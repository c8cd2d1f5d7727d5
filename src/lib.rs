pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod forecast;
pub mod handlers;
pub mod hashing;
pub mod middleware;
pub mod router;
pub mod service;
pub mod types;

pub use db::{Account, AccountStore};
pub use error::StockcastError;
pub use service::market_data::{MarketData, YahooFinance};
