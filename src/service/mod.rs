pub mod accounts;
pub mod market_data;
