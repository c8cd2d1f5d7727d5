pub mod market;
pub mod views;

pub use market::PriceBar;
