//! Time-series forecasting of daily closing prices.

pub mod model;

pub use model::{AdditiveModel, FittedModel, ForecastRow};

use crate::error::StockcastError;
use crate::types::market::PriceBar;

/// Fit on closing prices and project `horizon_days` past the last bar.
pub fn forecast_closes(
    bars: &[PriceBar],
    horizon_days: u32,
) -> Result<Vec<ForecastRow>, StockcastError> {
    let series: Vec<_> = bars.iter().map(|b| (b.date, b.close)).collect();
    let fitted = AdditiveModel::default().fit(&series)?;
    tracing::debug!(
        observations = series.len(),
        horizon_days,
        sigma = fitted.residual_sigma(),
        "forecast model fitted"
    );
    Ok(fitted.predict(horizon_days))
}
