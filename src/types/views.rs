use chrono::NaiveDate;
use serde::Serialize;

use crate::forecast::ForecastRow;
use crate::types::market::PriceBar;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct TickerLists {
    pub forecast: Vec<String>,
    pub analytics: Vec<String>,
    pub max_years: u32,
}

/// Payload behind the forecasting view.
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub ticker: String,
    pub years: u32,
    pub horizon_days: u32,
    pub history: Vec<PriceBar>,
    /// Last few raw bars, shown as a table.
    pub history_tail: Vec<PriceBar>,
    pub forecast: Vec<ForecastRow>,
    pub forecast_tail: Vec<ForecastRow>,
}

#[derive(Debug, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct NamedSeries {
    pub ticker: String,
    pub points: Vec<SeriesPoint>,
}

/// Two opening-price series overlaid in the analytics view.
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub series: Vec<NamedSeries>,
}

impl NamedSeries {
    pub fn opens(ticker: &str, bars: &[PriceBar]) -> Self {
        Self {
            ticker: ticker.to_string(),
            points: bars
                .iter()
                .map(|b| SeriesPoint {
                    date: b.date,
                    value: b.open,
                })
                .collect(),
        }
    }
}

/// Last `n` items of a slice, cloned.
pub fn tail<T: Clone>(items: &[T], n: usize) -> Vec<T> {
    items[items.len().saturating_sub(n)..].to_vec()
}
