use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::StockcastError;

/// One daily OHLCV observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Yahoo `v8/finance/chart` envelope.
#[derive(Debug, Deserialize)]
pub struct ChartEnvelope {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<u64>>,
}

impl ChartEnvelope {
    /// Flatten the first chart result into date-ordered bars, skipping rows with missing prices.
    pub fn into_bars(self, ticker: &str) -> Result<Vec<PriceBar>, StockcastError> {
        if let Some(err) = self.chart.error {
            return Err(StockcastError::MarketData(format!(
                "{}: {}",
                err.code, err.description
            )));
        }
        let Some(result) = self.chart.result.and_then(|r| r.into_iter().next()) else {
            return Err(StockcastError::NoPriceData(ticker.to_string()));
        };
        let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

        let mut bars: Vec<PriceBar> = result
            .timestamp
            .iter()
            .enumerate()
            .filter_map(|(i, ts)| {
                let date = DateTime::from_timestamp(*ts, 0)?.date_naive();
                Some(PriceBar {
                    date,
                    open: (*quote.open.get(i)?)?,
                    high: (*quote.high.get(i)?)?,
                    low: (*quote.low.get(i)?)?,
                    close: (*quote.close.get(i)?)?,
                    volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
                })
            })
            .collect();

        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);

        if bars.is_empty() {
            return Err(StockcastError::NoPriceData(ticker.to_string()));
        }
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "AAPL"},
                "timestamp": [1704205800, 1704292200, 1704378600],
                "indicators": {
                    "quote": [{
                        "open":   [187.15, null, 182.15],
                        "high":   [188.44, 185.88, 183.09],
                        "low":    [183.89, 183.43, 180.88],
                        "close":  [185.64, 184.25, 181.91],
                        "volume": [82488700, 58414500, null]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn skips_rows_with_missing_prices() {
        let env: ChartEnvelope = serde_json::from_str(SAMPLE).unwrap();
        let bars = env.into_bars("AAPL").unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[0].open, 187.15);
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        assert_eq!(bars[1].volume, 0);
    }

    #[test]
    fn chart_error_is_reported() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let env: ChartEnvelope = serde_json::from_str(body).unwrap();
        let err = env.into_bars("NOPE").unwrap_err();
        assert!(matches!(err, StockcastError::MarketData(ref m) if m.contains("delisted")));
    }

    #[test]
    fn empty_result_means_no_data() {
        let body = r#"{"chart":{"result":[{"indicators":{"quote":[{}]}}],"error":null}}"#;
        let env: ChartEnvelope = serde_json::from_str(body).unwrap();
        assert!(matches!(
            env.into_bars("AAPL"),
            Err(StockcastError::NoPriceData(_))
        ));
    }
}
