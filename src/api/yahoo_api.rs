use crate::error::StockcastError;
use crate::types::market::ChartEnvelope;
use axum::http::StatusCode;
use backon::{ExponentialBuilder, Retryable};
use chrono::{Days, NaiveDate, NaiveTime};
use std::time::Duration;
use tracing::warn;
use url::Url;

pub fn default_retry_policy() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_secs(1))
        .with_max_delay(Duration::from_secs(3))
        .with_max_times(3)
        .with_jitter()
}

/// Stateless caller for the Yahoo Finance chart endpoint.
pub struct YahooApi;

impl YahooApi {
    /// `{base}/v8/finance/chart/{ticker}` covering `start..=end` in daily bars.
    pub fn chart_url(
        base: &Url,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Url, StockcastError> {
        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let period2 = end
            .checked_add_days(Days::new(1))
            .unwrap_or(end)
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp();

        if base.cannot_be_a_base() {
            return Err(StockcastError::MarketData(format!("unusable base url {base}")));
        }
        // Index symbols such as `^FTSE` must reach the provider percent-encoded.
        let symbol: String = url::form_urlencoded::byte_serialize(ticker.as_bytes()).collect();
        let mut url = base.clone();
        url.set_path(&format!(
            "{}/v8/finance/chart/{symbol}",
            base.path().trim_end_matches('/')
        ));
        url.query_pairs_mut()
            .append_pair("period1", &period1.to_string())
            .append_pair("period2", &period2.to_string())
            .append_pair("interval", "1d")
            .append_pair("events", "history");
        Ok(url)
    }

    pub async fn fetch_chart(
        client: reqwest::Client,
        url: Url,
        retry_policy: ExponentialBuilder,
    ) -> Result<ChartEnvelope, StockcastError> {
        (|| async {
            let resp = client.get(url.clone()).send().await?;
            let status = resp.status();
            // Unknown symbols come back as 404 with a `chart.error` body worth decoding.
            if status.is_success() || status == StatusCode::NOT_FOUND {
                let bytes = resp.bytes().await?;
                return Ok(serde_json::from_slice::<ChartEnvelope>(&bytes)?);
            }
            Err::<ChartEnvelope, StockcastError>(StockcastError::UpstreamStatus(status))
        })
        .retry(retry_policy)
        .when(|e: &StockcastError| e.is_retryable())
        .notify(|err, dur: Duration| {
            warn!("chart request retrying after error {}, sleeping {:?}", err, dur);
        })
        .await
    }
}
