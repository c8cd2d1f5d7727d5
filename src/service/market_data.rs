use crate::api::yahoo_api::{YahooApi, default_retry_policy};
use crate::config::Config;
use crate::error::StockcastError;
use crate::types::market::PriceBar;
use async_trait::async_trait;
use chrono::NaiveDate;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use url::Url;

/// Source of daily price history. Swappable so handlers can run against fixtures.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Daily bars for `ticker` from `start` through `end`, oldest first.
    async fn fetch_daily(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, StockcastError>;
}

/// Yahoo Finance backed [`MarketData`], throttled by a shared rate limiter.
#[derive(Clone)]
pub struct YahooFinance {
    client: reqwest::Client,
    base_url: Url,
    limiter: Arc<DefaultDirectRateLimiter>,
}

impl YahooFinance {
    pub fn new(cfg: &Config) -> Result<Self, StockcastError> {
        let mut builder = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) stockcast/0.1")
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(20));
        if let Some(proxy_url) = cfg.proxy.as_ref() {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }
        let client = builder.build()?;

        let per_minute = NonZeroU32::new(cfg.market_requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)));

        Ok(Self {
            client,
            base_url: cfg.market_data_url.clone(),
            limiter,
        })
    }
}

#[async_trait]
impl MarketData for YahooFinance {
    async fn fetch_daily(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, StockcastError> {
        let url = YahooApi::chart_url(&self.base_url, ticker, start, end)?;
        self.limiter.until_ready().await;

        let envelope =
            YahooApi::fetch_chart(self.client.clone(), url, default_retry_policy()).await?;
        let bars = envelope.into_bars(ticker)?;
        info!(ticker, %start, %end, bars = bars.len(), "price history loaded");
        Ok(bars)
    }
}
