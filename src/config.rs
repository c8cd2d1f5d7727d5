use chrono::NaiveDate;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use url::Url;

/// Runtime configuration.
///
/// Defaults are overridden by `STOCKCAST_*` environment variables, e.g.
/// `STOCKCAST_DATABASE_URL=sqlite://accounts.db`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub loglevel: String,
    /// Master secret for the session cookie key; random per process when unset.
    pub cookie_secret: Option<String>,
    /// Drop the `Secure` attribute from session cookies (plain-http development).
    pub insecure_cookie: bool,
    pub proxy: Option<Url>,
    pub market_data_url: Url,
    pub market_requests_per_minute: u32,
    /// First day of the price history fed to the charts and the model.
    pub history_start: NaiveDate,
    pub max_years: u32,
    pub forecast_tickers: Vec<String>,
    pub analytics_tickers: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let tickers: Vec<String> = [
            "AAPL", "GOOG", "MSFT", "GME", "BTC-GBP", "^FTSE", "^FTMC", "WMT", "NKE",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        Self {
            database_url: "sqlite://data.db".to_string(),
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            cookie_secret: None,
            insecure_cookie: false,
            proxy: None,
            market_data_url: Url::parse("https://query1.finance.yahoo.com")
                .expect("static market data url"),
            market_requests_per_minute: 60,
            history_start: NaiveDate::from_ymd_opt(2015, 1, 1).expect("static start date"),
            max_years: 5,
            forecast_tickers: tickers.clone(),
            analytics_tickers: tickers,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("STOCKCAST_").split("__"))
            .extract()
    }
}

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::load().unwrap_or_else(|e| panic!("FATAL: invalid configuration: {e}"))
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_extract_without_environment() {
        let cfg: Config = Figment::from(Serialized::defaults(Config::default()))
            .extract()
            .expect("defaults should round-trip through figment");
        assert_eq!(cfg.database_url, "sqlite://data.db");
        assert_eq!(cfg.max_years, 5);
        assert!(cfg.forecast_tickers.iter().any(|t| t == "BTC-GBP"));
        assert_eq!(cfg.history_start, NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());
    }
}
