#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use chrono::{Datelike, Days, NaiveDate, Utc};
use serde_json::Value;
use std::{
    fs,
    path::PathBuf,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use stockcast::{
    AccountStore, MarketData, StockcastError,
    config::Config,
    router::{AppState, app_router},
    types::PriceBar,
};
use tower::ServiceExt;

/// Ticker the fixture source reports as having no history.
pub const EMPTY_TICKER: &str = "GME";

/// Weekday bars with a gentle upward drift; opens differ per ticker.
pub struct FixtureMarket;

#[async_trait]
impl MarketData for FixtureMarket {
    async fn fetch_daily(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, StockcastError> {
        if ticker == EMPTY_TICKER {
            return Err(StockcastError::NoPriceData(ticker.to_string()));
        }
        let offset = ticker.len() as f64;
        let bars = start
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| d.weekday().number_from_monday() <= 5)
            .enumerate()
            .map(|(i, date)| {
                let close = 100.0 + offset + 0.1 * i as f64;
                PriceBar {
                    date,
                    open: close - 0.5,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1_000 + i as u64,
                }
            })
            .collect();
        Ok(bars)
    }
}

/// Temp-file database removed on drop.
pub struct TempDb {
    pub path: PathBuf,
}

impl TempDb {
    pub fn new(label: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!(
            "stockcast-{label}-{}-{}.sqlite",
            std::process::id(),
            nanos
        ));
        Self { path }
    }

    pub fn url(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

pub fn test_config() -> Config {
    let mut cfg = Config::default();
    cfg.cookie_secret = Some("integration-test-cookie-secret".to_string());
    cfg.insecure_cookie = true;
    cfg.history_start = Utc::now()
        .date_naive()
        .checked_sub_days(Days::new(200))
        .expect("date in range");
    cfg
}

pub async fn test_app(label: &str) -> (Router, AccountStore, TempDb) {
    let db = TempDb::new(label);
    let store = AccountStore::open(&db.url()).await.expect("open store");
    let state = AppState::new(store.clone(), Arc::new(FixtureMarket), test_config());
    (app_router(state), store, db)
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.expect("request failed")
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("failed to build request")
}

pub async fn json_body(resp: Response<Body>) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body was not json")
}

/// `name=value` pair of the first `Set-Cookie` header.
pub fn session_cookie(resp: &Response<Body>) -> String {
    resp.headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("missing set-cookie")
        .to_string()
}

pub async fn sign_up_and_log_in(app: &Router, username: &str, password: &str) -> String {
    let resp = send(
        app,
        post_json(
            "/api/signup",
            serde_json::json!({"name": format!("{username} name"), "username": username, "password": password}),
        ),
    )
    .await;
    assert_eq!(resp.status(), 201);

    let resp = send(
        app,
        post_json(
            "/api/login",
            serde_json::json!({"username": username, "password": password}),
        ),
    )
    .await;
    assert_eq!(resp.status(), 200);
    session_cookie(&resp)
}
