use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;

use crate::forecast;
use crate::middleware::RequireSession;
use crate::types::views::{AnalyticsResponse, ForecastResponse, NamedSeries, TickerLists, tail};
use crate::{StockcastError, router::AppState};

const TAIL_ROWS: usize = 5;
const DAYS_PER_YEAR: u32 = 365;

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub ticker: String,
    pub years: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub first: String,
    pub second: String,
}

/// GET /api/tickers
pub async fn tickers_handler(State(state): State<AppState>) -> Json<TickerLists> {
    Json(TickerLists {
        forecast: state.settings.forecast_tickers.clone(),
        analytics: state.settings.analytics_tickers.clone(),
        max_years: state.settings.max_years,
    })
}

/// GET /api/forecast?ticker=AAPL&years=2
pub async fn forecast_handler(
    State(state): State<AppState>,
    RequireSession(username): RequireSession,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<ForecastResponse>, StockcastError> {
    ensure_listed(&state.settings.forecast_tickers, &query.ticker)?;
    let years = query.years.unwrap_or(1);
    let horizon_days = horizon_days(years, state.settings.max_years)?;

    let (start, end) = history_window(&state);
    let history = state.market.fetch_daily(&query.ticker, start, end).await?;

    let fit_input = history.clone();
    let rows = tokio::task::spawn_blocking(move || {
        forecast::forecast_closes(&fit_input, horizon_days)
    })
    .await??;

    info!(%username, ticker = %query.ticker, years, rows = rows.len(), "forecast served");
    Ok(Json(ForecastResponse {
        ticker: query.ticker,
        years,
        horizon_days,
        history_tail: tail(&history, TAIL_ROWS),
        forecast_tail: tail(&rows, TAIL_ROWS),
        history,
        forecast: rows,
    }))
}

/// GET /api/analytics?first=GOOG&second=AAPL
pub async fn analytics_handler(
    State(state): State<AppState>,
    RequireSession(username): RequireSession,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsResponse>, StockcastError> {
    ensure_listed(&state.settings.analytics_tickers, &query.first)?;
    ensure_listed(&state.settings.analytics_tickers, &query.second)?;

    let (start, end) = history_window(&state);
    let (first, second) = tokio::try_join!(
        state.market.fetch_daily(&query.first, start, end),
        state.market.fetch_daily(&query.second, start, end),
    )?;

    info!(%username, first = %query.first, second = %query.second, "analytics served");
    Ok(Json(AnalyticsResponse {
        series: vec![
            NamedSeries::opens(&query.first, &first),
            NamedSeries::opens(&query.second, &second),
        ],
    }))
}

/// Calendar days to forecast for `years`, bounded by `1..=max_years` and by `u32`.
fn horizon_days(years: u32, max_years: u32) -> Result<u32, StockcastError> {
    if !(1..=max_years).contains(&years) {
        return Err(StockcastError::validation(format!(
            "years must be between 1 and {max_years}"
        )));
    }
    years
        .checked_mul(DAYS_PER_YEAR)
        .ok_or_else(|| StockcastError::validation(format!("years too large: {years}")))
}

fn ensure_listed(allowed: &[String], ticker: &str) -> Result<(), StockcastError> {
    if allowed.iter().any(|t| t == ticker) {
        Ok(())
    } else {
        Err(StockcastError::validation(format!("unsupported ticker: {ticker}")))
    }
}

fn history_window(state: &AppState) -> (NaiveDate, NaiveDate) {
    (state.settings.history_start, Utc::now().date_naive())
}
