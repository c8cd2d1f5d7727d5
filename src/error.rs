use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum StockcastError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("user already exists: {0}")]
    DuplicateUser(String),

    #[error("storage error: {0}")]
    Storage(#[from] SqlxError),

    #[error("incorrect username/password")]
    InvalidCredentials,

    #[error("no active session")]
    Unauthorized,

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("market data error: {0}")]
    MarketData(String),

    #[error("no price data for {0}")]
    NoPriceData(String),

    #[error("upstream error with status: {0}")]
    UpstreamStatus(StatusCode),

    #[error("forecast error: {0}")]
    Forecast(String),

    #[error("background task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl StockcastError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Transport failures and 5xx answers are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            StockcastError::Reqwest(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            StockcastError::UpstreamStatus(code) => {
                code.is_server_error() || *code == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

impl IntoResponse for StockcastError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match self {
            StockcastError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg)
            }
            StockcastError::DuplicateUser(_) => (
                StatusCode::CONFLICT,
                "DUPLICATE_USER",
                "User already exists".to_string(),
            ),
            StockcastError::Storage(e) => {
                tracing::error!(error = %e, "storage operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "The request could not be saved.".to_string(),
                )
            }
            StockcastError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Incorrect Username/Password".to_string(),
            ),
            StockcastError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Login required.".to_string(),
            ),
            StockcastError::NoPriceData(ticker) => (
                StatusCode::NOT_FOUND,
                "NO_PRICE_DATA",
                format!("No price data available for {ticker}."),
            ),
            StockcastError::Forecast(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "FORECAST_ERROR", msg)
            }
            StockcastError::TaskJoin(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred.".to_string(),
            ),
            StockcastError::Reqwest(_)
            | StockcastError::UrlParse(_)
            | StockcastError::Json(_)
            | StockcastError::MarketData(_) => (
                StatusCode::BAD_GATEWAY,
                "BAD_GATEWAY",
                "Market data service is unavailable.".to_string(),
            ),
            StockcastError::UpstreamStatus(code) => {
                let (err_code, msg) = match code {
                    StatusCode::TOO_MANY_REQUESTS => {
                        ("RATE_LIMIT", "Market data rate limit exceeded.")
                    }
                    StatusCode::NOT_FOUND => ("NOT_FOUND", "Ticker not found upstream."),
                    _ => ("UPSTREAM_ERROR", "An upstream error occurred."),
                };
                (StatusCode::BAD_GATEWAY, err_code, msg.to_string())
            }
        };

        let body = ApiErrorResponse {
            error: ApiErrorBody {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
