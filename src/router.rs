use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use std::sync::Arc;

use crate::config::Config;
use crate::db::AccountStore;
use crate::handlers::accounts::{
    login_handler, logout_handler, profiles_handler, session_handler, signup_handler,
};
use crate::handlers::market::{analytics_handler, forecast_handler, tickers_handler};
use crate::handlers::pages::{health_handler, index_handler};
use crate::service::market_data::MarketData;

const BODY_LIMIT: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: AccountStore,
    pub market: Arc<dyn MarketData>,
    pub settings: Arc<Config>,
    key: Key,
}

impl AppState {
    pub fn new(store: AccountStore, market: Arc<dyn MarketData>, settings: Config) -> Self {
        let key = match settings.cookie_secret.as_deref() {
            Some(secret) => Key::from(Sha512::digest(secret.as_bytes()).as_slice()),
            None => Key::generate(),
        };
        Self {
            store,
            market,
            settings: Arc::new(settings),
            key,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/healthz", get(health_handler))
        .route("/api/tickers", get(tickers_handler))
        .route("/api/signup", post(signup_handler))
        .route("/api/login", post(login_handler))
        .route("/api/logout", post(logout_handler))
        .route("/api/session", get(session_handler))
        .route("/api/profiles", get(profiles_handler))
        .route("/api/forecast", get(forecast_handler))
        .route("/api/analytics", get(analytics_handler))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(state)
}
