use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::PrivateCookieJar;
use tracing::info;

use crate::db::Account;
use crate::middleware::RequireSession;
use crate::middleware::session::{end_session, start_session};
use crate::service::accounts::{self, LoginForm, SignUpForm};
use crate::types::views::{MessageResponse, SessionInfo};
use crate::{StockcastError, router::AppState};

/// POST /api/signup
pub async fn signup_handler(
    State(state): State<AppState>,
    Json(form): Json<SignUpForm>,
) -> Result<(StatusCode, Json<MessageResponse>), StockcastError> {
    accounts::sign_up(&state.store, &form).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "You have successfully created a valid Account. Go to Login Menu to login."
                .to_string(),
        }),
    ))
}

/// POST /api/login -> issues the session cookie.
pub async fn login_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Json(form): Json<LoginForm>,
) -> Result<(PrivateCookieJar, Json<SessionInfo>), StockcastError> {
    let account = accounts::log_in(&state.store, &form).await?;
    let jar = start_session(jar, &account.username, !state.settings.insecure_cookie);
    Ok((
        jar,
        Json(SessionInfo {
            username: account.username,
        }),
    ))
}

/// POST /api/logout
pub async fn logout_handler(jar: PrivateCookieJar) -> (PrivateCookieJar, StatusCode) {
    (end_session(jar), StatusCode::NO_CONTENT)
}

/// GET /api/session
pub async fn session_handler(RequireSession(username): RequireSession) -> Json<SessionInfo> {
    Json(SessionInfo { username })
}

/// GET /api/profiles
pub async fn profiles_handler(
    State(state): State<AppState>,
    RequireSession(username): RequireSession,
) -> Result<Json<Vec<Account>>, StockcastError> {
    let accounts = state.store.list_all().await?;
    info!(%username, count = accounts.len(), "profiles listed");
    Ok(Json(accounts))
}
