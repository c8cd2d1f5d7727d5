use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use time::Duration;

use crate::error::StockcastError;

pub const SESSION_COOKIE: &str = "stockcast_session";

/// Username of the logged-in account, read from the encrypted session cookie.
///
/// Rejects with 401 when the cookie is missing or cannot be decrypted with the server key.
#[derive(Debug, Clone)]
pub struct RequireSession(pub String);

impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = StockcastError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = match PrivateCookieJar::<Key>::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(never) => match never {},
        };
        jar.get(SESSION_COOKIE)
            .map(|c| c.value().to_owned())
            .filter(|username| !username.is_empty())
            .map(RequireSession)
            .ok_or(StockcastError::Unauthorized)
    }
}

pub fn start_session(jar: PrivateCookieJar, username: &str, secure: bool) -> PrivateCookieJar {
    jar.add(
        Cookie::build(Cookie::new(SESSION_COOKIE, username.to_string()))
            .path("/")
            .http_only(true)
            .secure(secure)
            .same_site(SameSite::Lax)
            .max_age(Duration::hours(8))
            .build(),
    )
}

pub fn end_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build(Cookie::new(SESSION_COOKIE, "")).path("/").build())
}
