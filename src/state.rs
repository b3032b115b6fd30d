//! Shared application state and the handler-level auth check.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use sqlx::SqlitePool;

use markhub_auth::{cookie, AuthUser, SessionProvider};
use markhub_http::error::ApiError;

/// State shared by all API handlers.
///
/// The pool is the only long-lived storage handle; each request acquires
/// its own connection from it and releases it at request end.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub auth: Arc<dyn SessionProvider>,
    pub cookie_name: String,
    pub session_ttl_secs: u64,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        auth: Arc<dyn SessionProvider>,
        cookie_name: String,
        session_ttl_secs: u64,
    ) -> Self {
        Self {
            db,
            auth,
            cookie_name,
            session_ttl_secs,
        }
    }
}

/// Extractor resolving the caller behind the session cookie.
///
/// API routes are not behind the session gate; this is their auth check.
/// Listed before the body extractor in every handler so a missing session
/// short-circuits to 401 before the body shape is even considered.
pub struct CurrentUser(pub AuthUser);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let token = parts
            .headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|header| cookie::session_token(header, &state.cookie_name))
            .ok_or(ApiError::Unauthorized)?;

        let user = state
            .auth
            .current_user(token)
            .await
            .map_err(ApiError::Internal)?;

        user.map(CurrentUser).ok_or(ApiError::Unauthorized)
    }
}
