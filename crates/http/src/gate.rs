//! Session gate for page navigation.
//!
//! Every page request passes through here before reaching its handler.
//! The gate refreshes the session token via the external provider and
//! applies the redirect rules; API routes under `/api` are not gated and
//! perform their own handler-level auth check instead.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use markhub_auth::{cookie, AuthUser, RefreshedSession, SessionProvider};

pub const ROOT_PATH: &str = "/";
pub const AUTH_PREFIX: &str = "/auth";
pub const LOGIN_PATH: &str = "/auth/login";
pub const CALLBACK_PATH: &str = "/auth/callback";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Shared state for the session gate middleware.
pub struct GateState {
    pub provider: Arc<dyn SessionProvider>,
    pub cookie_name: String,
    pub session_ttl_secs: u64,
}

/// Authenticated user resolved by the gate, handed to page handlers via
/// request extensions.
#[derive(Debug, Clone)]
pub struct GateUser(pub Option<AuthUser>);

/// Gate middleware. Decision table, in priority order:
/// 1. callback path: pass through unmodified;
/// 2. user present on an auth page: redirect to the dashboard;
/// 3. no user on a dashboard page: redirect to login;
/// 4. root path: pass through (page decides);
/// 5. otherwise: pass through with the refreshed cookie attached.
///
/// A failed refresh is treated as "no user"; there are no retries.
pub async fn session_gate(
    State(gate): State<Arc<GateState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if path == CALLBACK_PATH {
        return next.run(request).await;
    }

    let token = request
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| cookie::session_token(header, &gate.cookie_name))
        .map(str::to_owned);

    let refreshed = match token {
        Some(token) => match gate.provider.refresh(&token).await {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(error = %err, "session refresh failed, treating as no user");
                None
            }
        },
        None => None,
    };

    if refreshed.is_some() && path.starts_with(AUTH_PREFIX) {
        let mut response = Redirect::to(DASHBOARD_PATH).into_response();
        attach_session_cookie(&mut response, &gate, refreshed.as_ref());
        return response;
    }

    if refreshed.is_none() && path.starts_with(DASHBOARD_PATH) {
        return Redirect::to(LOGIN_PATH).into_response();
    }

    let user = refreshed.as_ref().map(|session| session.user.clone());
    request.extensions_mut().insert(GateUser(user));

    let mut response = next.run(request).await;
    // The provider rotated the token, so the fresh one must always reach
    // the client or the session dies with the old token.
    attach_session_cookie(&mut response, &gate, refreshed.as_ref());
    response
}

fn attach_session_cookie(
    response: &mut Response,
    gate: &GateState,
    refreshed: Option<&RefreshedSession>,
) {
    let Some(session) = refreshed else {
        return;
    };
    let value = cookie::set_session(&gate.cookie_name, &session.token, gate.session_ttl_secs);
    match HeaderValue::from_str(&value) {
        Ok(value) => {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
        Err(err) => {
            tracing::warn!(error = %err, "refreshed session cookie was not header-safe");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Extension, Router};
    use markhub_auth::memory::MemorySessions;
    use tower::ServiceExt;

    fn test_user() -> AuthUser {
        AuthUser {
            id: "user-1".into(),
            email: "ada@example.com".into(),
            name: Some("Ada".into()),
        }
    }

    fn gated_router(provider: Arc<MemorySessions>) -> Router {
        let gate = Arc::new(GateState {
            provider,
            cookie_name: "markhub_session".into(),
            session_ttl_secs: 3600,
        });
        Router::new()
            .route(ROOT_PATH, get(|| async { "root" }))
            .route(LOGIN_PATH, get(|| async { "login" }))
            .route(CALLBACK_PATH, get(|| async { "callback" }))
            .route(
                DASHBOARD_PATH,
                get(|Extension(GateUser(user)): Extension<GateUser>| async move {
                    user.map(|u| u.display_name().to_string())
                        .unwrap_or_default()
                }),
            )
            .layer(middleware::from_fn_with_state(gate, session_gate))
    }

    fn request(path: &str, cookie: Option<&str>) -> axum::http::Request<Body> {
        let mut builder = axum::http::Request::builder().uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn anonymous_dashboard_redirects_to_login() {
        let router = gated_router(Arc::new(MemorySessions::new()));
        let response = router.oneshot(request(DASHBOARD_PATH, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            LOGIN_PATH
        );
    }

    #[tokio::test]
    async fn authenticated_login_redirects_to_dashboard() {
        let provider = Arc::new(MemorySessions::new());
        let token = provider.issue_session(test_user());
        let router = gated_router(provider);

        let cookie = format!("markhub_session={token}");
        let response = router
            .oneshot(request(LOGIN_PATH, Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            DASHBOARD_PATH
        );
        // The rotated token rides along on the redirect.
        assert!(response.headers().contains_key(header::SET_COOKIE));
    }

    #[tokio::test]
    async fn callback_passes_through_even_when_authenticated() {
        let provider = Arc::new(MemorySessions::new());
        let token = provider.issue_session(test_user());
        let router = gated_router(provider);

        let cookie = format!("markhub_session={token}");
        let response = router
            .oneshot(request(CALLBACK_PATH, Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        // Untouched: no cookie rewrite on the callback path.
        assert!(!response.headers().contains_key(header::SET_COOKIE));
    }

    #[tokio::test]
    async fn dashboard_pass_through_rotates_the_cookie() {
        let provider = Arc::new(MemorySessions::new());
        let token = provider.issue_session(test_user());
        let router = gated_router(provider);

        let cookie = format!("markhub_session={token}");
        let response = router
            .oneshot(request(DASHBOARD_PATH, Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.starts_with("markhub_session="));
        assert!(!set_cookie.contains(&token));
    }

    #[tokio::test]
    async fn stale_token_is_treated_as_no_user() {
        let router = gated_router(Arc::new(MemorySessions::new()));
        let response = router
            .oneshot(request(
                DASHBOARD_PATH,
                Some("markhub_session=long-dead-token"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            LOGIN_PATH
        );
    }

    #[tokio::test]
    async fn root_passes_through_for_anonymous_users() {
        let router = gated_router(Arc::new(MemorySessions::new()));
        let response = router.oneshot(request(ROOT_PATH, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
