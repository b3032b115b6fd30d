//! Page shells behind the session gate.
//!
//! Markup is deliberately bare; the real presentation lives client-side.
//! These handlers exist so navigation has endpoints for the gate's
//! decision table to act on.

use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect},
    routing::get,
    Extension, Router,
};
use markhub_auth::cookie;
use markhub_http::gate::{GateUser, CALLBACK_PATH, DASHBOARD_PATH, LOGIN_PATH, ROOT_PATH};
use markhub_kernel::{InitCtx, Module};
use serde::Deserialize;

use crate::state::AppState;

pub struct PagesModule {
    state: AppState,
}

impl PagesModule {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for PagesModule {
    fn name(&self) -> &'static str {
        "pages"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "pages module initialized"
        );
        Ok(())
    }

    fn pages(&self) -> Router {
        Router::new()
            .route(ROOT_PATH, get(root))
            .route(LOGIN_PATH, get(login))
            .route(CALLBACK_PATH, get(callback))
            .route(DASHBOARD_PATH, get(dashboard))
            .with_state(self.state.clone())
    }
}

/// Root page: sends the visitor wherever their auth state says.
async fn root(Extension(GateUser(user)): Extension<GateUser>) -> Redirect {
    if user.is_some() {
        Redirect::to(DASHBOARD_PATH)
    } else {
        Redirect::to(LOGIN_PATH)
    }
}

async fn login() -> Html<&'static str> {
    Html(
        "<!doctype html><html><head><title>MarkHub — Sign in</title></head>\
         <body><h1>MarkHub</h1><p>Sign in to manage your bookmarks.</p></body></html>",
    )
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
}

/// Auth callback: exchanges the provider code for a session and sets the
/// cookie. A missing or stale code lands back on the login page.
async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> impl IntoResponse {
    let Some(code) = query.code else {
        return Redirect::to(LOGIN_PATH).into_response();
    };

    let session = match state.auth.exchange_code(&code).await {
        Ok(session) => session,
        Err(err) => {
            tracing::warn!(error = %err, "auth code exchange failed");
            None
        }
    };

    match session {
        Some(session) => {
            let value =
                cookie::set_session(&state.cookie_name, &session.token, state.session_ttl_secs);
            (
                [(header::SET_COOKIE, value)],
                Redirect::to(DASHBOARD_PATH),
            )
                .into_response()
        }
        None => Redirect::to(LOGIN_PATH).into_response(),
    }
}

/// Dashboard shell. The gate has already turned anonymous visitors away.
async fn dashboard(Extension(GateUser(user)): Extension<GateUser>) -> Html<String> {
    let name = user
        .as_ref()
        .map(|u| u.display_name().to_string())
        .unwrap_or_else(|| "User".to_string());
    Html(format!(
        "<!doctype html><html><head><title>MarkHub</title></head>\
         <body><h1>MarkHub</h1><p>Hi, {name}</p><div id=\"app\"></div></body></html>"
    ))
}

/// Create a new instance of the pages module
pub fn create_module(state: AppState) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(PagesModule::new(state))
}
