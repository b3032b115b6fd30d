//! Session endpoints consumed by the dashboard client: current user
//! lookup and sign-out.

use async_trait::async_trait;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use markhub_auth::cookie;
use markhub_http::error::{ApiError, ApiResult};
use markhub_kernel::{InitCtx, Module};
use serde_json::json;

use crate::state::{AppState, CurrentUser};

pub struct AuthModule {
    state: AppState,
}

impl AuthModule {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for AuthModule {
    fn name(&self) -> &'static str {
        "auth"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "auth module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/user", get(current_user))
            .route("/signout", post(sign_out))
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/user": {
                    "get": {
                        "summary": "Current session user",
                        "tags": ["Auth"],
                        "responses": {
                            "200": {
                                "description": "User behind the session cookie",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/UserResponse" }
                                    }
                                }
                            },
                            "401": {
                                "description": "No valid session",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/signout": {
                    "post": {
                        "summary": "Invalidate the session and clear the cookie",
                        "tags": ["Auth"],
                        "responses": {
                            "200": {
                                "description": "Signed out",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/SuccessResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "UserResponse": {
                        "type": "object",
                        "properties": {
                            "user": {
                                "type": "object",
                                "properties": {
                                    "id": { "type": "string" },
                                    "email": { "type": "string", "format": "email" },
                                    "name": { "type": "string" }
                                },
                                "required": ["id", "email"]
                            }
                        },
                        "required": ["user"]
                    }
                }
            }
        }))
    }
}

/// `GET /api/auth/user`
async fn current_user(CurrentUser(user): CurrentUser) -> ApiResult<impl IntoResponse> {
    Ok(Json(json!({ "user": user })))
}

/// `POST /api/auth/signout`
///
/// Succeeds whether or not a live session was attached; the cookie is
/// cleared either way.
async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let token = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| cookie::session_token(header, &state.cookie_name))
        .map(str::to_owned);

    if let Some(token) = token {
        state
            .auth
            .sign_out(&token)
            .await
            .map_err(ApiError::Internal)?;
    }

    let clear = cookie::clear_session(&state.cookie_name);
    Ok((
        [(header::SET_COOKIE, clear)],
        Json(json!({ "success": true })),
    ))
}

/// Create a new instance of the auth module
pub fn create_module(state: AppState) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(AuthModule::new(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use markhub_auth::memory::MemorySessions;
    use markhub_auth::{AuthUser, SessionProvider};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn harness() -> (Router, Arc<MemorySessions>) {
        let pool = sqlx::SqlitePool::connect("sqlite::memory:").await.unwrap();
        let sessions = Arc::new(MemorySessions::new());
        let state = AppState::new(pool, sessions.clone(), "markhub_session".to_string(), 3600);
        (AuthModule::new(state).routes(), sessions)
    }

    #[tokio::test]
    async fn user_endpoint_reports_the_session_user() {
        let (router, sessions) = harness().await;
        let token = sessions.issue_session(AuthUser {
            id: "user-1".into(),
            email: "ada@example.com".into(),
            name: Some("Ada".into()),
        });

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/user")
                    .header(header::COOKIE, format!("markhub_session={token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["user"]["email"], "ada@example.com");
        assert_eq!(body["user"]["name"], "Ada");
    }

    #[tokio::test]
    async fn user_endpoint_without_session_is_unauthorized() {
        let (router, _) = harness().await;
        let response = router
            .oneshot(Request::builder().uri("/user").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn signout_kills_the_session_and_clears_the_cookie() {
        let (router, sessions) = harness().await;
        let token = sessions.issue_session(AuthUser {
            id: "user-1".into(),
            email: "ada@example.com".into(),
            name: None,
        });

        let response = router
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/signout")
                    .header(header::COOKIE, format!("markhub_session={token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(set_cookie.contains("Max-Age=0"));
        assert!(sessions.current_user(&token).await.unwrap().is_none());
    }
}
