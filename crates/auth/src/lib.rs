//! Session provider seam for MarkHub.
//!
//! The real identity backend is an external managed service. This crate
//! defines the narrow surface the application needs from it (resolve a
//! session token to a user, rotate the token, sign out) plus the cookie
//! plumbing shared by the session gate and the API handlers. An in-memory
//! provider backs local runs and tests.

pub mod cookie;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Authenticated user as reported by the session provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

impl AuthUser {
    /// Display name for greetings: explicit name, else the email local
    /// part, else "User".
    pub fn display_name(&self) -> &str {
        if let Some(name) = self.name.as_deref() {
            if !name.is_empty() {
                return name;
            }
        }
        match self.email.split('@').next() {
            Some(local) if !local.is_empty() => local,
            _ => "User",
        }
    }
}

/// A session token freshly rotated by the provider.
#[derive(Debug, Clone)]
pub struct RefreshedSession {
    pub token: String,
    pub user: AuthUser,
}

/// External auth/session provider surface.
///
/// A failed refresh is reported as `Ok(None)` and treated as "no user";
/// `Err` is reserved for transport-level failures.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Resolve the user behind a session token, if the token is live.
    async fn current_user(&self, token: &str) -> anyhow::Result<Option<AuthUser>>;

    /// Validate and rotate a session token, keeping the session alive.
    async fn refresh(&self, token: &str) -> anyhow::Result<Option<RefreshedSession>>;

    /// Exchange an auth-callback code for a session token.
    async fn exchange_code(&self, code: &str) -> anyhow::Result<Option<RefreshedSession>>;

    /// Invalidate a session token.
    async fn sign_out(&self, token: &str) -> anyhow::Result<()>;
}
