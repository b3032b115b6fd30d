//! In-memory session provider for local runs and tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{AuthUser, RefreshedSession, SessionProvider};

/// Process-local session provider.
///
/// Tokens rotate on every refresh: the old token is dropped and the
/// session is re-keyed under a fresh one, mirroring the managed
/// provider's behavior.
#[derive(Default)]
pub struct MemorySessions {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    sessions: HashMap<String, AuthUser>,
    codes: HashMap<String, AuthUser>,
}

impl MemorySessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a live session, returning its token. Intended for tests and
    /// local bootstrap.
    pub fn issue_session(&self, user: AuthUser) -> String {
        let token = Uuid::now_v7().to_string();
        let mut inner = self.inner.lock().expect("session lock poisoned");
        inner.sessions.insert(token.clone(), user);
        token
    }

    /// Register a one-shot auth code redeemable for a session.
    pub fn issue_code(&self, code: impl Into<String>, user: AuthUser) {
        let mut inner = self.inner.lock().expect("session lock poisoned");
        inner.codes.insert(code.into(), user);
    }
}

#[async_trait]
impl SessionProvider for MemorySessions {
    async fn current_user(&self, token: &str) -> anyhow::Result<Option<AuthUser>> {
        let inner = self.inner.lock().expect("session lock poisoned");
        Ok(inner.sessions.get(token).cloned())
    }

    async fn refresh(&self, token: &str) -> anyhow::Result<Option<RefreshedSession>> {
        let mut inner = self.inner.lock().expect("session lock poisoned");
        let Some(user) = inner.sessions.remove(token) else {
            return Ok(None);
        };
        let rotated = Uuid::now_v7().to_string();
        inner.sessions.insert(rotated.clone(), user.clone());
        Ok(Some(RefreshedSession {
            token: rotated,
            user,
        }))
    }

    async fn exchange_code(&self, code: &str) -> anyhow::Result<Option<RefreshedSession>> {
        let mut inner = self.inner.lock().expect("session lock poisoned");
        let Some(user) = inner.codes.remove(code) else {
            return Ok(None);
        };
        let token = Uuid::now_v7().to_string();
        inner.sessions.insert(token.clone(), user.clone());
        Ok(Some(RefreshedSession { token, user }))
    }

    async fn sign_out(&self, token: &str) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().expect("session lock poisoned");
        inner.sessions.remove(token);
        Ok(())
    }
}
