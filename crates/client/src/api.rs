//! Transport layer: the `BookmarkApi` trait and its reqwest-backed
//! implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bookmark as the API serves it. Category stays a plain string on the
/// client; filtering is exact label comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub title: String,
    pub url: String,
    pub category: String,
    #[serde(default)]
    pub is_favorite: bool,
    pub created_at: String,
}

/// Current user as reported by `/api/auth/user`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

impl UserInfo {
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

/// Body for the create request.
#[derive(Debug, Clone, Serialize)]
pub struct CreateBookmark {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Error)]
pub enum ApiClientError {
    /// The server rejected the session (401).
    #[error("unauthorized")]
    Unauthorized,
    /// Any other failure: transport trouble or a non-2xx response.
    #[error("{0}")]
    Request(String),
}

/// Transport surface the dashboard controller depends on.
#[async_trait]
pub trait BookmarkApi: Send + Sync {
    async fn current_user(&self) -> Result<UserInfo, ApiClientError>;
    async fn list(&self) -> Result<Vec<Bookmark>, ApiClientError>;
    async fn create(&self, new: &CreateBookmark) -> Result<Vec<Bookmark>, ApiClientError>;
    async fn update_favorite(&self, id: &str, is_favorite: bool) -> Result<(), ApiClientError>;
    async fn delete(&self, id: &str) -> Result<(), ApiClientError>;
    async fn sign_out(&self) -> Result<(), ApiClientError>;
}

/// HTTP transport against a running MarkHub server. Session cookies ride
/// in the client's cookie store.
pub struct HttpApi {
    base_url: String,
    http: reqwest::Client,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Map a response to our error taxonomy; the server's `{"error": ...}`
    /// body supplies the message when present.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiClientError::Unauthorized);
        }
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body["error"].as_str().map(str::to_owned))
            .unwrap_or_else(|| format!("request failed with status {status}"));
        Err(ApiClientError::Request(message))
    }
}

impl From<reqwest::Error> for ApiClientError {
    fn from(err: reqwest::Error) -> Self {
        ApiClientError::Request(err.to_string())
    }
}

#[async_trait]
impl BookmarkApi for HttpApi {
    async fn current_user(&self) -> Result<UserInfo, ApiClientError> {
        #[derive(Deserialize)]
        struct UserResponse {
            user: UserInfo,
        }

        let response = self.http.get(self.url("/api/auth/user")).send().await?;
        let body: UserResponse = Self::check(response).await?.json().await?;
        Ok(body.user)
    }

    async fn list(&self) -> Result<Vec<Bookmark>, ApiClientError> {
        let response = self.http.get(self.url("/api/bookmarks")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn create(&self, new: &CreateBookmark) -> Result<Vec<Bookmark>, ApiClientError> {
        let response = self
            .http
            .post(self.url("/api/bookmarks"))
            .json(new)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn update_favorite(&self, id: &str, is_favorite: bool) -> Result<(), ApiClientError> {
        let response = self
            .http
            .patch(self.url("/api/bookmarks"))
            .json(&serde_json::json!({ "id": id, "is_favorite": is_favorite }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), ApiClientError> {
        let response = self
            .http
            .delete(self.url("/api/bookmarks"))
            .json(&serde_json::json!({ "id": id }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), ApiClientError> {
        let response = self.http.post(self.url("/api/auth/signout")).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bookmark_tolerates_missing_favorite_flag() {
        let body = r#"{
            "id": "b1",
            "title": "Example",
            "url": "https://example.com",
            "category": "Other",
            "created_at": "2025-01-01T00:00:00Z"
        }"#;
        let bookmark: Bookmark = serde_json::from_str(body).unwrap();
        assert!(!bookmark.is_favorite);
    }

    #[test]
    fn create_body_omits_absent_category() {
        let new = CreateBookmark {
            title: "t".into(),
            url: "u".into(),
            category: None,
        };
        let body = serde_json::to_value(&new).unwrap();
        assert!(body.get("category").is_none());
    }

    #[test]
    fn display_name_fallback_chain() {
        let with_name = UserInfo {
            id: "u1".into(),
            email: "ada@example.com".into(),
            name: Some("Ada".into()),
        };
        assert_eq!(with_name.display_name(), "Ada");

        let email_only = UserInfo {
            id: "u1".into(),
            email: "ada@example.com".into(),
            name: None,
        };
        assert_eq!(email_only.display_name(), "ada");
    }
}
