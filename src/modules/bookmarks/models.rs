use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Fixed category label set. Stored as TEXT; serialized verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
pub enum Category {
    Work,
    Personal,
    Reading,
    Shopping,
    Social,
    Favorites,
    #[default]
    Other,
}

/// A saved URL record, owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bookmark {
    /// Unique identifier (UUIDv7), never reused
    pub id: String,
    /// Owning user; set from the session at creation, immutable
    pub user_id: String,
    pub title: String,
    pub url: String,
    pub category: Category,
    /// The only mutable field
    pub is_favorite: bool,
    /// Server-assigned creation timestamp, immutable
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Validated input for the create operation.
#[derive(Debug, Clone)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    pub category: Category,
}

/// Request body for `POST /api/bookmarks`.
///
/// Required fields are `Option` so presence is checked explicitly and
/// missing ones get the contract's "Missing required fields" message;
/// unknown fields are rejected outright.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateBookmarkRequest {
    pub title: Option<String>,
    pub url: Option<String>,
    pub category: Option<Category>,
}

impl CreateBookmarkRequest {
    /// Presence check for required fields; `category` defaults to `Other`.
    pub fn validate(self) -> Option<NewBookmark> {
        let title = self.title.filter(|t| !t.is_empty())?;
        let url = self.url.filter(|u| !u.is_empty())?;
        Some(NewBookmark {
            title,
            url,
            category: self.category.unwrap_or_default(),
        })
    }
}

/// Request body for `PATCH /api/bookmarks`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateFavoriteRequest {
    pub id: Option<String>,
    pub is_favorite: Option<bool>,
}

/// Request body for `DELETE /api/bookmarks`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteBookmarkRequest {
    pub id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_defaults_to_other() {
        let request = CreateBookmarkRequest {
            title: Some("Example".into()),
            url: Some("https://example.com".into()),
            category: None,
        };
        let new = request.validate().unwrap();
        assert_eq!(new.category, Category::Other);
    }

    #[test]
    fn missing_title_fails_validation() {
        let request = CreateBookmarkRequest {
            title: None,
            url: Some("https://example.com".into()),
            category: None,
        };
        assert!(request.validate().is_none());
    }

    #[test]
    fn empty_url_fails_validation() {
        let request = CreateBookmarkRequest {
            title: Some("Example".into()),
            url: Some("".into()),
            category: None,
        };
        assert!(request.validate().is_none());
    }

    #[test]
    fn body_supplied_user_id_is_rejected() {
        // Ownership cannot be spoofed: the contract has no user_id field
        // and unknown fields fail deserialization.
        let body = r#"{"title":"t","url":"u","user_id":"someone-else"}"#;
        let parsed: Result<CreateBookmarkRequest, _> = serde_json::from_str(body);
        assert!(parsed.is_err());
    }

    #[test]
    fn category_labels_serialize_verbatim() {
        assert_eq!(
            serde_json::to_string(&Category::Reading).unwrap(),
            "\"Reading\""
        );
        let parsed: Category = serde_json::from_str("\"Work\"").unwrap();
        assert_eq!(parsed, Category::Work);
    }
}
