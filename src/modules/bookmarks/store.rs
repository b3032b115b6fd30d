//! Scoped queries against the bookmarks table.
//!
//! Every statement filters on the caller's `user_id` alongside any primary
//! key. That dual filter is the sole access-control mechanism: a row owned
//! by someone else simply never matches.

use sqlx::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::models::{Bookmark, NewBookmark};

/// Request-scoped adapter over the shared pool.
pub struct BookmarkStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BookmarkStore<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a bookmark owned by `user_id` and return the stored row.
    pub async fn create(&self, user_id: &str, new: NewBookmark) -> sqlx::Result<Bookmark> {
        let id = Uuid::now_v7().to_string();
        let created_at = OffsetDateTime::now_utc();

        sqlx::query_as::<_, Bookmark>(
            r#"
            INSERT INTO bookmarks (id, user_id, title, url, category, is_favorite, created_at)
            VALUES (?, ?, ?, ?, ?, FALSE, ?)
            RETURNING id, user_id, title, url, category, is_favorite, created_at
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(&new.title)
        .bind(&new.url)
        .bind(new.category)
        .bind(created_at)
        .fetch_one(self.pool)
        .await
    }

    /// All bookmarks owned by `user_id`, newest first. The id tiebreak
    /// keeps ordering stable for rows created in the same instant.
    pub async fn list(&self, user_id: &str) -> sqlx::Result<Vec<Bookmark>> {
        sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT id, user_id, title, url, category, is_favorite, created_at
            FROM bookmarks
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await
    }

    /// Set the favorite flag on the row matching both id and owner.
    /// Returns the number of rows affected (0 or 1).
    pub async fn update_favorite(
        &self,
        user_id: &str,
        id: &str,
        is_favorite: bool,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query(
            "UPDATE bookmarks SET is_favorite = ? WHERE id = ? AND user_id = ?",
        )
        .bind(is_favorite)
        .bind(id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete the row matching both id and owner. Returns rows affected.
    pub async fn delete(&self, user_id: &str, id: &str) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
