use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::json;

use markhub_http::error::{ApiError, ApiResult, ValidJson};

use super::models::{CreateBookmarkRequest, DeleteBookmarkRequest, UpdateFavoriteRequest};
use super::store::BookmarkStore;
use crate::state::{AppState, CurrentUser};

/// Bookmark API: one path, four methods, mirroring the client contract.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            post(create).get(list).patch(update_favorite).delete(remove),
        )
        .with_state(state)
}

/// `POST /api/bookmarks` — create a bookmark owned by the caller.
///
/// Responds 201 with an array holding the created record. The owner is
/// always the session user; the body has no say in it.
async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(body): ValidJson<CreateBookmarkRequest>,
) -> ApiResult<impl IntoResponse> {
    let new = body
        .validate()
        .ok_or_else(|| ApiError::validation("Missing required fields"))?;

    let store = BookmarkStore::new(&state.db);
    let bookmark = store
        .create(&user.id, new)
        .await
        .map_err(|err| ApiError::storage(err.to_string()))?;

    tracing::debug!(user = %user.id, bookmark = %bookmark.id, "bookmark created");
    Ok((StatusCode::CREATED, Json(vec![bookmark])))
}

/// `GET /api/bookmarks` — the caller's bookmarks, newest first.
async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<impl IntoResponse> {
    let store = BookmarkStore::new(&state.db);
    let bookmarks = store
        .list(&user.id)
        .await
        .map_err(|err| ApiError::storage(err.to_string()))?;

    Ok(Json(bookmarks))
}

/// `PATCH /api/bookmarks` — set the favorite flag on an owned bookmark.
async fn update_favorite(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(body): ValidJson<UpdateFavoriteRequest>,
) -> ApiResult<impl IntoResponse> {
    let (Some(id), Some(is_favorite)) = (body.id, body.is_favorite) else {
        return Err(ApiError::validation("Missing required fields"));
    };

    let store = BookmarkStore::new(&state.db);
    let affected = store
        .update_favorite(&user.id, &id, is_favorite)
        .await
        .map_err(|err| ApiError::storage(err.to_string()))?;

    // Zero rows means not-found-or-not-owned; the scoped filter does not
    // distinguish the two and neither do we.
    if affected == 0 {
        return Err(ApiError::not_found("Bookmark not found"));
    }

    Ok(Json(json!({ "success": true })))
}

/// `DELETE /api/bookmarks` — delete an owned bookmark.
async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(body): ValidJson<DeleteBookmarkRequest>,
) -> ApiResult<impl IntoResponse> {
    let id = body
        .id
        .ok_or_else(|| ApiError::validation("Missing required fields"))?;

    let store = BookmarkStore::new(&state.db);
    let affected = store
        .delete(&user.id, &id)
        .await
        .map_err(|err| ApiError::storage(err.to_string()))?;

    if affected == 0 {
        return Err(ApiError::not_found("Bookmark not found"));
    }

    tracing::debug!(user = %user.id, bookmark = %id, "bookmark deleted");
    Ok(Json(json!({ "success": true })))
}
