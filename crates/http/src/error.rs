//! Error handling for the MarkHub HTTP layer.
//!
//! Every non-2xx response carries the body `{"error": "<message>"}`.
//! Validation and auth failures short-circuit before storage is touched;
//! unexpected errors are logged in full and surfaced as a generic 500.

use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("storage error: {message}")]
    Storage { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a storage error carrying the driver's message
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::Validation { message } => (StatusCode::BAD_REQUEST, message),
            ApiError::Storage { message } => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            ApiError::Internal(err) => {
                // Full detail stays in the log; the client gets a generic message.
                tracing::error!(error = %err, "unhandled request error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        if status != StatusCode::INTERNAL_SERVER_ERROR {
            tracing::debug!(status = %status.as_u16(), %message, "request error");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Convenience alias for handler results.
pub type ApiResult<T> = Result<T, ApiError>;

/// JSON body extractor with a deterministic rejection.
///
/// Bodies are held to a typed contract: unknown or mistyped fields fail
/// deserialization and come back as 400 "Invalid request body" instead of
/// the framework's default rejection shape.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidJson(value)),
            Err(rejection) => {
                tracing::debug!(%rejection, "request body rejected");
                Err(ApiError::validation("Invalid request body"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unauthorized_maps_to_401_with_contract_body() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await, json!({ "error": "Unauthorized" }));
    }

    #[tokio::test]
    async fn validation_maps_to_400() {
        let response = ApiError::validation("Missing required fields").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Missing required fields" })
        );
    }

    #[tokio::test]
    async fn storage_errors_surface_their_message() {
        let response = ApiError::storage("UNIQUE constraint failed").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "UNIQUE constraint failed" })
        );
    }

    #[tokio::test]
    async fn internal_errors_never_leak_detail() {
        let err = ApiError::Internal(anyhow::anyhow!("database connection string was ..."));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Internal server error" })
        );
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let response = ApiError::not_found("Bookmark not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
