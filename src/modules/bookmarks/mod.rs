pub mod models;
pub mod routes;
pub mod store;

use async_trait::async_trait;
use axum::Router;
use markhub_kernel::{InitCtx, Migration, Module};
use serde_json::json;

use crate::state::AppState;

/// Schema for the bookmarks table. Scoping index covers the list query
/// (owner filter + newest-first order).
pub const BOOKMARKS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS bookmarks (
    id          TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL,
    title       TEXT NOT NULL CHECK (title <> ''),
    url         TEXT NOT NULL CHECK (url <> ''),
    category    TEXT NOT NULL DEFAULT 'Other',
    is_favorite BOOLEAN NOT NULL DEFAULT FALSE,
    created_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS bookmarks_user_created
    ON bookmarks (user_id, created_at DESC);
"#;

/// Bookmarks module: CRUD over the user's saved URLs.
pub struct BookmarksModule {
    state: AppState,
}

impl BookmarksModule {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for BookmarksModule {
    fn name(&self) -> &'static str {
        "bookmarks"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "bookmarks module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "post": {
                        "summary": "Create a bookmark",
                        "tags": ["Bookmarks"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CreateBookmark" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Created record",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Bookmark" }
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "Missing fields or storage error",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
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
                    },
                    "get": {
                        "summary": "List the caller's bookmarks, newest first",
                        "tags": ["Bookmarks"],
                        "responses": {
                            "200": {
                                "description": "Bookmarks",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Bookmark" }
                                        }
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
                    },
                    "patch": {
                        "summary": "Set the favorite flag on an owned bookmark",
                        "tags": ["Bookmarks"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/UpdateFavorite" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Updated",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/SuccessResponse" }
                                    }
                                }
                            },
                            "404": {
                                "description": "No owned row matched",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "delete": {
                        "summary": "Delete an owned bookmark",
                        "tags": ["Bookmarks"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/DeleteBookmark" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Deleted",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/SuccessResponse" }
                                    }
                                }
                            },
                            "404": {
                                "description": "No owned row matched",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Bookmark": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "user_id": { "type": "string" },
                            "title": { "type": "string" },
                            "url": { "type": "string" },
                            "category": {
                                "type": "string",
                                "enum": ["Work", "Personal", "Reading", "Shopping", "Social", "Favorites", "Other"]
                            },
                            "is_favorite": { "type": "boolean" },
                            "created_at": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "user_id", "title", "url", "category", "is_favorite", "created_at"]
                    },
                    "CreateBookmark": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "url": { "type": "string" },
                            "category": {
                                "type": "string",
                                "enum": ["Work", "Personal", "Reading", "Shopping", "Social", "Favorites", "Other"]
                            }
                        },
                        "required": ["title", "url"]
                    },
                    "UpdateFavorite": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "is_favorite": { "type": "boolean" }
                        },
                        "required": ["id", "is_favorite"]
                    },
                    "DeleteBookmark": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" }
                        },
                        "required": ["id"]
                    },
                    "SuccessResponse": {
                        "type": "object",
                        "properties": {
                            "success": { "type": "boolean" }
                        },
                        "required": ["success"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: BOOKMARKS_SCHEMA,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "bookmarks module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "bookmarks module stopped");
        Ok(())
    }
}

/// Create a new instance of the bookmarks module
pub fn create_module(state: AppState) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BookmarksModule::new(state))
}
