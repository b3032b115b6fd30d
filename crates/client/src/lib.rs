//! Headless client for the MarkHub API.
//!
//! `Dashboard` keeps the in-memory bookmark list, the derived filtered
//! view, and the optimistic mutation flow; `BookmarkApi` abstracts the
//! transport so the controller is testable without a server.

pub mod api;
pub mod dashboard;

pub use api::{ApiClientError, Bookmark, BookmarkApi, CreateBookmark, HttpApi, UserInfo};
pub use dashboard::{CategoryFilter, Dashboard, RefreshOutcome, ALL_BOOKMARKS};
