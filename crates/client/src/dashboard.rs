//! In-memory dashboard state: bookmark list, derived filtered view, and
//! two-phase optimistic mutations.

use crate::api::{ApiClientError, Bookmark, BookmarkApi, CreateBookmark};

/// Sentinel for the category dropdown's "show everything" entry.
pub const ALL_BOOKMARKS: &str = "All Bookmarks";

/// Category filter selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Parse a dropdown selection; the sentinel maps to `All`.
    pub fn from_selection(selection: &str) -> Self {
        if selection == ALL_BOOKMARKS {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(selection.to_string())
        }
    }

    fn matches(&self, bookmark: &Bookmark) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => bookmark.category == *category,
        }
    }
}

/// Outcome of a list refresh.
#[derive(Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    Ok,
    /// The session is gone; the caller should navigate to the login page.
    NeedsLogin,
}

/// Dashboard controller. Mutations apply locally first, then confirm with
/// the server; a failed request reverts to the pre-mutation snapshot and
/// leaves a user-visible error behind.
pub struct Dashboard<A> {
    api: A,
    user_name: String,
    bookmarks: Vec<Bookmark>,
    search: String,
    filter: CategoryFilter,
    last_error: Option<String>,
}

impl<A: BookmarkApi> Dashboard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            user_name: "User".to_string(),
            bookmarks: Vec::new(),
            search: String::new(),
            filter: CategoryFilter::All,
            last_error: None,
        }
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    /// Take the last surfaced error, clearing it.
    pub fn take_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
    }

    /// The visible set: case-insensitive substring match on title or url,
    /// AND the category filter.
    pub fn visible(&self) -> Vec<&Bookmark> {
        let needle = self.search.to_lowercase();
        self.bookmarks
            .iter()
            .filter(|bookmark| {
                let matches_search = needle.is_empty()
                    || bookmark.title.to_lowercase().contains(&needle)
                    || bookmark.url.to_lowercase().contains(&needle);
                matches_search && self.filter.matches(bookmark)
            })
            .collect()
    }

    /// Fetch the greeting name and the bookmark list. A 401 on the list
    /// fetch means the session is gone.
    pub async fn refresh(&mut self) -> RefreshOutcome {
        // Greeting fetch failures are only logged; the list is what matters.
        match self.api.current_user().await {
            Ok(user) => self.user_name = user.display_name().to_string(),
            Err(err) => tracing::debug!(error = %err, "user fetch failed"),
        }

        match self.api.list().await {
            Ok(bookmarks) => {
                self.bookmarks = bookmarks;
                RefreshOutcome::Ok
            }
            Err(ApiClientError::Unauthorized) => RefreshOutcome::NeedsLogin,
            Err(err) => {
                self.last_error = Some(err.to_string());
                RefreshOutcome::Ok
            }
        }
    }

    /// Two-phase favorite toggle: flip locally, confirm with the server,
    /// revert on failure.
    pub async fn toggle_favorite(&mut self, id: &str) {
        let Some(index) = self.bookmarks.iter().position(|b| b.id == id) else {
            return;
        };
        let previous = self.bookmarks[index].is_favorite;
        let pending = !previous;
        self.bookmarks[index].is_favorite = pending;

        if let Err(err) = self.api.update_favorite(id, pending).await {
            if let Some(bookmark) = self.bookmarks.iter_mut().find(|b| b.id == id) {
                bookmark.is_favorite = previous;
            }
            self.last_error = Some(format!("Could not update favorite: {err}"));
        }
    }

    /// Two-phase delete: remove locally, confirm, restore on failure.
    pub async fn delete(&mut self, id: &str) {
        let Some(index) = self.bookmarks.iter().position(|b| b.id == id) else {
            return;
        };
        let removed = self.bookmarks.remove(index);

        if let Err(err) = self.api.delete(id).await {
            self.bookmarks.insert(index.min(self.bookmarks.len()), removed);
            self.last_error = Some(format!("Could not delete bookmark: {err}"));
        }
    }

    /// Create a bookmark, then re-fetch the whole list (no local merge).
    pub async fn add(&mut self, new: CreateBookmark) -> Result<(), ApiClientError> {
        self.api.create(&new).await?;
        if let Ok(bookmarks) = self.api.list().await {
            self.bookmarks = bookmarks;
        }
        Ok(())
    }

    /// End the session; the caller navigates to login afterwards.
    pub async fn sign_out(&mut self) {
        if let Err(err) = self.api.sign_out().await {
            tracing::debug!(error = %err, "sign out failed");
        }
    }
}
