// src/application/services/search_service.rs
use crate::application::error::ApplicationResult;
use crate::domain::bookmark::Bookmark;

/// Free-text bookmark search with the filter mini-language
/// (`tag:… domain:… unread:… favorite:… archived:… after:… before:…`).
pub trait SearchService: Send + Sync {
    /// Matching bookmarks of a user, ranked by relevance then recency.
    fn search(&self, user_id: i32, query: &str) -> ApplicationResult<Vec<Bookmark>>;
}
