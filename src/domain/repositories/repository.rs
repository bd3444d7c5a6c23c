// src/domain/repositories/repository.rs

use crate::domain::activity::{ActivityType, BookmarkActivity};
use crate::domain::bookmark::Bookmark;
use crate::domain::error::DomainResult;
use crate::domain::note::BookmarkNote;

/*
   Repository Interface
   The BookmarkRepository interface follows the repository pattern to separate domain models from data access:

   Domain-Centric: Methods speak in domain terms, not persistence terms
   Abstraction: Hides data access details behind a clean interface
   Testability: Easy to create mock implementations for testing
   Flexibility: Allows switching persistence mechanisms without changing domain code
*/
/// Repository trait for bookmark persistence operations
pub trait BookmarkRepository: std::fmt::Debug + Send + Sync {
    /// Get a bookmark by its ID
    fn get_by_id(&self, id: i32) -> DomainResult<Option<Bookmark>>;

    /// Get a user's bookmark by its raw URL
    fn get_by_url(&self, user_id: i32, url: &str) -> DomainResult<Option<Bookmark>>;

    /// Get all bookmarks of a user, in stable id order
    fn get_all_for_user(&self, user_id: i32) -> DomainResult<Vec<Bookmark>>;

    /// Get a user's non-archived bookmarks, in stable id order.
    /// This is the candidate set for duplicate detection.
    fn get_active_for_user(&self, user_id: i32) -> DomainResult<Vec<Bookmark>>;

    /// Add a new bookmark, assigning its id
    fn add(&self, bookmark: &mut Bookmark) -> DomainResult<()>;

    /// Update an existing bookmark
    fn update(&self, bookmark: &Bookmark) -> DomainResult<()>;

    /// Delete a bookmark by ID, cascading to notes, activities and health
    fn delete(&self, id: i32) -> DomainResult<bool>;

    /// The currently active note of a bookmark, if any
    fn get_active_note(&self, bookmark_id: i32) -> DomainResult<Option<BookmarkNote>>;

    /// All note revisions of a bookmark, newest first
    fn get_notes(&self, bookmark_id: i32) -> DomainResult<Vec<BookmarkNote>>;

    /// Insert a note revision, assigning its id
    fn add_note(&self, note: &mut BookmarkNote) -> DomainResult<()>;

    /// Persist the reconciled primary of a merge as one atomic unit:
    /// the bookmark row, the retirement of its superseded active note, and
    /// the adoption of the winning note all commit or roll back together.
    fn apply_merge(
        &self,
        primary: &Bookmark,
        retired_note_id: Option<i32>,
        adopted_note: Option<&BookmarkNote>,
    ) -> DomainResult<()>;

    /// Append an entry to the activity log
    fn append_activity(&self, activity: &BookmarkActivity) -> DomainResult<()>;

    /// Activity entries for a bookmark, optionally filtered by type,
    /// newest first
    fn get_activities(
        &self,
        bookmark_id: i32,
        activity_type: Option<ActivityType>,
    ) -> DomainResult<Vec<BookmarkActivity>>;
}
