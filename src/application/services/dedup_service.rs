// src/application/services/dedup_service.rs
use crate::application::error::ApplicationResult;
use crate::domain::duplicate::DuplicateGroup;

/// Read-only duplicate detection over a user's active bookmarks.
pub trait DedupService: Send + Sync {
    /// Groups of bookmarks considered the same logical resource, URL-based
    /// groups first. Groups are disjoint and every group has at least two
    /// members, all non-archived and owned by the given user.
    fn detect_duplicates(&self, user_id: i32) -> ApplicationResult<Vec<DuplicateGroup>>;
}
