// src/application/services/merge_service.rs
use serde::Serialize;

use crate::application::error::ApplicationResult;
use crate::domain::bookmark::Bookmark;

/// A duplicate that could not be cleaned up after the primary was merged.
#[derive(Debug, Clone, Serialize)]
pub struct MergeFailure {
    pub bookmark_id: i32,
    pub reason: String,
}

/// Result of a merge: the surviving bookmark plus the per-duplicate cleanup
/// outcome. Cleanup is best-effort, so callers can observe partial results
/// instead of digging through logs.
#[derive(Debug)]
pub struct MergeOutcome {
    pub bookmark: Bookmark,
    pub merged: Vec<i32>,
    pub failed: Vec<MergeFailure>,
}

/// Combines duplicate bookmarks into a chosen primary.
pub trait MergeService: Send + Sync {
    /// Merge the given duplicates into the primary bookmark.
    ///
    /// Validation failures (unknown ids, empty duplicate set after removing
    /// the primary itself, records owned by different users) abort before any
    /// mutation. Field reconciliation on the primary is atomic; the
    /// subsequent activity-log-and-delete pass over the duplicates is
    /// per-duplicate best-effort.
    fn merge(&self, primary_id: i32, duplicate_ids: &[i32]) -> ApplicationResult<MergeOutcome>;
}
