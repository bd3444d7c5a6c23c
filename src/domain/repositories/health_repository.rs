// src/domain/repositories/health_repository.rs

use chrono::{DateTime, Utc};

use crate::domain::bookmark::Bookmark;
use crate::domain::error::DomainResult;
use crate::domain::health::{HealthSummary, LinkHealth};

/// Repository trait for per-bookmark link-health records
pub trait HealthRepository: std::fmt::Debug + Send + Sync {
    /// The health record of a bookmark, if one exists
    fn get_for_bookmark(&self, bookmark_id: i32) -> DomainResult<Option<LinkHealth>>;

    /// Insert or update the health record of a bookmark (one per bookmark),
    /// assigning its id on first insert
    fn upsert(&self, health: &mut LinkHealth) -> DomainResult<()>;

    /// Non-archived bookmarks that have never been checked, in stable id
    /// order. These take top scheduling priority.
    fn unchecked_bookmarks(&self, user_id: Option<i32>, limit: usize)
        -> DomainResult<Vec<Bookmark>>;

    /// Non-archived bookmarks whose recheck is due (`next_check` elapsed or
    /// status still pending), ordered broken-first then oldest-checked-first.
    fn due_bookmarks(
        &self,
        user_id: Option<i32>,
        now: DateTime<Utc>,
        limit: usize,
    ) -> DomainResult<Vec<Bookmark>>;

    /// Per-status counts plus the number of bookmarks without any record
    fn summary(&self, user_id: Option<i32>) -> DomainResult<HealthSummary>;
}
