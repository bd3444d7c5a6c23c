// src/application/services/health_service.rs
use crate::application::error::ApplicationResult;
use crate::domain::bookmark::Bookmark;
use crate::domain::health::{HealthCheck, HealthSummary, LinkHealth};

/// Link-health checking and scheduling over a bookmark collection.
pub trait HealthService: Send + Sync {
    /// Probe a single URL and classify it, including the web-archive
    /// fallback for broken links. Never fails; network trouble classifies
    /// as broken.
    fn check_url(&self, url: &str) -> HealthCheck;

    /// Check one stored bookmark and update its health record.
    fn process_bookmark(&self, bookmark: &Bookmark) -> ApplicationResult<LinkHealth>;

    /// Bookmarks eligible for checking: never-checked first, then records
    /// whose recheck is due, broken-first and oldest-checked-first.
    fn select_due(&self, user_id: Option<i32>, limit: usize) -> ApplicationResult<Vec<Bookmark>>;

    /// Probe a batch of due bookmarks on a bounded worker pool. Each
    /// bookmark's record is updated at most once per invocation; ordering
    /// between bookmarks is unspecified.
    fn run_batch(&self, user_id: Option<i32>, limit: usize) -> ApplicationResult<Vec<LinkHealth>>;

    /// Per-status counts plus unchecked total.
    fn health_summary(&self, user_id: Option<i32>) -> ApplicationResult<HealthSummary>;

    /// Rewrite a redirected bookmark's URL to its final location, reset its
    /// health to ok and log the repair.
    fn apply_redirect(&self, bookmark_id: i32) -> ApplicationResult<Bookmark>;
}
