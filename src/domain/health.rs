// src/domain/health.rs
use chrono::{DateTime, Utc};
use std::fmt;

use crate::domain::error::{DomainError, DomainResult};

/// Reachability classification of a bookmarked URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthStatus {
    /// Not yet probed (or probe requested after a URL change).
    Pending,
    /// Resolved at the original URL.
    Ok,
    /// Resolved, but at a different final URL.
    Redirected,
    /// HTTP error status or transport failure, no archive snapshot known.
    Broken,
    /// Broken, but a web-archive snapshot is available.
    Archived,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Pending => "pending",
            HealthStatus::Ok => "ok",
            HealthStatus::Redirected => "redirected",
            HealthStatus::Broken => "broken",
            HealthStatus::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> DomainResult<Self> {
        match value {
            "pending" => Ok(HealthStatus::Pending),
            "ok" => Ok(HealthStatus::Ok),
            "redirected" => Ok(HealthStatus::Redirected),
            "broken" => Ok(HealthStatus::Broken),
            "archived" => Ok(HealthStatus::Archived),
            other => Err(DomainError::Other(format!("Unknown health status: {}", other))),
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-bookmark link-health record (one-to-one with Bookmark).
#[derive(Debug, Clone, PartialEq)]
pub struct LinkHealth {
    pub id: Option<i32>,
    pub bookmark_id: i32,
    pub status: HealthStatus,
    pub last_checked: Option<DateTime<Utc>>,
    pub next_check: Option<DateTime<Utc>>,
    pub final_url: Option<String>,
    pub status_code: Option<i32>,
    pub response_time_ms: Option<i32>,
    pub error_message: String,
    pub archive_url: Option<String>,
    pub check_count: i32,
}

impl LinkHealth {
    pub fn pending(bookmark_id: i32) -> Self {
        Self {
            id: None,
            bookmark_id,
            status: HealthStatus::Pending,
            last_checked: None,
            next_check: Some(Utc::now()),
            final_url: None,
            status_code: None,
            response_time_ms: None,
            error_message: String::new(),
            archive_url: None,
            check_count: 0,
        }
    }

    /// Record the outcome of a completed check.
    pub fn record_check(&mut self, outcome: HealthCheck, checked_at: DateTime<Utc>) {
        self.status = outcome.status;
        self.final_url = outcome.final_url;
        self.status_code = outcome.status_code;
        self.response_time_ms = outcome.response_time_ms;
        self.error_message = outcome.error.unwrap_or_default();
        self.archive_url = outcome.archive_url;
        self.last_checked = Some(checked_at);
        self.check_count += 1;
    }
}

/// Raw result of probing a URL, before archive fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub status: HealthStatus,
    pub status_code: Option<i32>,
    pub final_url: Option<String>,
    pub response_time_ms: Option<i32>,
    pub error: Option<String>,
}

/// Fully classified check result, including the archive fallback for broken
/// links.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthCheck {
    pub status: HealthStatus,
    pub status_code: Option<i32>,
    pub final_url: Option<String>,
    pub response_time_ms: Option<i32>,
    pub error: Option<String>,
    pub archive_url: Option<String>,
}

/// Tunable schedule for link rechecks.
///
/// Each status has a base interval; the interval grows by `growth_factor`
/// per completed check, capped at `max_interval_hours`. Pending records are
/// due immediately. The exact curve is configuration, not behavior other
/// code may rely on.
#[derive(Debug, Clone, PartialEq)]
pub struct RecheckPolicy {
    pub ok_interval_hours: i64,
    pub redirected_interval_hours: i64,
    pub broken_interval_hours: i64,
    pub growth_factor: f64,
    pub max_interval_hours: i64,
}

impl Default for RecheckPolicy {
    fn default() -> Self {
        Self {
            ok_interval_hours: 7 * 24,
            redirected_interval_hours: 3 * 24,
            broken_interval_hours: 24,
            growth_factor: 2.0,
            max_interval_hours: 30 * 24,
        }
    }
}

impl RecheckPolicy {
    /// Next eligible probe time after a check completed, given the new status
    /// and the total number of checks performed so far.
    pub fn next_check(
        &self,
        status: HealthStatus,
        check_count: i32,
        now: DateTime<Utc>,
    ) -> DateTime<Utc> {
        let base_hours = match status {
            HealthStatus::Pending => return now,
            HealthStatus::Ok => self.ok_interval_hours,
            HealthStatus::Redirected => self.redirected_interval_hours,
            HealthStatus::Broken | HealthStatus::Archived => self.broken_interval_hours,
        };

        // First check gets the base interval; growth exponent is capped so
        // the float math cannot overflow.
        let exponent = check_count.saturating_sub(1).clamp(0, 16);
        let hours = (base_hours as f64 * self.growth_factor.powi(exponent))
            .min(self.max_interval_hours as f64);

        now + chrono::Duration::hours(hours as i64)
    }
}

/// Per-status counts for a user's collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthSummary {
    pub ok: usize,
    pub redirected: usize,
    pub broken: usize,
    pub archived: usize,
    pub pending: usize,
    pub unchecked: usize,
}

impl HealthSummary {
    pub fn total_checked(&self) -> usize {
        self.ok + self.redirected + self.broken + self.archived + self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_status_variants_when_round_trip_then_stable() {
        for status in [
            HealthStatus::Pending,
            HealthStatus::Ok,
            HealthStatus::Redirected,
            HealthStatus::Broken,
            HealthStatus::Archived,
        ] {
            assert_eq!(HealthStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(HealthStatus::parse("unknown").is_err());
    }

    #[test]
    fn given_statuses_when_next_check_then_intervals_ordered_by_severity() {
        let policy = RecheckPolicy::default();
        let now = Utc::now();

        let ok = policy.next_check(HealthStatus::Ok, 1, now);
        let redirected = policy.next_check(HealthStatus::Redirected, 1, now);
        let broken = policy.next_check(HealthStatus::Broken, 1, now);

        assert!(broken < redirected);
        assert!(redirected < ok);
        assert_eq!(ok, now + chrono::Duration::hours(7 * 24));
    }

    #[test]
    fn given_repeated_checks_when_next_check_then_backoff_grows_to_cap() {
        let policy = RecheckPolicy::default();
        let now = Utc::now();

        let first = policy.next_check(HealthStatus::Broken, 1, now);
        let second = policy.next_check(HealthStatus::Broken, 2, now);
        let far_out = policy.next_check(HealthStatus::Broken, 50, now);

        assert_eq!(first, now + chrono::Duration::hours(24));
        assert_eq!(second, now + chrono::Duration::hours(48));
        assert_eq!(far_out, now + chrono::Duration::hours(policy.max_interval_hours));
    }

    #[test]
    fn given_pending_status_when_next_check_then_due_immediately() {
        let policy = RecheckPolicy::default();
        let now = Utc::now();
        assert_eq!(policy.next_check(HealthStatus::Pending, 0, now), now);
    }

    #[test]
    fn given_check_outcome_when_record_then_fields_and_count_updated() {
        let mut health = LinkHealth::pending(7);
        let now = Utc::now();

        health.record_check(
            HealthCheck {
                status: HealthStatus::Redirected,
                status_code: Some(301),
                final_url: Some("https://new.example/x".to_string()),
                response_time_ms: Some(120),
                error: None,
                archive_url: None,
            },
            now,
        );

        assert_eq!(health.status, HealthStatus::Redirected);
        assert_eq!(health.last_checked, Some(now));
        assert_eq!(health.check_count, 1);
        assert_eq!(health.final_url.as_deref(), Some("https://new.example/x"));
        assert!(health.error_message.is_empty());
    }
}
