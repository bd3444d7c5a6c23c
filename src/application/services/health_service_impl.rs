// src/application/services/health_service_impl.rs
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde_json::json;
use tracing::{debug, instrument, warn};

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::health_service::HealthService;
use crate::domain::activity::{ActivityType, BookmarkActivity};
use crate::domain::bookmark::Bookmark;
use crate::domain::health::{
    HealthCheck, HealthStatus, HealthSummary, LinkHealth, RecheckPolicy,
};
use crate::domain::repositories::health_repository::HealthRepository;
use crate::domain::repositories::repository::BookmarkRepository;
use crate::domain::services::link_prober::LinkProber;

pub struct HealthServiceImpl<R: BookmarkRepository, H: HealthRepository> {
    repository: Arc<R>,
    health_repository: Arc<H>,
    prober: Arc<dyn LinkProber>,
    policy: RecheckPolicy,
    max_workers: usize,
}

impl<R: BookmarkRepository, H: HealthRepository> HealthServiceImpl<R, H> {
    pub fn new(
        repository: Arc<R>,
        health_repository: Arc<H>,
        prober: Arc<dyn LinkProber>,
        policy: RecheckPolicy,
        max_workers: usize,
    ) -> Self {
        Self {
            repository,
            health_repository,
            prober,
            policy,
            max_workers: max_workers.max(1),
        }
    }
}

impl<R: BookmarkRepository, H: HealthRepository> std::fmt::Debug for HealthServiceImpl<R, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthServiceImpl")
            .field("policy", &self.policy)
            .field("max_workers", &self.max_workers)
            .finish()
    }
}

impl<R: BookmarkRepository, H: HealthRepository> HealthService for HealthServiceImpl<R, H> {
    #[instrument(skip(self), level = "debug")]
    fn check_url(&self, url: &str) -> HealthCheck {
        let probe = self.prober.probe(url);
        let mut check = HealthCheck {
            status: probe.status,
            status_code: probe.status_code,
            final_url: probe.final_url,
            response_time_ms: probe.response_time_ms,
            error: probe.error,
            archive_url: None,
        };

        // Broken links get one shot at an archived snapshot.
        if check.status == HealthStatus::Broken {
            if let Some(archive_url) = self.prober.find_archive_snapshot(url) {
                check.status = HealthStatus::Archived;
                check.archive_url = Some(archive_url);
            }
        }

        check
    }

    #[instrument(skip(self, bookmark), level = "debug", fields(url = %bookmark.url))]
    fn process_bookmark(&self, bookmark: &Bookmark) -> ApplicationResult<LinkHealth> {
        let bookmark_id = bookmark.id.ok_or_else(|| {
            ApplicationError::Validation(
                "Bookmark must be stored before health checking".to_string(),
            )
        })?;

        let mut health = self
            .health_repository
            .get_for_bookmark(bookmark_id)?
            .unwrap_or_else(|| LinkHealth::pending(bookmark_id));

        let outcome = self.check_url(&bookmark.url);
        let now = Utc::now();
        health.record_check(outcome, now);
        health.next_check = Some(self.policy.next_check(health.status, health.check_count, now));

        self.health_repository.upsert(&mut health)?;
        Ok(health)
    }

    #[instrument(skip(self), level = "debug")]
    fn select_due(&self, user_id: Option<i32>, limit: usize) -> ApplicationResult<Vec<Bookmark>> {
        let mut bookmarks = self.health_repository.unchecked_bookmarks(user_id, limit)?;

        if bookmarks.len() < limit {
            let remaining = limit - bookmarks.len();
            let due = self
                .health_repository
                .due_bookmarks(user_id, Utc::now(), remaining)?;
            bookmarks.extend(due);
        }

        Ok(bookmarks)
    }

    #[instrument(skip(self), level = "debug")]
    fn run_batch(&self, user_id: Option<i32>, limit: usize) -> ApplicationResult<Vec<LinkHealth>> {
        let bookmarks = self.select_due(user_id, limit)?;
        if bookmarks.is_empty() {
            debug!("No bookmarks due for health checking");
            return Ok(Vec::new());
        }

        debug!("Checking health for {} bookmarks", bookmarks.len());

        let workers = self.max_workers.min(bookmarks.len());
        let queue: Mutex<VecDeque<Bookmark>> = Mutex::new(bookmarks.into());
        let results: Mutex<Vec<LinkHealth>> = Mutex::new(Vec::new());

        // Each bookmark is claimed from the queue by exactly one worker, so
        // no health record is written twice in one batch.
        std::thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| loop {
                    let next = queue
                        .lock()
                        .map(|mut q| q.pop_front())
                        .unwrap_or_default();
                    let Some(bookmark) = next else {
                        break;
                    };

                    match self.process_bookmark(&bookmark) {
                        Ok(health) => {
                            if let Ok(mut collected) = results.lock() {
                                collected.push(health);
                            }
                        }
                        Err(e) => warn!("Health check failed for {}: {}", bookmark.url, e),
                    }
                });
            }
        });

        Ok(results.into_inner().unwrap_or_default())
    }

    #[instrument(skip(self), level = "debug")]
    fn health_summary(&self, user_id: Option<i32>) -> ApplicationResult<HealthSummary> {
        Ok(self.health_repository.summary(user_id)?)
    }

    #[instrument(skip(self), level = "debug")]
    fn apply_redirect(&self, bookmark_id: i32) -> ApplicationResult<Bookmark> {
        let mut bookmark = self
            .repository
            .get_by_id(bookmark_id)?
            .ok_or(ApplicationError::BookmarkNotFound(bookmark_id))?;

        let mut health = self
            .health_repository
            .get_for_bookmark(bookmark_id)?
            .ok_or_else(|| {
                ApplicationError::Validation(format!(
                    "Bookmark {} has no health record",
                    bookmark_id
                ))
            })?;

        let final_url = match (&health.status, health.final_url.clone()) {
            (HealthStatus::Redirected, Some(url)) => url,
            _ => {
                return Err(ApplicationError::Validation(
                    "Bookmark is not redirected or has no final URL".to_string(),
                ))
            }
        };

        let original_url = bookmark.url.clone();
        bookmark.set_url(&final_url);
        self.repository.update(&bookmark)?;

        let now = Utc::now();
        health.status = HealthStatus::Ok;
        health.final_url = None;
        health.error_message.clear();
        health.last_checked = Some(now);
        health.next_check = Some(self.policy.next_check(HealthStatus::Ok, health.check_count, now));
        self.health_repository.upsert(&mut health)?;

        self.repository.append_activity(&BookmarkActivity::new(
            bookmark_id,
            bookmark.user_id,
            ActivityType::Updated,
            json!({
                "action": "repair_redirect",
                "original_url": original_url,
                "new_url": final_url,
            }),
        ))?;

        Ok(bookmark)
    }
}
