use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{Duration, Utc};
use linkward::application::error::ApplicationError;
use linkward::application::services::{HealthService, HealthServiceImpl};
use linkward::domain::activity::ActivityType;
use linkward::domain::bookmark::Bookmark;
use linkward::domain::health::{HealthStatus, LinkHealth, ProbeResult, RecheckPolicy};
use linkward::domain::repositories::health_repository::HealthRepository;
use linkward::domain::repositories::repository::BookmarkRepository;
use linkward::domain::services::link_prober::LinkProber;
use linkward::infrastructure::repositories::sqlite::repository::SqliteBookmarkRepository;
use linkward::util::testing::setup_test_db;

/// Canned prober: no network involved.
#[derive(Debug, Default)]
struct StubProber {
    results: HashMap<String, ProbeResult>,
    archives: HashMap<String, String>,
}

impl StubProber {
    fn ok(mut self, url: &str) -> Self {
        self.results.insert(
            url.to_string(),
            ProbeResult {
                status: HealthStatus::Ok,
                status_code: Some(200),
                final_url: Some(url.to_string()),
                response_time_ms: Some(25),
                error: None,
            },
        );
        self
    }

    fn broken(mut self, url: &str, status_code: i32) -> Self {
        self.results.insert(
            url.to_string(),
            ProbeResult {
                status: HealthStatus::Broken,
                status_code: Some(status_code),
                final_url: Some(url.to_string()),
                response_time_ms: Some(25),
                error: Some(format!("HTTP {}", status_code)),
            },
        );
        self
    }

    fn redirected(mut self, url: &str, final_url: &str) -> Self {
        self.results.insert(
            url.to_string(),
            ProbeResult {
                status: HealthStatus::Redirected,
                status_code: Some(200),
                final_url: Some(final_url.to_string()),
                response_time_ms: Some(40),
                error: None,
            },
        );
        self
    }

    fn with_archive(mut self, url: &str, archive_url: &str) -> Self {
        self.archives.insert(url.to_string(), archive_url.to_string());
        self
    }
}

impl LinkProber for StubProber {
    fn probe(&self, url: &str) -> ProbeResult {
        self.results.get(url).cloned().unwrap_or(ProbeResult {
            status: HealthStatus::Broken,
            status_code: None,
            final_url: None,
            response_time_ms: Some(1),
            error: Some("connection refused".to_string()),
        })
    }

    fn find_archive_snapshot(&self, url: &str) -> Option<String> {
        self.archives.get(url).cloned()
    }
}

fn add_bookmark(repo: &SqliteBookmarkRepository, user_id: i32, url: &str) -> i32 {
    let mut bookmark = Bookmark::new(user_id, url, "title", "", Default::default()).unwrap();
    repo.add(&mut bookmark).unwrap();
    bookmark.id.unwrap()
}

fn service(
    repo: &SqliteBookmarkRepository,
    prober: StubProber,
) -> HealthServiceImpl<SqliteBookmarkRepository, SqliteBookmarkRepository> {
    HealthServiceImpl::new(
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
        Arc::new(prober),
        RecheckPolicy::default(),
        3,
    )
}

#[test]
fn given_404_without_snapshot_when_check_then_broken_without_archive() {
    let (repo, _tempdir) = setup_test_db();
    let prober = StubProber::default().broken("https://example.com/gone", 404);
    let service = service(&repo, prober);

    let check = service.check_url("https://example.com/gone");

    assert_eq!(check.status, HealthStatus::Broken);
    assert_eq!(check.status_code, Some(404));
    assert!(check.archive_url.is_none());
    assert_eq!(check.error.as_deref(), Some("HTTP 404"));
}

#[test]
fn given_redirecting_url_when_check_then_redirected_with_final_url() {
    let (repo, _tempdir) = setup_test_db();
    let prober =
        StubProber::default().redirected("http://old.example/x", "https://new.example/x");
    let service = service(&repo, prober);

    let check = service.check_url("http://old.example/x");

    assert_eq!(check.status, HealthStatus::Redirected);
    assert_eq!(check.final_url.as_deref(), Some("https://new.example/x"));
}

#[test]
fn given_broken_url_with_snapshot_when_check_then_archived() {
    let (repo, _tempdir) = setup_test_db();
    let prober = StubProber::default()
        .broken("https://example.com/gone", 404)
        .with_archive(
            "https://example.com/gone",
            "http://web.archive.org/web/2024/https://example.com/gone",
        );
    let service = service(&repo, prober);

    let check = service.check_url("https://example.com/gone");

    assert_eq!(check.status, HealthStatus::Archived);
    assert_eq!(
        check.archive_url.as_deref(),
        Some("http://web.archive.org/web/2024/https://example.com/gone")
    );
}

#[test]
fn given_unstored_bookmark_when_process_then_validation_error() {
    let (repo, _tempdir) = setup_test_db();
    let service = service(&repo, StubProber::default());
    let bookmark = Bookmark::new(1, "https://example.com", "t", "", Default::default()).unwrap();

    let result = service.process_bookmark(&bookmark);
    assert!(matches!(result, Err(ApplicationError::Validation(_))));
}

#[test]
fn given_bookmark_when_process_then_record_created_and_scheduled() {
    let (repo, _tempdir) = setup_test_db();
    let id = add_bookmark(&repo, 1, "https://example.com/ok");
    let bookmark = repo.get_by_id(id).unwrap().unwrap();

    let prober = StubProber::default().ok("https://example.com/ok");
    let service = service(&repo, prober);

    let before = Utc::now();
    let health = service.process_bookmark(&bookmark).unwrap();

    assert_eq!(health.status, HealthStatus::Ok);
    assert_eq!(health.check_count, 1);
    assert!(health.last_checked.unwrap() >= before);
    assert!(health.next_check.unwrap() > Utc::now());

    // Persisted, and a second check increments the counter.
    let stored = repo.get_for_bookmark(id).unwrap().unwrap();
    assert_eq!(stored.check_count, 1);

    let health = service.process_bookmark(&bookmark).unwrap();
    assert_eq!(health.check_count, 2);
}

#[test]
fn given_mixed_records_when_select_due_then_unchecked_first_then_broken_then_oldest() {
    let (repo, _tempdir) = setup_test_db();
    let now = Utc::now();

    let ok_old = add_bookmark(&repo, 1, "https://ok-old.example/");
    let broken = add_bookmark(&repo, 1, "https://broken.example/");
    let ok_recent = add_bookmark(&repo, 1, "https://ok-recent.example/");
    let unchecked = add_bookmark(&repo, 1, "https://unchecked.example/");
    let not_due = add_bookmark(&repo, 1, "https://not-due.example/");

    let seed = |bookmark_id: i32, status: HealthStatus, checked_days_ago: i64, due: bool| {
        let mut health = LinkHealth::pending(bookmark_id);
        health.status = status;
        health.last_checked = Some(now - Duration::days(checked_days_ago));
        health.next_check = Some(if due {
            now - Duration::hours(1)
        } else {
            now + Duration::days(7)
        });
        health.check_count = 1;
        repo.upsert(&mut health).unwrap();
    };
    seed(ok_old, HealthStatus::Ok, 30, true);
    seed(broken, HealthStatus::Broken, 1, true);
    seed(ok_recent, HealthStatus::Ok, 2, true);
    seed(not_due, HealthStatus::Ok, 1, false);

    let service = service(&repo, StubProber::default());
    let due = service.select_due(Some(1), 10).unwrap();
    let ids: Vec<i32> = due.iter().filter_map(|b| b.id).collect();

    assert_eq!(ids, vec![unchecked, broken, ok_old, ok_recent]);
}

#[test]
fn given_due_bookmarks_when_run_batch_then_each_updated_once() {
    let (repo, _tempdir) = setup_test_db();
    let id1 = add_bookmark(&repo, 1, "https://one.example/");
    let id2 = add_bookmark(&repo, 1, "https://two.example/");
    let id3 = add_bookmark(&repo, 1, "https://three.example/");

    let prober = StubProber::default()
        .ok("https://one.example/")
        .broken("https://two.example/", 500)
        .redirected("https://three.example/", "https://three.example/new");
    let service = service(&repo, prober);

    let results = service.run_batch(Some(1), 10).unwrap();
    assert_eq!(results.len(), 3);

    let checked: HashSet<i32> = results.iter().map(|h| h.bookmark_id).collect();
    assert_eq!(checked, [id1, id2, id3].into_iter().collect());

    for id in [id1, id2, id3] {
        let health = repo.get_for_bookmark(id).unwrap().unwrap();
        assert_eq!(health.check_count, 1, "bookmark {} checked more than once", id);
    }

    assert_eq!(
        repo.get_for_bookmark(id2).unwrap().unwrap().status,
        HealthStatus::Broken
    );

    // Nothing is due anymore, so a second batch is empty.
    assert!(service.run_batch(Some(1), 10).unwrap().is_empty());
}

#[test]
fn given_redirected_bookmark_when_apply_redirect_then_url_rewritten_and_logged() {
    let (repo, _tempdir) = setup_test_db();
    let id = add_bookmark(&repo, 1, "http://old.example/x");

    let mut health = LinkHealth::pending(id);
    health.status = HealthStatus::Redirected;
    health.final_url = Some("https://new.example/x".to_string());
    health.check_count = 1;
    repo.upsert(&mut health).unwrap();

    let service = service(&repo, StubProber::default());
    let updated = service.apply_redirect(id).unwrap();

    assert_eq!(updated.url, "https://new.example/x");
    assert_eq!(updated.domain, "new.example");

    let health = repo.get_for_bookmark(id).unwrap().unwrap();
    assert_eq!(health.status, HealthStatus::Ok);
    assert!(health.final_url.is_none());

    let activities = repo
        .get_activities(id, Some(ActivityType::Updated))
        .unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(
        activities[0].metadata.get("action").and_then(|v| v.as_str()),
        Some("repair_redirect")
    );
}

#[test]
fn given_healthy_bookmark_when_apply_redirect_then_validation_error() {
    let (repo, _tempdir) = setup_test_db();
    let id = add_bookmark(&repo, 1, "https://fine.example/");

    let mut health = LinkHealth::pending(id);
    health.status = HealthStatus::Ok;
    health.check_count = 1;
    repo.upsert(&mut health).unwrap();

    let service = service(&repo, StubProber::default());
    assert!(matches!(
        service.apply_redirect(id),
        Err(ApplicationError::Validation(_))
    ));
}

#[test]
fn given_records_and_unchecked_when_summary_then_counts_match() {
    let (repo, _tempdir) = setup_test_db();
    let ok_id = add_bookmark(&repo, 1, "https://a.example/");
    let broken_id = add_bookmark(&repo, 1, "https://b.example/");
    add_bookmark(&repo, 1, "https://c.example/");

    for (id, status) in [(ok_id, HealthStatus::Ok), (broken_id, HealthStatus::Broken)] {
        let mut health = LinkHealth::pending(id);
        health.status = status;
        health.check_count = 1;
        repo.upsert(&mut health).unwrap();
    }

    let service = service(&repo, StubProber::default());
    let summary = service.health_summary(Some(1)).unwrap();

    assert_eq!(summary.ok, 1);
    assert_eq!(summary.broken, 1);
    assert_eq!(summary.unchecked, 1);
    assert_eq!(summary.total_checked(), 2);
}
