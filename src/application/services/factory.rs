// src/application/services/factory.rs
use std::sync::Arc;

use crate::application::services::dedup_service::DedupService;
use crate::application::services::health_service::HealthService;
use crate::application::services::merge_service::MergeService;
use crate::application::services::search_service::SearchService;
use crate::application::{
    DedupServiceImpl, HealthServiceImpl, MergeServiceImpl, SearchServiceImpl,
};
use crate::config::Settings;
use crate::domain::services::link_prober::LinkProber;
use crate::infrastructure::http::HttpLinkProber;
use crate::infrastructure::repositories::sqlite::repository::SqliteBookmarkRepository;

pub fn create_dedup_service(repository: &Arc<SqliteBookmarkRepository>) -> Arc<dyn DedupService> {
    Arc::new(DedupServiceImpl::new(Arc::clone(repository)))
}

pub fn create_merge_service(repository: &Arc<SqliteBookmarkRepository>) -> Arc<dyn MergeService> {
    Arc::new(MergeServiceImpl::new(Arc::clone(repository)))
}

pub fn create_search_service(repository: &Arc<SqliteBookmarkRepository>) -> Arc<dyn SearchService> {
    Arc::new(SearchServiceImpl::new(Arc::clone(repository)))
}

pub fn create_link_prober(settings: &Settings) -> Arc<dyn LinkProber> {
    Arc::new(HttpLinkProber::new(
        settings.health.timeout_secs,
        settings.health.max_redirects,
        &settings.health.user_agent,
    ))
}

pub fn create_health_service(
    repository: &Arc<SqliteBookmarkRepository>,
    prober: Arc<dyn LinkProber>,
    settings: &Settings,
) -> Arc<dyn HealthService> {
    Arc::new(HealthServiceImpl::new(
        Arc::clone(repository),
        Arc::clone(repository),
        prober,
        settings.recheck.to_policy(),
        settings.health.max_workers,
    ))
}
