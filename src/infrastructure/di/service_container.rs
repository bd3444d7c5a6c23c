// src/infrastructure/di/service_container.rs
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::error::ApplicationResult;
use crate::application::services::factory;
use crate::application::services::{DedupService, HealthService, MergeService, SearchService};
use crate::config::Settings;
use crate::domain::error::DomainError;
use crate::infrastructure::repositories::sqlite::repository::SqliteBookmarkRepository;

/// Composition root: builds the repository and every service once at process
/// start. Creating the pool runs pending migrations, so construction doubles
/// as the idempotent bootstrap step.
pub struct ServiceContainer {
    pub bookmark_repository: Arc<SqliteBookmarkRepository>,
    pub dedup_service: Arc<dyn DedupService>,
    pub merge_service: Arc<dyn MergeService>,
    pub health_service: Arc<dyn HealthService>,
    pub search_service: Arc<dyn SearchService>,
}

impl ServiceContainer {
    #[instrument(skip_all, level = "debug")]
    pub fn new(settings: &Settings) -> ApplicationResult<Self> {
        debug!("Creating service container with db: {}", settings.db_url);

        let bookmark_repository = Arc::new(
            SqliteBookmarkRepository::from_url(&settings.db_url).map_err(DomainError::from)?,
        );

        let prober = factory::create_link_prober(settings);

        Ok(Self {
            dedup_service: factory::create_dedup_service(&bookmark_repository),
            merge_service: factory::create_merge_service(&bookmark_repository),
            health_service: factory::create_health_service(&bookmark_repository, prober, settings),
            search_service: factory::create_search_service(&bookmark_repository),
            bookmark_repository,
        })
    }
}

impl std::fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContainer")
            .field("bookmark_repository", &self.bookmark_repository)
            .finish()
    }
}
