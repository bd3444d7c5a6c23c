// src/application/services/search_service_impl.rs
use std::sync::Arc;

use itertools::Itertools;
use tracing::instrument;

use crate::application::error::ApplicationResult;
use crate::application::services::search_service::SearchService;
use crate::domain::bookmark::Bookmark;
use crate::domain::repositories::repository::BookmarkRepository;
use crate::domain::search::SearchQuery;

#[derive(Debug)]
pub struct SearchServiceImpl<R: BookmarkRepository> {
    repository: Arc<R>,
}

impl<R: BookmarkRepository> SearchServiceImpl<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R: BookmarkRepository> SearchService for SearchServiceImpl<R> {
    #[instrument(skip(self), level = "debug")]
    fn search(&self, user_id: i32, query: &str) -> ApplicationResult<Vec<Bookmark>> {
        let query = SearchQuery::parse(query);
        let bookmarks = self.repository.get_all_for_user(user_id)?;

        let ranked = bookmarks
            .into_iter()
            .filter(|bookmark| query.matches(bookmark))
            .sorted_by(|a, b| {
                query
                    .score(b)
                    .cmp(&query.score(a))
                    .then(b.created_at.cmp(&a.created_at))
            })
            .collect();

        Ok(ranked)
    }
}
