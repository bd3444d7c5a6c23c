// src/application/services/merge_service_impl.rs
use std::sync::Arc;

use itertools::Itertools;
use serde_json::json;
use tracing::{debug, instrument, warn};

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::merge_service::{MergeFailure, MergeOutcome, MergeService};
use crate::domain::activity::{ActivityType, BookmarkActivity};
use crate::domain::bookmark::Bookmark;
use crate::domain::note::BookmarkNote;
use crate::domain::repositories::repository::BookmarkRepository;

#[derive(Debug)]
pub struct MergeServiceImpl<R: BookmarkRepository> {
    repository: Arc<R>,
}

impl<R: BookmarkRepository> MergeServiceImpl<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Pick the note that survives the merge: the latest-updated duplicate
    /// active note that beats the primary's current one. Returns the id of
    /// the primary note to retire and the adoption copy to insert.
    fn select_surviving_note(
        &self,
        primary_id: i32,
        duplicates: &[Bookmark],
    ) -> ApplicationResult<(Option<i32>, Option<BookmarkNote>)> {
        let primary_active = self.repository.get_active_note(primary_id)?;

        let mut winner: Option<BookmarkNote> = None;
        for duplicate in duplicates {
            let Some(duplicate_id) = duplicate.id else {
                continue;
            };
            if let Some(note) = self.repository.get_active_note(duplicate_id)? {
                let current = winner.as_ref().or(primary_active.as_ref());
                if current.map_or(true, |cur| note.updated_at > cur.updated_at) {
                    winner = Some(note);
                }
            }
        }

        let retired_note_id = match &winner {
            Some(_) => primary_active.as_ref().and_then(|note| note.id),
            None => None,
        };
        let adopted = winner.map(|note| note.adopted_for(primary_id, retired_note_id));

        Ok((retired_note_id, adopted))
    }
}

impl<R: BookmarkRepository> MergeService for MergeServiceImpl<R> {
    #[instrument(skip(self), level = "debug")]
    fn merge(&self, primary_id: i32, duplicate_ids: &[i32]) -> ApplicationResult<MergeOutcome> {
        // A bookmark cannot be its own duplicate; drop it silently.
        let duplicate_ids: Vec<i32> = duplicate_ids
            .iter()
            .copied()
            .filter(|&id| id != primary_id)
            .unique()
            .collect();

        if duplicate_ids.is_empty() {
            return Err(ApplicationError::Validation(
                "Cannot merge a bookmark with itself".to_string(),
            ));
        }

        let mut primary = self
            .repository
            .get_by_id(primary_id)?
            .ok_or(ApplicationError::BookmarkNotFound(primary_id))?;

        let mut duplicates = Vec::with_capacity(duplicate_ids.len());
        for &id in &duplicate_ids {
            let duplicate = self
                .repository
                .get_by_id(id)?
                .ok_or(ApplicationError::BookmarkNotFound(id))?;
            duplicates.push(duplicate);
        }

        if let Some(alien) = duplicates.iter().find(|d| d.user_id != primary.user_id) {
            return Err(ApplicationError::OwnershipConflict(format!(
                "Cannot merge bookmarks from different users (bookmark {} belongs to user {})",
                alien.id.unwrap_or(-1),
                alien.user_id
            )));
        }

        debug!(
            "Merging {} duplicates into bookmark {}",
            duplicates.len(),
            primary_id
        );

        // Field reconciliation, iteration order = caller order.
        for duplicate in &duplicates {
            primary.absorb_duplicate(duplicate);
        }

        let (retired_note_id, adopted_note) =
            self.select_surviving_note(primary_id, &duplicates)?;

        // One atomic unit: bookmark row + note retirement + note adoption.
        self.repository
            .apply_merge(&primary, retired_note_id, adopted_note.as_ref())?;

        // Best-effort cleanup: one failing duplicate must not abort the rest.
        let mut merged = Vec::new();
        let mut failed = Vec::new();
        for duplicate in &duplicates {
            let Some(duplicate_id) = duplicate.id else {
                continue;
            };

            let cleanup = self
                .repository
                .append_activity(&BookmarkActivity::new(
                    primary_id,
                    primary.user_id,
                    ActivityType::Merged,
                    json!({
                        "merged_from": duplicate_id,
                        "merged_url": duplicate.url,
                        "merged_title": duplicate.title,
                    }),
                ))
                .and_then(|_| self.repository.delete(duplicate_id).map(|_| ()));

            match cleanup {
                Ok(()) => merged.push(duplicate_id),
                Err(e) => {
                    warn!("Failed to clean up duplicate {}: {}", duplicate_id, e);
                    failed.push(MergeFailure {
                        bookmark_id: duplicate_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let bookmark = self
            .repository
            .get_by_id(primary_id)?
            .ok_or(ApplicationError::BookmarkNotFound(primary_id))?;

        Ok(MergeOutcome {
            bookmark,
            merged,
            failed,
        })
    }
}
