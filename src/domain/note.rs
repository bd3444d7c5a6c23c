// src/domain/note.rs
use chrono::{DateTime, Utc};

/// A versioned note attached to a bookmark.
///
/// Exactly one note per bookmark is active; superseded revisions stay in the
/// store with `is_active = false` and a `parent_id` pointing at the note they
/// replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct BookmarkNote {
    pub id: Option<i32>,
    pub bookmark_id: i32,
    pub user_id: i32,
    pub content: String,
    pub is_active: bool,
    pub parent_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookmarkNote {
    pub fn new(bookmark_id: i32, user_id: i32, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            bookmark_id,
            user_id,
            content,
            is_active: true,
            parent_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// A copy of this note attached to another bookmark, superseding the
    /// given note. Used when a merge adopts a duplicate's active note.
    pub fn adopted_for(&self, bookmark_id: i32, superseded: Option<i32>) -> Self {
        Self {
            id: None,
            bookmark_id,
            user_id: self.user_id,
            content: self.content.clone(),
            is_active: true,
            parent_id: superseded,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_note_when_adopted_for_then_rebased_onto_target() {
        let note = BookmarkNote::new(5, 1, "remember this".to_string());
        let adopted = note.adopted_for(9, Some(42));

        assert_eq!(adopted.bookmark_id, 9);
        assert_eq!(adopted.parent_id, Some(42));
        assert_eq!(adopted.content, "remember this");
        assert!(adopted.is_active);
        assert!(adopted.id.is_none());
        assert_eq!(adopted.updated_at, note.updated_at);
    }
}
