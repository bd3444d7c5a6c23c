// src/domain/duplicate.rs
use serde::Serialize;

use crate::domain::bookmark::Bookmark;

/// Criterion by which a duplicate group was formed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchKind {
    /// Members share one normalized URL.
    Url { normalized_url: String },
    /// Member titles are pairwise-connected at or above the similarity
    /// threshold.
    Title,
}

/// A transient set of bookmarks considered the same logical resource.
/// Never persisted; membership is always >= 2.
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    pub kind: MatchKind,
    pub bookmarks: Vec<Bookmark>,
}

impl DuplicateGroup {
    pub fn member_ids(&self) -> Vec<i32> {
        self.bookmarks.iter().filter_map(|b| b.id).collect()
    }

    pub fn is_url_match(&self) -> bool {
        matches!(self.kind, MatchKind::Url { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn given_group_when_member_ids_then_ids_in_order() {
        let mut a = Bookmark::new(1, "https://example.com/a", "a", "", HashSet::new()).unwrap();
        a.id = Some(3);
        let mut b = Bookmark::new(1, "https://example.com/b", "b", "", HashSet::new()).unwrap();
        b.id = Some(7);

        let group = DuplicateGroup {
            kind: MatchKind::Title,
            bookmarks: vec![a, b],
        };

        assert_eq!(group.member_ids(), vec![3, 7]);
        assert!(!group.is_url_match());
    }
}
