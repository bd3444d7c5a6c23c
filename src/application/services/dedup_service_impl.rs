// src/application/services/dedup_service_impl.rs
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::error::ApplicationResult;
use crate::application::services::dedup_service::DedupService;
use crate::domain::bookmark::Bookmark;
use crate::domain::duplicate::{DuplicateGroup, MatchKind};
use crate::domain::repositories::repository::BookmarkRepository;
use crate::domain::similarity::{canonical_text, similarity, trigrams};
use crate::domain::url_norm::{has_dup_marker, normalize_url, strip_dup_marker};

/// Two titles at or above this trigram-Jaccard score are duplicates.
pub const TITLE_SIMILARITY_THRESHOLD: f64 = 0.8;

#[derive(Debug)]
pub struct DedupServiceImpl<R: BookmarkRepository> {
    repository: Arc<R>,
}

impl<R: BookmarkRepository> DedupServiceImpl<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R: BookmarkRepository> DedupService for DedupServiceImpl<R> {
    #[instrument(skip(self), level = "debug")]
    fn detect_duplicates(&self, user_id: i32) -> ApplicationResult<Vec<DuplicateGroup>> {
        let bookmarks = self.repository.get_active_for_user(user_id)?;

        let url_groups = detect_url_groups(&bookmarks);
        let claimed: HashSet<i32> = url_groups
            .iter()
            .flat_map(|group| group.member_ids())
            .collect();

        let title_groups = detect_title_groups(&bookmarks, &claimed);

        debug!(
            "Found {} URL groups and {} title groups among {} active bookmarks",
            url_groups.len(),
            title_groups.len(),
            bookmarks.len()
        );

        Ok(url_groups.into_iter().chain(title_groups).collect())
    }
}

/// Bucket bookmarks by normalized URL; every bucket with two or more members
/// is a duplicate group. A second pass resolves the intentional-duplicate
/// marker: marker-bearing bookmarks are joined with whatever matches their
/// marker-stripped normalized URL, unless that set is already contained in a
/// found group.
fn detect_url_groups(bookmarks: &[Bookmark]) -> Vec<DuplicateGroup> {
    let normalized: Vec<String> = bookmarks.iter().map(|b| normalize_url(&b.url)).collect();

    let mut buckets: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, norm) in normalized.iter().enumerate() {
        buckets.entry(norm.as_str()).or_default().push(idx);
    }

    let mut groups: Vec<(String, Vec<usize>)> = buckets
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(norm, members)| (norm.to_string(), members))
        .collect();

    // Marker pass: join explicit duplicates with their originals.
    let mut marker_targets: HashMap<String, Vec<usize>> = HashMap::new();
    for (idx, bookmark) in bookmarks.iter().enumerate() {
        if has_dup_marker(&bookmark.url) {
            let clean = normalize_url(&strip_dup_marker(&bookmark.url));
            marker_targets.entry(clean).or_default().push(idx);
        }
    }

    for (clean, marker_members) in marker_targets.into_iter().sorted() {
        let originals: Vec<usize> = normalized
            .iter()
            .enumerate()
            .filter(|(_, norm)| **norm == clean)
            .map(|(idx, _)| idx)
            .collect();

        if originals.is_empty() {
            continue;
        }

        let combined: Vec<usize> = originals
            .into_iter()
            .chain(marker_members)
            .unique()
            .sorted()
            .collect();

        let contained = groups.iter().any(|(_, members)| {
            let member_set: HashSet<usize> = members.iter().copied().collect();
            combined.iter().all(|idx| member_set.contains(idx))
        });

        if combined.len() > 1 && !contained {
            groups.push((clean, combined));
        }
    }

    groups
        .into_iter()
        .map(|(norm, mut members)| {
            members.sort();
            DuplicateGroup {
                kind: MatchKind::Url {
                    normalized_url: norm,
                },
                bookmarks: members.iter().map(|&idx| bookmarks[idx].clone()).collect(),
            }
        })
        .sorted_by_key(|group| group.bookmarks.first().and_then(|b| b.id))
        .collect()
}

/// Group unclaimed, titled bookmarks by title similarity.
///
/// One canonical algorithm regardless of collection size: a trigram index
/// generates candidate pairs, full similarity is computed only for
/// candidates, and scoring pairs are merged into connected components with
/// union-find. The index is a lossless pruning step for the threshold, since
/// a positive Jaccard score requires at least one shared trigram.
fn detect_title_groups(bookmarks: &[Bookmark], claimed: &HashSet<i32>) -> Vec<DuplicateGroup> {
    let candidates: Vec<usize> = bookmarks
        .iter()
        .enumerate()
        .filter(|(_, b)| {
            !b.title.trim().is_empty() && b.id.map_or(true, |id| !claimed.contains(&id))
        })
        .map(|(idx, _)| idx)
        .collect();

    let mut trigram_index: HashMap<String, Vec<usize>> = HashMap::new();
    for (pos, &idx) in candidates.iter().enumerate() {
        let canonical = canonical_text(&bookmarks[idx].title);
        for trigram in trigrams(&canonical) {
            trigram_index.entry(trigram).or_default().push(pos);
        }
    }

    let mut candidate_pairs: HashSet<(usize, usize)> = HashSet::new();
    for positions in trigram_index.values() {
        if positions.len() < 2 {
            continue;
        }
        for (i, &a) in positions.iter().enumerate() {
            for &b in &positions[i + 1..] {
                if a != b {
                    candidate_pairs.insert((a.min(b), a.max(b)));
                }
            }
        }
    }

    let mut union_find = UnionFind::new(candidates.len());
    for &(a, b) in &candidate_pairs {
        let title_a = &bookmarks[candidates[a]].title;
        let title_b = &bookmarks[candidates[b]].title;
        if similarity(title_a, title_b) >= TITLE_SIMILARITY_THRESHOLD {
            union_find.union(a, b);
        }
    }

    let mut components: HashMap<usize, Vec<usize>> = HashMap::new();
    for pos in 0..candidates.len() {
        components
            .entry(union_find.find(pos))
            .or_default()
            .push(candidates[pos]);
    }

    components
        .into_values()
        .filter(|members| members.len() > 1)
        .map(|mut members| {
            members.sort();
            DuplicateGroup {
                kind: MatchKind::Title,
                bookmarks: members.iter().map(|&idx| bookmarks[idx].clone()).collect(),
            }
        })
        .sorted_by_key(|group| group.bookmarks.first().and_then(|b| b.id))
        .collect()
}

/// Disjoint-set forest with path compression, for merging similarity pairs
/// into groups.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, item: usize) -> usize {
        if self.parent[item] != item {
            let parent = self.parent[item];
            let root = self.find(parent);
            self.parent[item] = root;
        }
        self.parent[item]
    }

    fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            // Smaller root wins so group identity is deterministic.
            let (keep, absorb) = if root_a < root_b {
                (root_a, root_b)
            } else {
                (root_b, root_a)
            };
            self.parent[absorb] = keep;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn bookmark(id: i32, url: &str, title: &str) -> Bookmark {
        let mut bm = Bookmark::new(1, url, title, "", HashSet::new()).unwrap();
        bm.id = Some(id);
        bm
    }

    #[test]
    fn given_tracking_variant_urls_when_detect_then_one_url_group() {
        let bookmarks = vec![
            bookmark(1, "https://example.com/page?utm_source=x", "One"),
            bookmark(2, "https://example.com/page", "Two"),
            bookmark(3, "https://other.com/", "Three"),
        ];

        let groups = detect_url_groups(&bookmarks);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].member_ids(), vec![1, 2]);
        assert_eq!(
            groups[0].kind,
            MatchKind::Url {
                normalized_url: "https://example.com/page".to_string()
            }
        );
    }

    #[test]
    fn given_dup_marker_when_detect_then_joined_with_original() {
        let bookmarks = vec![
            bookmark(1, "https://example.com/article", "Original"),
            bookmark(2, "https://example.com/article?_dup=1699999999", "Copy"),
        ];

        let groups = detect_url_groups(&bookmarks);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].member_ids(), vec![1, 2]);
    }

    #[test]
    fn given_lone_marker_bookmark_when_detect_then_no_group() {
        let bookmarks = vec![bookmark(1, "https://example.com/article?_dup=1", "Copy")];
        assert!(detect_url_groups(&bookmarks).is_empty());
    }

    #[test]
    fn given_similar_titles_when_detect_then_title_group() {
        let bookmarks = vec![
            bookmark(1, "https://a.example/1", "Getting Started with Rust"),
            bookmark(2, "https://b.example/2", "Getting started with Rust!"),
            bookmark(3, "https://c.example/3", "Chocolate Cake Recipes"),
        ];

        let groups = detect_title_groups(&bookmarks, &HashSet::new());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].member_ids(), vec![1, 2]);
        assert_eq!(groups[0].kind, MatchKind::Title);
    }

    #[test]
    fn given_claimed_members_when_detect_titles_then_excluded() {
        let bookmarks = vec![
            bookmark(1, "https://a.example/1", "Getting Started with Rust"),
            bookmark(2, "https://b.example/2", "Getting started with Rust!"),
        ];

        let claimed: HashSet<i32> = [1].into_iter().collect();
        // Bookmark 1 is taken by a URL group, leaving a singleton: no group.
        assert!(detect_title_groups(&bookmarks, &claimed).is_empty());
    }

    #[test]
    fn given_untitled_bookmarks_when_detect_titles_then_ignored() {
        let bookmarks = vec![
            bookmark(1, "https://a.example/1", ""),
            bookmark(2, "https://b.example/2", "  "),
        ];
        assert!(detect_title_groups(&bookmarks, &HashSet::new()).is_empty());
    }

    #[test]
    fn given_transitive_chain_when_detect_titles_then_single_component() {
        // a~b and b~c but the a/c edge may score lower; union-find still
        // yields one group.
        let bookmarks = vec![
            bookmark(1, "https://a.example/1", "Rust async programming guide"),
            bookmark(2, "https://b.example/2", "Rust async programming guide!!"),
            bookmark(3, "https://c.example/3", "The Rust async programming guide!!"),
        ];

        let groups = detect_title_groups(&bookmarks, &HashSet::new());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].member_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn given_many_bookmarks_when_detect_titles_then_same_groups_as_pairwise() {
        let titles = [
            "How to write a parser in Rust",
            "how to write a parser in rust",
            "Understanding borrow checking",
            "Understanding borrow checking!",
            "A totally different subject",
        ];
        let bookmarks: Vec<Bookmark> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| bookmark(i as i32 + 1, &format!("https://x.example/{}", i), title))
            .collect();

        // Exhaustive reference pairs at the same threshold.
        let mut expected_pairs = HashSet::new();
        for i in 0..bookmarks.len() {
            for j in i + 1..bookmarks.len() {
                if similarity(&bookmarks[i].title, &bookmarks[j].title)
                    >= TITLE_SIMILARITY_THRESHOLD
                {
                    expected_pairs.insert((i as i32 + 1, j as i32 + 1));
                }
            }
        }
        assert_eq!(expected_pairs.len(), 2);

        let groups = detect_title_groups(&bookmarks, &HashSet::new());
        let mut found_pairs = HashSet::new();
        for group in &groups {
            let ids = group.member_ids();
            for i in 0..ids.len() {
                for j in i + 1..ids.len() {
                    found_pairs.insert((ids[i], ids[j]));
                }
            }
        }
        assert_eq!(found_pairs, expected_pairs);
    }

    #[test]
    fn given_union_find_when_chained_unions_then_one_root() {
        let mut uf = UnionFind::new(4);
        uf.union(0, 1);
        uf.union(2, 3);
        assert_ne!(uf.find(0), uf.find(2));

        uf.union(1, 3);
        assert_eq!(uf.find(0), uf.find(2));
        assert_eq!(uf.find(0), 0);
    }
}
