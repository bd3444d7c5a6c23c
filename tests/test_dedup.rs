use std::collections::HashSet;
use std::sync::Arc;

use linkward::application::services::{DedupService, DedupServiceImpl};
use linkward::domain::bookmark::Bookmark;
use linkward::domain::duplicate::MatchKind;
use linkward::domain::repositories::repository::BookmarkRepository;
use linkward::infrastructure::repositories::sqlite::repository::SqliteBookmarkRepository;
use linkward::util::testing::setup_test_db;

fn add_bookmark(
    repo: &SqliteBookmarkRepository,
    user_id: i32,
    url: &str,
    title: &str,
) -> i32 {
    let mut bookmark = Bookmark::new(user_id, url, title, "", HashSet::new()).unwrap();
    repo.add(&mut bookmark).unwrap();
    bookmark.id.unwrap()
}

fn archive_bookmark(repo: &SqliteBookmarkRepository, id: i32) {
    let mut bookmark = repo.get_by_id(id).unwrap().unwrap();
    bookmark.is_archived = true;
    repo.update(&bookmark).unwrap();
}

#[test]
fn given_tracking_param_variants_when_detect_then_one_url_group() {
    let (repo, _tempdir) = setup_test_db();
    let id1 = add_bookmark(&repo, 1, "https://example.com/page?utm_source=x", "Page A");
    let id2 = add_bookmark(&repo, 1, "https://example.com/page", "Totally different title");
    add_bookmark(&repo, 1, "https://other.example.com/", "Unrelated");

    let service = DedupServiceImpl::new(Arc::new(repo));
    let groups = service.detect_duplicates(1).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].member_ids(), vec![id1, id2]);
    assert!(matches!(groups[0].kind, MatchKind::Url { .. }));
}

#[test]
fn given_similar_titles_when_detect_then_title_group() {
    let (repo, _tempdir) = setup_test_db();
    let id1 = add_bookmark(&repo, 1, "https://a.example/rust", "Getting Started with Rust");
    let id2 = add_bookmark(&repo, 1, "https://b.example/rust", "Getting started with Rust!");
    add_bookmark(&repo, 1, "https://c.example/cake", "Chocolate Cake Recipes");

    let service = DedupServiceImpl::new(Arc::new(repo));
    let groups = service.detect_duplicates(1).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].kind, MatchKind::Title);
    assert_eq!(groups[0].member_ids(), vec![id1, id2]);
}

#[test]
fn given_url_and_title_overlap_when_detect_then_groups_disjoint() {
    let (repo, _tempdir) = setup_test_db();
    // Same normalized URL AND nearly identical titles: the URL group claims
    // both, so no title group may contain them again.
    add_bookmark(&repo, 1, "https://example.com/doc?utm_medium=mail", "Reference Manual");
    add_bookmark(&repo, 1, "https://example.com/doc", "Reference Manual!");
    let id3 = add_bookmark(&repo, 1, "https://x.example/1", "An Introduction to Testing");
    let id4 = add_bookmark(&repo, 1, "https://y.example/2", "An Introduction to Testing!!");

    let service = DedupServiceImpl::new(Arc::new(repo));
    let groups = service.detect_duplicates(1).unwrap();

    assert_eq!(groups.len(), 2);

    let mut seen: HashSet<i32> = HashSet::new();
    for group in &groups {
        assert!(group.bookmarks.len() >= 2);
        for id in group.member_ids() {
            assert!(seen.insert(id), "bookmark {} appears in two groups", id);
        }
    }

    let title_group = groups.iter().find(|g| g.kind == MatchKind::Title).unwrap();
    assert_eq!(title_group.member_ids(), vec![id3, id4]);
}

#[test]
fn given_archived_and_foreign_bookmarks_when_detect_then_excluded() {
    let (repo, _tempdir) = setup_test_db();
    let id1 = add_bookmark(&repo, 1, "https://example.com/p?utm_source=a", "P");
    let id2 = add_bookmark(&repo, 1, "https://example.com/p", "Q");
    let archived = add_bookmark(&repo, 1, "https://example.com/p?utm_source=b", "R");
    archive_bookmark(&repo, archived);
    // Same URL but another owner: never grouped with user 1.
    add_bookmark(&repo, 2, "https://example.com/p", "S");

    let service = DedupServiceImpl::new(Arc::new(repo));
    let groups = service.detect_duplicates(1).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].member_ids(), vec![id1, id2]);
}

#[test]
fn given_dup_marker_bookmark_when_detect_then_grouped_with_original() {
    let (repo, _tempdir) = setup_test_db();
    let original = add_bookmark(&repo, 1, "https://example.com/article", "Article");
    let copy = add_bookmark(
        &repo,
        1,
        "https://example.com/article?_dup=1699999999",
        "Article (copy)",
    );

    let service = DedupServiceImpl::new(Arc::new(repo));
    let groups = service.detect_duplicates(1).unwrap();

    assert_eq!(groups.len(), 1);
    assert!(matches!(groups[0].kind, MatchKind::Url { .. }));
    assert_eq!(groups[0].member_ids(), vec![original, copy]);
}

#[test]
fn given_no_duplicates_when_detect_then_empty() {
    let (repo, _tempdir) = setup_test_db();
    add_bookmark(&repo, 1, "https://a.example/", "Alpha");
    add_bookmark(&repo, 1, "https://b.example/", "Beta");

    let service = DedupServiceImpl::new(Arc::new(repo));
    assert!(service.detect_duplicates(1).unwrap().is_empty());
}
