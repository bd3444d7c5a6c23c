// src/domain/search.rs
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use crate::domain::bookmark::Bookmark;

// Ranking weights per field; a term scores its highest-priority matching field.
const WEIGHT_TITLE: i32 = 4;
const WEIGHT_DESCRIPTION: i32 = 3;
const WEIGHT_NOTES: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterKey {
    Tag,
    Domain,
    Unread,
    Favorite,
    Archived,
    After,
    Before,
}

fn filter_patterns() -> &'static [(FilterKey, Regex)] {
    static PATTERNS: OnceLock<Vec<(FilterKey, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (FilterKey::Tag, r"(?i)tag:(\S+)"),
            (FilterKey::Domain, r"(?i)domain:(\S+)"),
            (FilterKey::Unread, r"(?i)unread:(true|false)"),
            (FilterKey::Favorite, r"(?i)favorite:(true|false)"),
            (FilterKey::Archived, r"(?i)archived:(true|false)"),
            (FilterKey::After, r"(?i)after:(\d{4}-\d{2}-\d{2})"),
            (FilterKey::Before, r"(?i)before:(\d{4}-\d{2}-\d{2})"),
        ]
        .into_iter()
        .map(|(key, pattern)| (key, Regex::new(pattern).expect("valid filter pattern")))
        .collect()
    })
}

fn phrase_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#""([^"]*)""#).expect("valid phrase pattern"))
}

/// Parsed search input: filter clauses plus free-text terms.
///
/// Syntax: `tag:rust domain:github.com unread:true favorite:true
/// archived:false after:2024-01-01 before:2024-12-31 "exact phrase" words`.
/// Unparseable date values are dropped silently; search must degrade, not
/// fail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub tags: Vec<String>,
    pub domain: Option<String>,
    pub unread: Option<bool>,
    pub favorite: Option<bool>,
    pub archived: Option<bool>,
    pub created_after: Option<NaiveDate>,
    pub created_before: Option<NaiveDate>,
    pub phrases: Vec<String>,
    pub terms: Vec<String>,
}

impl SearchQuery {
    pub fn parse(input: &str) -> Self {
        let mut query = SearchQuery::default();
        let mut remaining = input.to_string();

        for (key, pattern) in filter_patterns() {
            let values: Vec<String> = pattern
                .captures_iter(&remaining)
                .map(|caps| caps[1].to_string())
                .collect();

            for value in values {
                match key {
                    FilterKey::Tag => query.tags.push(value.to_lowercase()),
                    FilterKey::Domain => query.domain = Some(value.to_lowercase()),
                    FilterKey::Unread => query.unread = Some(value.eq_ignore_ascii_case("true")),
                    FilterKey::Favorite => {
                        query.favorite = Some(value.eq_ignore_ascii_case("true"))
                    }
                    FilterKey::Archived => {
                        query.archived = Some(value.eq_ignore_ascii_case("true"))
                    }
                    FilterKey::After => {
                        query.created_after = NaiveDate::parse_from_str(&value, "%Y-%m-%d").ok()
                    }
                    FilterKey::Before => {
                        query.created_before = NaiveDate::parse_from_str(&value, "%Y-%m-%d").ok()
                    }
                }
            }
            remaining = pattern.replace_all(&remaining, " ").into_owned();
        }

        for caps in phrase_pattern().captures_iter(&remaining) {
            let phrase = caps[1].trim().to_string();
            if !phrase.is_empty() {
                query.phrases.push(phrase);
            }
        }
        remaining = phrase_pattern().replace_all(&remaining, " ").into_owned();

        query.terms = remaining
            .split_whitespace()
            .map(|term| term.to_string())
            .collect();

        query
    }

    pub fn is_empty(&self) -> bool {
        *self == SearchQuery::default()
    }

    /// All filter clauses and all text fragments must hold (AND semantics).
    pub fn matches(&self, bookmark: &Bookmark) -> bool {
        for tag in &self.tags {
            if !bookmark.tags.iter().any(|t| t.value() == tag) {
                return false;
            }
        }

        if let Some(domain) = &self.domain {
            if !bookmark.domain.contains(domain) {
                return false;
            }
        }

        if let Some(unread) = self.unread {
            if bookmark.is_read == unread {
                return false;
            }
        }

        if let Some(favorite) = self.favorite {
            if bookmark.is_favorite != favorite {
                return false;
            }
        }

        if let Some(archived) = self.archived {
            if bookmark.is_archived != archived {
                return false;
            }
        }

        let created = bookmark.created_at.date_naive();
        if let Some(after) = self.created_after {
            if created < after {
                return false;
            }
        }
        if let Some(before) = self.created_before {
            if created > before {
                return false;
            }
        }

        self.text_fragments()
            .all(|fragment| Self::fragment_weight(bookmark, fragment) > 0)
    }

    /// Relevance score for ranking: each text fragment contributes the weight
    /// of its highest-priority matching field.
    pub fn score(&self, bookmark: &Bookmark) -> i32 {
        self.text_fragments()
            .map(|fragment| Self::fragment_weight(bookmark, fragment))
            .sum()
    }

    fn text_fragments(&self) -> impl Iterator<Item = &str> + '_ {
        self.phrases
            .iter()
            .map(String::as_str)
            .chain(self.terms.iter().map(String::as_str))
    }

    fn fragment_weight(bookmark: &Bookmark, fragment: &str) -> i32 {
        let fragment = fragment.to_lowercase();
        if bookmark.title.to_lowercase().contains(&fragment) {
            WEIGHT_TITLE
        } else if bookmark.description.to_lowercase().contains(&fragment) {
            WEIGHT_DESCRIPTION
        } else if bookmark.notes.to_lowercase().contains(&fragment) {
            WEIGHT_NOTES
        } else {
            0
        }
    }
}
