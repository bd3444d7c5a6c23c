// src/domain/tag.rs
use std::collections::HashSet;
use std::fmt;

use crate::domain::error::{DomainError, DomainResult};

/// Represents a single tag as a value object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    value: String,
}

impl Tag {
    /// Creates a new Tag with validation
    pub fn new<S: AsRef<str>>(value: S) -> DomainResult<Self> {
        let value = value.as_ref().trim().to_lowercase();

        if value.is_empty() {
            return Err(DomainError::InvalidTag("Tag cannot be empty".to_string()));
        }

        if value.contains(',') || value.contains(' ') {
            return Err(DomainError::InvalidTag(
                "Tag cannot contain commas or spaces".to_string(),
            ));
        }

        Ok(Self { value })
    }

    /// Get the tag value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Parse a comma-separated tag string into a set of valid Tags
    pub fn parse_tags<S: AsRef<str>>(tag_str: S) -> DomainResult<HashSet<Tag>> {
        let mut result = HashSet::new();

        for tag_value in tag_str
            .as_ref()
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
        {
            result.insert(Tag::new(tag_value)?);
        }

        Ok(result)
    }

    /// Parse an optional string into an `Option<HashSet<Tag>>`.
    ///
    /// Returns `None` if the input is `None` or an empty string.
    pub fn parse_tag_option(
        tag_str: Option<impl AsRef<str>>,
    ) -> DomainResult<Option<HashSet<Tag>>> {
        match tag_str {
            None => Ok(None),
            Some(s) => {
                let s = s.as_ref();
                if s.is_empty() {
                    Ok(None)
                } else {
                    Tag::parse_tags(s).map(Some)
                }
            }
        }
    }

    /// Format a set of tags into a normalized tag string in the format ",tag1,tag2,"
    pub fn format_tags(tags: &HashSet<Tag>) -> String {
        let mut tag_values: Vec<_> = tags.iter().map(|tag| tag.value.clone()).collect();

        tag_values.sort();

        if tag_values.is_empty() {
            ",,".to_string()
        } else {
            format!(",{},", tag_values.join(","))
        }
    }

    /// Check if a set of tags contains all of another set of tags
    pub fn contains_all(haystack: &HashSet<Tag>, needles: &HashSet<Tag>) -> bool {
        needles.iter().all(|tag| haystack.contains(tag))
    }

    /// Check if a set of tags contains any of another set of tags
    pub fn contains_any(haystack: &HashSet<Tag>, needles: &HashSet<Tag>) -> bool {
        !needles.is_empty() && needles.iter().any(|tag| haystack.contains(tag))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_valid_tag_value_when_create_tag_then_returns_tag() {
        let tag = Tag::new("test").unwrap();
        assert_eq!(tag.value(), "test");
    }

    #[test]
    fn given_uppercase_value_when_create_tag_then_lowercases() {
        let tag = Tag::new("RusT").unwrap();
        assert_eq!(tag.value(), "rust");
    }

    #[test]
    fn given_empty_value_when_create_tag_then_returns_error() {
        assert!(Tag::new("").is_err());
        assert!(Tag::new("   ").is_err());
    }

    #[test]
    fn given_value_with_comma_or_space_when_create_tag_then_returns_error() {
        assert!(Tag::new("a,b").is_err());
        assert!(Tag::new("a b").is_err());
    }

    #[test]
    fn given_tag_string_when_parse_tags_then_returns_set() {
        let tags = Tag::parse_tags(",rust, cli,,web,").unwrap();
        assert_eq!(tags.len(), 3);
        assert!(tags.contains(&Tag::new("rust").unwrap()));
        assert!(tags.contains(&Tag::new("cli").unwrap()));
        assert!(tags.contains(&Tag::new("web").unwrap()));
    }

    #[test]
    fn given_tags_when_format_tags_then_returns_sorted_normalized_string() {
        let mut tags = HashSet::new();
        tags.insert(Tag::new("web").unwrap());
        tags.insert(Tag::new("rust").unwrap());

        assert_eq!(Tag::format_tags(&tags), ",rust,web,");
        assert_eq!(Tag::format_tags(&HashSet::new()), ",,");
    }

    #[test]
    fn given_sets_when_contains_helpers_then_match_membership() {
        let haystack = Tag::parse_tags("a,b,c").unwrap();
        let all = Tag::parse_tags("a,b").unwrap();
        let some = Tag::parse_tags("c,d").unwrap();
        let none = Tag::parse_tags("x").unwrap();

        assert!(Tag::contains_all(&haystack, &all));
        assert!(!Tag::contains_all(&haystack, &some));
        assert!(Tag::contains_any(&haystack, &some));
        assert!(!Tag::contains_any(&haystack, &none));
        assert!(!Tag::contains_any(&haystack, &HashSet::new()));
    }
}
