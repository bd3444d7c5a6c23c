// src/domain/activity.rs
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;

use crate::domain::error::{DomainError, DomainResult};

/// Kinds of bookmark activity recorded in the append-only log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityType {
    Created,
    Updated,
    Visited,
    Favorited,
    Unfavorited,
    Archived,
    Unarchived,
    Merged,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Created => "created",
            ActivityType::Updated => "updated",
            ActivityType::Visited => "visited",
            ActivityType::Favorited => "favorited",
            ActivityType::Unfavorited => "unfavorited",
            ActivityType::Archived => "archived",
            ActivityType::Unarchived => "unarchived",
            ActivityType::Merged => "merged",
        }
    }

    pub fn parse(value: &str) -> DomainResult<Self> {
        match value {
            "created" => Ok(ActivityType::Created),
            "updated" => Ok(ActivityType::Updated),
            "visited" => Ok(ActivityType::Visited),
            "favorited" => Ok(ActivityType::Favorited),
            "unfavorited" => Ok(ActivityType::Unfavorited),
            "archived" => Ok(ActivityType::Archived),
            "unarchived" => Ok(ActivityType::Unarchived),
            "merged" => Ok(ActivityType::Merged),
            other => Err(DomainError::Other(format!(
                "Unknown activity type: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable append-only log entry for a bookmark mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct BookmarkActivity {
    pub id: Option<i32>,
    pub bookmark_id: i32,
    pub user_id: i32,
    pub activity_type: ActivityType,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
}

impl BookmarkActivity {
    pub fn new(bookmark_id: i32, user_id: i32, activity_type: ActivityType, metadata: Value) -> Self {
        Self {
            id: None,
            bookmark_id,
            user_id,
            activity_type,
            metadata,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_every_variant_when_round_trip_then_stable() {
        let variants = [
            ActivityType::Created,
            ActivityType::Updated,
            ActivityType::Visited,
            ActivityType::Favorited,
            ActivityType::Unfavorited,
            ActivityType::Archived,
            ActivityType::Unarchived,
            ActivityType::Merged,
        ];
        for variant in variants {
            assert_eq!(ActivityType::parse(variant.as_str()).unwrap(), variant);
        }
    }

    #[test]
    fn given_unknown_string_when_parse_then_error() {
        assert!(ActivityType::parse("deleted").is_err());
    }
}
