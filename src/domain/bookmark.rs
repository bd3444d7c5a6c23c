// src/domain/bookmark.rs
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tag::Tag;
use crate::domain::url_norm;
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use std::collections::HashSet;
use std::fmt;

/// Represents a bookmark domain entity
#[derive(Builder, Clone, PartialEq)]
#[builder(setter(into))]
pub struct Bookmark {
    #[builder(default)]
    pub id: Option<i32>,
    pub user_id: i32,
    pub url: String,
    #[builder(default)]
    pub title: String,
    #[builder(default)]
    pub description: String,
    #[builder(default)]
    pub notes: String,
    /// Lowercased URL host, derived at write time.
    #[builder(default)]
    pub domain: String,
    #[builder(default)]
    pub tags: HashSet<Tag>,
    #[builder(default)]
    pub favicon_url: Option<String>,
    #[builder(default)]
    pub screenshot_url: Option<String>,
    #[builder(default)]
    pub collection_id: Option<i32>,
    #[builder(default = "false")]
    pub is_favorite: bool,
    #[builder(default = "false")]
    pub is_archived: bool,
    #[builder(default = "false")]
    pub is_read: bool,
    #[builder(default = "chrono::Utc::now()")]
    pub created_at: DateTime<Utc>,
    #[builder(default = "chrono::Utc::now()")]
    pub updated_at: DateTime<Utc>,
    #[builder(default)]
    pub visited_at: Option<DateTime<Utc>>,
}

impl Bookmark {
    pub fn new<S: AsRef<str>>(
        user_id: i32,
        url: S,
        title: S,
        description: S,
        tags: HashSet<Tag>,
    ) -> DomainResult<Self> {
        let url_str = url.as_ref().trim();
        if url_str.is_empty() {
            return Err(DomainError::InvalidUrl("URL cannot be empty".to_string()));
        }

        let now = Utc::now();
        Ok(Self {
            id: None,
            user_id,
            url: url_str.to_string(),
            title: title.as_ref().to_string(),
            description: description.as_ref().to_string(),
            notes: String::new(),
            domain: url_norm::host_of(url_str),
            tags,
            favicon_url: None,
            screenshot_url: None,
            collection_id: None,
            is_favorite: false,
            is_archived: false,
            is_read: false,
            created_at: now,
            updated_at: now,
            visited_at: None,
        })
    }

    //noinspection RsExternalLinter
    #[allow(clippy::too_many_arguments)]
    pub fn from_storage(
        id: i32,
        user_id: i32,
        url: String,
        title: String,
        description: String,
        notes: String,
        domain: String,
        tag_string: String,
        favicon_url: Option<String>,
        screenshot_url: Option<String>,
        collection_id: Option<i32>,
        is_favorite: bool,
        is_archived: bool,
        is_read: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        visited_at: Option<DateTime<Utc>>,
    ) -> DomainResult<Self> {
        let tags = Tag::parse_tags(tag_string)?;

        Ok(Self {
            id: Some(id),
            user_id,
            url,
            title,
            description,
            notes,
            domain,
            tags,
            favicon_url,
            screenshot_url,
            collection_id,
            is_favorite,
            is_archived,
            is_read,
            created_at,
            updated_at,
            visited_at,
        })
    }

    /// Add a tag to the bookmark
    pub fn add_tag(&mut self, tag: Tag) {
        self.tags.insert(tag);
        self.updated_at = Utc::now();
    }

    /// Remove a tag from the bookmark
    pub fn remove_tag(&mut self, tag: &Tag) -> DomainResult<()> {
        if !self.tags.remove(tag) {
            return Err(DomainError::TagOperationFailed(format!(
                "Tag '{}' not found on bookmark",
                tag
            )));
        }

        self.updated_at = Utc::now();
        Ok(())
    }

    /// Get formatted tag string in the format ",tag1,tag2,"
    pub fn formatted_tags(&self) -> String {
        Tag::format_tags(&self.tags)
    }

    /// Replace the URL, recomputing the derived domain.
    pub fn set_url<S: AsRef<str>>(&mut self, url: S) {
        self.url = url.as_ref().to_string();
        self.domain = url_norm::host_of(&self.url);
        self.updated_at = Utc::now();
    }

    /// Fold a duplicate's data into this bookmark.
    ///
    /// Tags are unioned. Empty scalar fields (title, description, notes,
    /// favicon, screenshot) adopt the duplicate's value if it has one; a field
    /// already filled is never overwritten, so iterating duplicates in order
    /// gives first-match-wins semantics. Favorite and read flags accumulate,
    /// and the earliest creation timestamp wins.
    pub fn absorb_duplicate(&mut self, other: &Bookmark) {
        self.tags.extend(other.tags.iter().cloned());

        if self.title.is_empty() && !other.title.is_empty() {
            self.title = other.title.clone();
        }
        if self.description.is_empty() && !other.description.is_empty() {
            self.description = other.description.clone();
        }
        if self.notes.is_empty() && !other.notes.is_empty() {
            self.notes = other.notes.clone();
        }
        if self.favicon_url.is_none() {
            self.favicon_url = other.favicon_url.clone();
        }
        if self.screenshot_url.is_none() {
            self.screenshot_url = other.screenshot_url.clone();
        }

        self.is_favorite = self.is_favorite || other.is_favorite;
        self.is_read = self.is_read || other.is_read;

        if other.created_at < self.created_at {
            self.created_at = other.created_at;
        }

        self.updated_at = Utc::now();
    }
}

impl fmt::Display for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} ({})",
            self.id.map_or("New".to_string(), |id| id.to_string()),
            self.title,
            self.url,
            Tag::format_tags(&self.tags)
        )
    }
}

impl fmt::Debug for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bookmark")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("url", &self.url)
            .field("title", &self.title)
            .field("domain", &self.domain)
            .field("tags", &self.tags)
            .field("is_favorite", &self.is_favorite)
            .field("is_archived", &self.is_archived)
            .field("is_read", &self.is_read)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}
