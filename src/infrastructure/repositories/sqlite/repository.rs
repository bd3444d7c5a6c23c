// src/infrastructure/repositories/sqlite/repository.rs

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tracing::{error, instrument};

use super::connection::{ConnectionPool, PooledConnection};
use super::error::{SqliteRepositoryError, SqliteResult};
use crate::domain::activity::{ActivityType, BookmarkActivity};
use crate::domain::bookmark::Bookmark;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::health::{HealthStatus, HealthSummary, LinkHealth};
use crate::domain::note::BookmarkNote;
use crate::domain::repositories::health_repository::HealthRepository;
use crate::domain::repositories::repository::BookmarkRepository;
use crate::infrastructure::repositories::sqlite::model::{
    DbActivity, DbBookmark, DbBookmarkChanges, DbLinkHealth, DbNote, LinkHealthChanges,
    NewActivity, NewBookmark, NewLinkHealth, NewNote,
};
use crate::infrastructure::repositories::sqlite::schema::{
    bookmark_activities, bookmark_notes, bookmarks, link_health,
};

#[derive(Clone, Debug)]
pub struct SqliteBookmarkRepository {
    pool: ConnectionPool,
}

impl SqliteBookmarkRepository {
    /// Create a new SQLite repository with the provided connection pool
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    /// Create a new SQLite repository with the provided database URL
    #[instrument(skip_all, level = "debug")]
    pub fn from_url(database_url: &str) -> SqliteResult<Self> {
        let pool = super::connection::init_pool(database_url)?;
        Ok(Self { pool })
    }

    /// Get a connection from the pool
    #[instrument(skip_all, level = "trace")]
    pub fn get_connection(&self) -> SqliteResult<PooledConnection> {
        self.pool
            .get()
            .map_err(|e| SqliteRepositoryError::ConnectionPoolError(e.to_string()))
    }

    /// Convert a database row to a domain entity
    fn to_domain_bookmark(db_bookmark: DbBookmark) -> SqliteResult<Bookmark> {
        let created_at = DateTime::<Utc>::from_naive_utc_and_offset(db_bookmark.created_ts, Utc);
        let updated_at = DateTime::<Utc>::from_naive_utc_and_offset(db_bookmark.updated_ts, Utc);
        let visited_at = db_bookmark
            .visited_ts
            .map(|ts| DateTime::<Utc>::from_naive_utc_and_offset(ts, Utc));

        Bookmark::from_storage(
            db_bookmark.id,
            db_bookmark.user_id,
            db_bookmark.url,
            db_bookmark.title,
            db_bookmark.desc,
            db_bookmark.notes,
            db_bookmark.domain,
            db_bookmark.tags,
            db_bookmark.favicon_url,
            db_bookmark.screenshot_url,
            db_bookmark.collection_id,
            db_bookmark.is_favorite,
            db_bookmark.is_archived,
            db_bookmark.is_read,
            created_at,
            updated_at,
            visited_at,
        )
        .map_err(|e| {
            SqliteRepositoryError::ConversionError(format!(
                "Failed to create domain bookmark from DB row for ID {}: {}",
                db_bookmark.id, e
            ))
        })
    }

    fn to_bookmark_changes(bookmark: &Bookmark) -> DbBookmarkChanges {
        DbBookmarkChanges {
            url: bookmark.url.clone(),
            title: bookmark.title.clone(),
            desc: bookmark.description.clone(),
            notes: bookmark.notes.clone(),
            domain: bookmark.domain.clone(),
            tags: bookmark.formatted_tags(),
            favicon_url: bookmark.favicon_url.clone(),
            screenshot_url: bookmark.screenshot_url.clone(),
            collection_id: bookmark.collection_id,
            is_favorite: bookmark.is_favorite,
            is_archived: bookmark.is_archived,
            is_read: bookmark.is_read,
            created_ts: bookmark.created_at.naive_utc(),
            updated_ts: bookmark.updated_at.naive_utc(),
            visited_ts: bookmark.visited_at.map(|ts| ts.naive_utc()),
        }
    }

    fn to_domain_note(db_note: DbNote) -> BookmarkNote {
        BookmarkNote {
            id: Some(db_note.id),
            bookmark_id: db_note.bookmark_id,
            user_id: db_note.user_id,
            content: db_note.content,
            is_active: db_note.is_active,
            parent_id: db_note.parent_id,
            created_at: DateTime::<Utc>::from_naive_utc_and_offset(db_note.created_ts, Utc),
            updated_at: DateTime::<Utc>::from_naive_utc_and_offset(db_note.updated_ts, Utc),
        }
    }

    fn to_domain_activity(db_activity: DbActivity) -> SqliteResult<BookmarkActivity> {
        let activity_type = ActivityType::parse(&db_activity.activity_type).map_err(|e| {
            SqliteRepositoryError::ConversionError(format!(
                "Activity {} has invalid type: {}",
                db_activity.id, e
            ))
        })?;

        Ok(BookmarkActivity {
            id: Some(db_activity.id),
            bookmark_id: db_activity.bookmark_id,
            user_id: db_activity.user_id,
            activity_type,
            metadata: serde_json::from_str(&db_activity.metadata)
                .unwrap_or(serde_json::Value::Null),
            created_at: DateTime::<Utc>::from_naive_utc_and_offset(db_activity.created_ts, Utc),
        })
    }

    fn to_domain_health(db_health: DbLinkHealth) -> SqliteResult<LinkHealth> {
        let status = HealthStatus::parse(&db_health.status).map_err(|e| {
            SqliteRepositoryError::ConversionError(format!(
                "Health record {} has invalid status: {}",
                db_health.id, e
            ))
        })?;

        Ok(LinkHealth {
            id: Some(db_health.id),
            bookmark_id: db_health.bookmark_id,
            status,
            last_checked: db_health
                .last_checked
                .map(|ts| DateTime::<Utc>::from_naive_utc_and_offset(ts, Utc)),
            next_check: db_health
                .next_check
                .map(|ts| DateTime::<Utc>::from_naive_utc_and_offset(ts, Utc)),
            final_url: db_health.final_url,
            status_code: db_health.status_code,
            response_time_ms: db_health.response_time_ms,
            error_message: db_health.error_message,
            archive_url: db_health.archive_url,
            check_count: db_health.check_count,
        })
    }

    fn to_health_changes(health: &LinkHealth) -> LinkHealthChanges {
        LinkHealthChanges {
            status: health.status.as_str().to_string(),
            last_checked: health.last_checked.map(|ts| ts.naive_utc()),
            next_check: health.next_check.map(|ts| ts.naive_utc()),
            final_url: health.final_url.clone(),
            status_code: health.status_code,
            response_time_ms: health.response_time_ms,
            error_message: health.error_message.clone(),
            archive_url: health.archive_url.clone(),
            check_count: health.check_count,
        }
    }

    fn load_bookmarks(rows: Vec<DbBookmark>) -> Vec<Bookmark> {
        rows.into_iter()
            .filter_map(|row| match Self::to_domain_bookmark(row) {
                Ok(bookmark) => Some(bookmark),
                Err(e) => {
                    error!("Failed to convert bookmark: {}", e);
                    None
                }
            })
            .collect()
    }
}

impl BookmarkRepository for SqliteBookmarkRepository {
    #[instrument(skip_all, level = "debug")]
    fn get_by_id(&self, id: i32) -> DomainResult<Option<Bookmark>> {
        let mut conn = self.get_connection()?;

        let result = bookmarks::table
            .filter(bookmarks::id.eq(id))
            .first::<DbBookmark>(&mut conn)
            .optional()
            .map_err(SqliteRepositoryError::DatabaseError)?;

        match result {
            Some(db_bookmark) => Ok(Some(Self::to_domain_bookmark(db_bookmark)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip_all, level = "debug")]
    fn get_by_url(&self, user_id: i32, url: &str) -> DomainResult<Option<Bookmark>> {
        let mut conn = self.get_connection()?;

        let result = bookmarks::table
            .filter(bookmarks::user_id.eq(user_id))
            .filter(bookmarks::url.eq(url))
            .first::<DbBookmark>(&mut conn)
            .optional()
            .map_err(SqliteRepositoryError::DatabaseError)?;

        match result {
            Some(db_bookmark) => Ok(Some(Self::to_domain_bookmark(db_bookmark)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip_all, level = "debug")]
    fn get_all_for_user(&self, user_id: i32) -> DomainResult<Vec<Bookmark>> {
        let mut conn = self.get_connection()?;

        let rows = bookmarks::table
            .filter(bookmarks::user_id.eq(user_id))
            .order(bookmarks::id.asc())
            .load::<DbBookmark>(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        Ok(Self::load_bookmarks(rows))
    }

    #[instrument(skip_all, level = "debug")]
    fn get_active_for_user(&self, user_id: i32) -> DomainResult<Vec<Bookmark>> {
        let mut conn = self.get_connection()?;

        let rows = bookmarks::table
            .filter(bookmarks::user_id.eq(user_id))
            .filter(bookmarks::is_archived.eq(false))
            .order(bookmarks::id.asc())
            .load::<DbBookmark>(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        Ok(Self::load_bookmarks(rows))
    }

    #[instrument(skip_all, level = "debug")]
    fn add(&self, bookmark: &mut Bookmark) -> DomainResult<()> {
        let mut conn = self.get_connection()?;

        let new_bookmark = NewBookmark {
            user_id: bookmark.user_id,
            url: bookmark.url.clone(),
            title: bookmark.title.clone(),
            desc: bookmark.description.clone(),
            notes: bookmark.notes.clone(),
            domain: bookmark.domain.clone(),
            tags: bookmark.formatted_tags(),
            favicon_url: bookmark.favicon_url.clone(),
            screenshot_url: bookmark.screenshot_url.clone(),
            collection_id: bookmark.collection_id,
            is_favorite: bookmark.is_favorite,
            is_archived: bookmark.is_archived,
            is_read: bookmark.is_read,
            created_ts: bookmark.created_at.naive_utc(),
            updated_ts: bookmark.updated_at.naive_utc(),
            visited_ts: bookmark.visited_at.map(|ts| ts.naive_utc()),
        };

        let id = diesel::insert_into(bookmarks::table)
            .values(&new_bookmark)
            .returning(bookmarks::id)
            .get_result::<i32>(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        bookmark.id = Some(id);
        Ok(())
    }

    #[instrument(skip_all, level = "debug")]
    fn update(&self, bookmark: &Bookmark) -> DomainResult<()> {
        let id = bookmark.id.ok_or_else(|| {
            DomainError::BookmarkOperationFailed("Bookmark ID is required for update".to_string())
        })?;

        let mut conn = self.get_connection()?;
        let changes = Self::to_bookmark_changes(bookmark);

        let rows = diesel::update(bookmarks::table.filter(bookmarks::id.eq(id)))
            .set(&changes)
            .execute(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        if rows == 0 {
            return Err(SqliteRepositoryError::BookmarkNotFound(id).into());
        }
        Ok(())
    }

    #[instrument(skip_all, level = "debug")]
    fn delete(&self, id: i32) -> DomainResult<bool> {
        let mut conn = self.get_connection()?;

        let deleted = conn
            .transaction::<_, SqliteRepositoryError, _>(|conn| {
                diesel::delete(bookmark_notes::table.filter(bookmark_notes::bookmark_id.eq(id)))
                    .execute(conn)?;
                diesel::delete(
                    bookmark_activities::table.filter(bookmark_activities::bookmark_id.eq(id)),
                )
                .execute(conn)?;
                diesel::delete(link_health::table.filter(link_health::bookmark_id.eq(id)))
                    .execute(conn)?;

                let rows = diesel::delete(bookmarks::table.filter(bookmarks::id.eq(id)))
                    .execute(conn)?;
                Ok(rows > 0)
            })?;

        Ok(deleted)
    }

    #[instrument(skip_all, level = "debug")]
    fn get_active_note(&self, bookmark_id: i32) -> DomainResult<Option<BookmarkNote>> {
        let mut conn = self.get_connection()?;

        let result = bookmark_notes::table
            .filter(bookmark_notes::bookmark_id.eq(bookmark_id))
            .filter(bookmark_notes::is_active.eq(true))
            .order(bookmark_notes::updated_ts.desc())
            .first::<DbNote>(&mut conn)
            .optional()
            .map_err(SqliteRepositoryError::DatabaseError)?;

        Ok(result.map(Self::to_domain_note))
    }

    #[instrument(skip_all, level = "debug")]
    fn get_notes(&self, bookmark_id: i32) -> DomainResult<Vec<BookmarkNote>> {
        let mut conn = self.get_connection()?;

        let rows = bookmark_notes::table
            .filter(bookmark_notes::bookmark_id.eq(bookmark_id))
            .order(bookmark_notes::updated_ts.desc())
            .load::<DbNote>(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        Ok(rows.into_iter().map(Self::to_domain_note).collect())
    }

    #[instrument(skip_all, level = "debug")]
    fn add_note(&self, note: &mut BookmarkNote) -> DomainResult<()> {
        let mut conn = self.get_connection()?;

        let new_note = NewNote {
            bookmark_id: note.bookmark_id,
            user_id: note.user_id,
            content: note.content.clone(),
            is_active: note.is_active,
            parent_id: note.parent_id,
            created_ts: note.created_at.naive_utc(),
            updated_ts: note.updated_at.naive_utc(),
        };

        let id = diesel::insert_into(bookmark_notes::table)
            .values(&new_note)
            .returning(bookmark_notes::id)
            .get_result::<i32>(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        note.id = Some(id);
        Ok(())
    }

    #[instrument(skip_all, level = "debug")]
    fn apply_merge(
        &self,
        primary: &Bookmark,
        retired_note_id: Option<i32>,
        adopted_note: Option<&BookmarkNote>,
    ) -> DomainResult<()> {
        let id = primary.id.ok_or_else(|| {
            DomainError::BookmarkOperationFailed("Merge primary must have an ID".to_string())
        })?;

        let mut conn = self.get_connection()?;
        let changes = Self::to_bookmark_changes(primary);

        conn.transaction::<_, SqliteRepositoryError, _>(|conn| {
            let rows = diesel::update(bookmarks::table.filter(bookmarks::id.eq(id)))
                .set(&changes)
                .execute(conn)?;
            if rows == 0 {
                return Err(SqliteRepositoryError::BookmarkNotFound(id));
            }

            if let Some(note_id) = retired_note_id {
                diesel::update(bookmark_notes::table.filter(bookmark_notes::id.eq(note_id)))
                    .set((
                        bookmark_notes::is_active.eq(false),
                        bookmark_notes::updated_ts.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)?;
            }

            if let Some(note) = adopted_note {
                let new_note = NewNote {
                    bookmark_id: note.bookmark_id,
                    user_id: note.user_id,
                    content: note.content.clone(),
                    is_active: note.is_active,
                    parent_id: note.parent_id,
                    created_ts: note.created_at.naive_utc(),
                    updated_ts: note.updated_at.naive_utc(),
                };
                diesel::insert_into(bookmark_notes::table)
                    .values(&new_note)
                    .execute(conn)?;
            }

            Ok(())
        })?;

        Ok(())
    }

    #[instrument(skip_all, level = "debug")]
    fn append_activity(&self, activity: &BookmarkActivity) -> DomainResult<()> {
        let mut conn = self.get_connection()?;

        let new_activity = NewActivity {
            bookmark_id: activity.bookmark_id,
            user_id: activity.user_id,
            activity_type: activity.activity_type.as_str().to_string(),
            metadata: activity.metadata.to_string(),
            created_ts: activity.created_at.naive_utc(),
        };

        diesel::insert_into(bookmark_activities::table)
            .values(&new_activity)
            .execute(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        Ok(())
    }

    #[instrument(skip_all, level = "debug")]
    fn get_activities(
        &self,
        bookmark_id: i32,
        activity_type: Option<ActivityType>,
    ) -> DomainResult<Vec<BookmarkActivity>> {
        let mut conn = self.get_connection()?;

        let mut query = bookmark_activities::table
            .filter(bookmark_activities::bookmark_id.eq(bookmark_id))
            .into_boxed();

        if let Some(activity_type) = activity_type {
            query = query
                .filter(bookmark_activities::activity_type.eq(activity_type.as_str().to_string()));
        }

        let rows = query
            .order(bookmark_activities::created_ts.desc())
            .load::<DbActivity>(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        let mut activities = Vec::with_capacity(rows.len());
        for row in rows {
            activities.push(Self::to_domain_activity(row)?);
        }
        Ok(activities)
    }
}

impl HealthRepository for SqliteBookmarkRepository {
    #[instrument(skip_all, level = "debug")]
    fn get_for_bookmark(&self, bookmark_id: i32) -> DomainResult<Option<LinkHealth>> {
        let mut conn = self.get_connection()?;

        let result = link_health::table
            .filter(link_health::bookmark_id.eq(bookmark_id))
            .first::<DbLinkHealth>(&mut conn)
            .optional()
            .map_err(SqliteRepositoryError::DatabaseError)?;

        match result {
            Some(db_health) => Ok(Some(Self::to_domain_health(db_health)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip_all, level = "debug")]
    fn upsert(&self, health: &mut LinkHealth) -> DomainResult<()> {
        let mut conn = self.get_connection()?;
        let changes = Self::to_health_changes(health);

        let existing_id: Option<i32> = link_health::table
            .filter(link_health::bookmark_id.eq(health.bookmark_id))
            .select(link_health::id)
            .first::<i32>(&mut conn)
            .optional()
            .map_err(SqliteRepositoryError::DatabaseError)?;

        match existing_id {
            Some(id) => {
                diesel::update(link_health::table.filter(link_health::id.eq(id)))
                    .set(&changes)
                    .execute(&mut conn)
                    .map_err(SqliteRepositoryError::DatabaseError)?;
                health.id = Some(id);
            }
            None => {
                let new_health = NewLinkHealth {
                    bookmark_id: health.bookmark_id,
                    status: changes.status.clone(),
                    last_checked: changes.last_checked,
                    next_check: changes.next_check,
                    final_url: changes.final_url.clone(),
                    status_code: changes.status_code,
                    response_time_ms: changes.response_time_ms,
                    error_message: changes.error_message.clone(),
                    archive_url: changes.archive_url.clone(),
                    check_count: changes.check_count,
                };
                let id = diesel::insert_into(link_health::table)
                    .values(&new_health)
                    .returning(link_health::id)
                    .get_result::<i32>(&mut conn)
                    .map_err(SqliteRepositoryError::DatabaseError)?;
                health.id = Some(id);
            }
        }

        Ok(())
    }

    #[instrument(skip_all, level = "debug")]
    fn unchecked_bookmarks(
        &self,
        user_id: Option<i32>,
        limit: usize,
    ) -> DomainResult<Vec<Bookmark>> {
        let mut conn = self.get_connection()?;

        let mut query = bookmarks::table
            .left_join(link_health::table)
            .filter(bookmarks::is_archived.eq(false))
            .filter(link_health::id.nullable().is_null())
            .select(bookmarks::all_columns)
            .into_boxed();

        if let Some(user_id) = user_id {
            query = query.filter(bookmarks::user_id.eq(user_id));
        }

        let rows = query
            .order(bookmarks::id.asc())
            .limit(limit as i64)
            .load::<DbBookmark>(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        Ok(Self::load_bookmarks(rows))
    }

    #[instrument(skip_all, level = "debug")]
    fn due_bookmarks(
        &self,
        user_id: Option<i32>,
        now: DateTime<Utc>,
        limit: usize,
    ) -> DomainResult<Vec<Bookmark>> {
        let mut conn = self.get_connection()?;

        let mut query = bookmarks::table
            .inner_join(link_health::table)
            .filter(bookmarks::is_archived.eq(false))
            .filter(
                link_health::next_check
                    .le(now.naive_utc())
                    .or(link_health::status.eq(HealthStatus::Pending.as_str())),
            )
            .select((bookmarks::all_columns, link_health::all_columns))
            .into_boxed();

        if let Some(user_id) = user_id {
            query = query.filter(bookmarks::user_id.eq(user_id));
        }

        let rows = query
            .load::<(DbBookmark, DbLinkHealth)>(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        // Broken-first, then oldest-checked-first; never-checked sorts ahead
        // of any timestamp.
        fn status_priority(status: &str) -> u8 {
            match status {
                "broken" => 0,
                "archived" => 1,
                "pending" => 2,
                "redirected" => 3,
                _ => 4,
            }
        }

        let mut rows = rows;
        rows.sort_by(|(_, a), (_, b)| {
            status_priority(&a.status)
                .cmp(&status_priority(&b.status))
                .then(a.last_checked.cmp(&b.last_checked))
        });
        rows.truncate(limit);

        Ok(Self::load_bookmarks(rows.into_iter().map(|(b, _)| b).collect()))
    }

    #[instrument(skip_all, level = "debug")]
    fn summary(&self, user_id: Option<i32>) -> DomainResult<HealthSummary> {
        let mut conn = self.get_connection()?;

        let mut status_query = link_health::table
            .inner_join(bookmarks::table)
            .select(link_health::status)
            .into_boxed();

        if let Some(user_id) = user_id {
            status_query = status_query.filter(bookmarks::user_id.eq(user_id));
        }

        let statuses = status_query
            .load::<String>(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        let mut summary = HealthSummary::default();
        for status in statuses {
            match status.as_str() {
                "ok" => summary.ok += 1,
                "redirected" => summary.redirected += 1,
                "broken" => summary.broken += 1,
                "archived" => summary.archived += 1,
                _ => summary.pending += 1,
            }
        }

        let mut unchecked_query = bookmarks::table
            .left_join(link_health::table)
            .filter(bookmarks::is_archived.eq(false))
            .filter(link_health::id.nullable().is_null())
            .select(bookmarks::id)
            .into_boxed();

        if let Some(user_id) = user_id {
            unchecked_query = unchecked_query.filter(bookmarks::user_id.eq(user_id));
        }

        let unchecked_ids = unchecked_query
            .load::<i32>(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;
        summary.unchecked = unchecked_ids.len();

        Ok(summary)
    }
}
