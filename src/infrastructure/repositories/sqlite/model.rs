// src/infrastructure/repositories/sqlite/model.rs
use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable};

use crate::infrastructure::repositories::sqlite::schema::{
    bookmark_activities, bookmark_notes, bookmarks, link_health,
};

#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = bookmarks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbBookmark {
    pub id: i32,
    pub user_id: i32,
    pub url: String,
    pub title: String,
    pub desc: String,
    pub notes: String,
    pub domain: String,
    pub tags: String,
    pub favicon_url: Option<String>,
    pub screenshot_url: Option<String>,
    pub collection_id: Option<i32>,
    pub is_favorite: bool,
    pub is_archived: bool,
    pub is_read: bool,
    pub created_ts: NaiveDateTime,
    pub updated_ts: NaiveDateTime,
    pub visited_ts: Option<NaiveDateTime>,
}

/// New bookmark for insertion
#[derive(Insertable, Debug)]
#[diesel(table_name = bookmarks)]
pub struct NewBookmark {
    pub user_id: i32,
    pub url: String,
    pub title: String,
    pub desc: String,
    pub notes: String,
    pub domain: String,
    pub tags: String,
    pub favicon_url: Option<String>,
    pub screenshot_url: Option<String>,
    pub collection_id: Option<i32>,
    pub is_favorite: bool,
    pub is_archived: bool,
    pub is_read: bool,
    pub created_ts: NaiveDateTime,
    pub updated_ts: NaiveDateTime,
    pub visited_ts: Option<NaiveDateTime>,
}

/// Changes for updating a bookmark
#[derive(AsChangeset, Debug)]
#[diesel(table_name = bookmarks)]
pub struct DbBookmarkChanges {
    pub url: String,
    pub title: String,
    pub desc: String,
    pub notes: String,
    pub domain: String,
    pub tags: String,
    #[diesel(treat_none_as_null = true)]
    pub favicon_url: Option<String>,
    #[diesel(treat_none_as_null = true)]
    pub screenshot_url: Option<String>,
    #[diesel(treat_none_as_null = true)]
    pub collection_id: Option<i32>,
    pub is_favorite: bool,
    pub is_archived: bool,
    pub is_read: bool,
    pub created_ts: NaiveDateTime,
    pub updated_ts: NaiveDateTime,
    #[diesel(treat_none_as_null = true)]
    pub visited_ts: Option<NaiveDateTime>,
}

#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = bookmark_notes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbNote {
    pub id: i32,
    pub bookmark_id: i32,
    pub user_id: i32,
    pub content: String,
    pub is_active: bool,
    pub parent_id: Option<i32>,
    pub created_ts: NaiveDateTime,
    pub updated_ts: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = bookmark_notes)]
pub struct NewNote {
    pub bookmark_id: i32,
    pub user_id: i32,
    pub content: String,
    pub is_active: bool,
    pub parent_id: Option<i32>,
    pub created_ts: NaiveDateTime,
    pub updated_ts: NaiveDateTime,
}

#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = bookmark_activities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbActivity {
    pub id: i32,
    pub bookmark_id: i32,
    pub user_id: i32,
    pub activity_type: String,
    pub metadata: String,
    pub created_ts: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = bookmark_activities)]
pub struct NewActivity {
    pub bookmark_id: i32,
    pub user_id: i32,
    pub activity_type: String,
    pub metadata: String,
    pub created_ts: NaiveDateTime,
}

#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = link_health)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbLinkHealth {
    pub id: i32,
    pub bookmark_id: i32,
    pub status: String,
    pub last_checked: Option<NaiveDateTime>,
    pub next_check: Option<NaiveDateTime>,
    pub final_url: Option<String>,
    pub status_code: Option<i32>,
    pub response_time_ms: Option<i32>,
    pub error_message: String,
    pub archive_url: Option<String>,
    pub check_count: i32,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = link_health)]
pub struct NewLinkHealth {
    pub bookmark_id: i32,
    pub status: String,
    pub last_checked: Option<NaiveDateTime>,
    pub next_check: Option<NaiveDateTime>,
    pub final_url: Option<String>,
    pub status_code: Option<i32>,
    pub response_time_ms: Option<i32>,
    pub error_message: String,
    pub archive_url: Option<String>,
    pub check_count: i32,
}

/// Changes for updating an existing health record
#[derive(AsChangeset, Debug)]
#[diesel(table_name = link_health)]
pub struct LinkHealthChanges {
    pub status: String,
    #[diesel(treat_none_as_null = true)]
    pub last_checked: Option<NaiveDateTime>,
    #[diesel(treat_none_as_null = true)]
    pub next_check: Option<NaiveDateTime>,
    #[diesel(treat_none_as_null = true)]
    pub final_url: Option<String>,
    #[diesel(treat_none_as_null = true)]
    pub status_code: Option<i32>,
    #[diesel(treat_none_as_null = true)]
    pub response_time_ms: Option<i32>,
    pub error_message: String,
    #[diesel(treat_none_as_null = true)]
    pub archive_url: Option<String>,
    pub check_count: i32,
}
