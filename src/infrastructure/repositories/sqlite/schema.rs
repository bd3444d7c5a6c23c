// src/infrastructure/repositories/sqlite/schema.rs

diesel::table! {
    bookmarks (id) {
        id -> Integer,
        user_id -> Integer,
        url -> Text,
        title -> Text,
        desc -> Text,
        notes -> Text,
        domain -> Text,
        tags -> Text,
        favicon_url -> Nullable<Text>,
        screenshot_url -> Nullable<Text>,
        collection_id -> Nullable<Integer>,
        is_favorite -> Bool,
        is_archived -> Bool,
        is_read -> Bool,
        created_ts -> Timestamp,
        updated_ts -> Timestamp,
        visited_ts -> Nullable<Timestamp>,
    }
}

diesel::table! {
    bookmark_notes (id) {
        id -> Integer,
        bookmark_id -> Integer,
        user_id -> Integer,
        content -> Text,
        is_active -> Bool,
        parent_id -> Nullable<Integer>,
        created_ts -> Timestamp,
        updated_ts -> Timestamp,
    }
}

diesel::table! {
    bookmark_activities (id) {
        id -> Integer,
        bookmark_id -> Integer,
        user_id -> Integer,
        activity_type -> Text,
        metadata -> Text,
        created_ts -> Timestamp,
    }
}

diesel::table! {
    link_health (id) {
        id -> Integer,
        bookmark_id -> Integer,
        status -> Text,
        last_checked -> Nullable<Timestamp>,
        next_check -> Nullable<Timestamp>,
        final_url -> Nullable<Text>,
        status_code -> Nullable<Integer>,
        response_time_ms -> Nullable<Integer>,
        error_message -> Text,
        archive_url -> Nullable<Text>,
        check_count -> Integer,
    }
}

diesel::joinable!(bookmark_notes -> bookmarks (bookmark_id));
diesel::joinable!(bookmark_activities -> bookmarks (bookmark_id));
diesel::joinable!(link_health -> bookmarks (bookmark_id));

diesel::allow_tables_to_appear_in_same_query!(
    bookmarks,
    bookmark_notes,
    bookmark_activities,
    link_health,
);
