// src/cli/commands.rs
use crossterm::style::Stylize;
use serde_json::json;
use tracing::instrument;

use crate::application::error::ApplicationError;
use crate::cli::display;
use crate::cli::error::{CliError, CliResult};
use crate::domain::activity::{ActivityType, BookmarkActivity};
use crate::domain::bookmark::Bookmark;
use crate::domain::repositories::repository::BookmarkRepository;
use crate::domain::tag::Tag;
use crate::infrastructure::di::ServiceContainer;

#[instrument(skip(services), level = "debug")]
pub fn add_bookmark(
    services: &ServiceContainer,
    user_id: i32,
    url: &str,
    tags: Option<&str>,
    title: Option<&str>,
    description: Option<&str>,
    favorite: bool,
) -> CliResult<()> {
    let repository = &services.bookmark_repository;

    if let Some(existing) = repository.get_by_url(user_id, url)? {
        return Err(CliError::Application(ApplicationError::BookmarkExists(
            existing.id.unwrap_or(-1),
            url.to_string(),
        )));
    }

    let tags = Tag::parse_tag_option(tags)?.unwrap_or_default();
    let mut bookmark = Bookmark::new(
        user_id,
        url,
        title.unwrap_or(""),
        description.unwrap_or(""),
        tags,
    )?;
    bookmark.is_favorite = favorite;

    repository.add(&mut bookmark)?;

    if let Some(id) = bookmark.id {
        repository.append_activity(&BookmarkActivity::new(
            id,
            user_id,
            ActivityType::Created,
            json!({ "url": bookmark.url }),
        ))?;
    }

    println!("{}", "Added:".green().bold());
    display::print_bookmark(&bookmark);
    Ok(())
}

#[instrument(skip(services), level = "debug")]
pub fn search_bookmarks(
    services: &ServiceContainer,
    user_id: i32,
    query: &str,
    limit: Option<usize>,
) -> CliResult<()> {
    let mut results = services.search_service.search(user_id, query)?;
    let total = results.len();

    if let Some(limit) = limit {
        results.truncate(limit);
    }

    if results.is_empty() {
        println!("No bookmarks found");
        return Ok(());
    }

    for bookmark in &results {
        display::print_bookmark(bookmark);
    }
    println!("{}", format!("{} of {} bookmark(s)", results.len(), total).bold());
    Ok(())
}

#[instrument(skip(services), level = "debug")]
pub fn list_duplicates(services: &ServiceContainer, user_id: i32, as_json: bool) -> CliResult<()> {
    let groups = services.dedup_service.detect_duplicates(user_id)?;

    if as_json {
        let payload: Vec<serde_json::Value> = groups
            .iter()
            .map(|group| {
                json!({
                    "match": &group.kind,
                    "bookmarks": group
                        .bookmarks
                        .iter()
                        .map(|b| json!({ "id": b.id, "url": b.url, "title": b.title }))
                        .collect::<Vec<_>>(),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&payload)
                .map_err(|e| CliError::Other(format!("Failed to serialize groups: {}", e)))?
        );
        return Ok(());
    }

    if groups.is_empty() {
        println!("No duplicates found");
        return Ok(());
    }

    for (index, group) in groups.iter().enumerate() {
        display::print_duplicate_group(index, group);
    }
    println!("{}", format!("{} duplicate group(s)", groups.len()).bold());
    Ok(())
}

#[instrument(skip(services), level = "debug")]
pub fn merge_bookmarks(
    services: &ServiceContainer,
    primary_id: i32,
    ids: &str,
) -> CliResult<()> {
    let duplicate_ids = parse_ids(ids)?;

    let outcome = services.merge_service.merge(primary_id, &duplicate_ids)?;

    println!(
        "{}",
        format!("Merged {} bookmark(s) into:", outcome.merged.len())
            .green()
            .bold()
    );
    display::print_bookmark(&outcome.bookmark);

    for failure in &outcome.failed {
        eprintln!(
            "{}",
            format!(
                "Warning: duplicate {} could not be removed: {}",
                failure.bookmark_id, failure.reason
            )
            .yellow()
        );
    }
    Ok(())
}

#[instrument(skip(services), level = "debug")]
pub fn check_url(services: &ServiceContainer, url: &str) -> CliResult<()> {
    let check = services.health_service.check_url(url);
    display::print_health_check(url, &check);
    Ok(())
}

#[instrument(skip(services), level = "debug")]
pub fn run_health_batch(
    services: &ServiceContainer,
    user_id: Option<i32>,
    limit: usize,
) -> CliResult<()> {
    let results = services.health_service.run_batch(user_id, limit)?;

    if results.is_empty() {
        println!("No bookmarks due for checking");
        return Ok(());
    }

    for health in &results {
        println!("bookmark {}: {}", health.bookmark_id, health.status);
    }
    println!("{}", format!("Checked {} bookmark(s)", results.len()).bold());
    Ok(())
}

#[instrument(skip(services), level = "debug")]
pub fn health_summary(services: &ServiceContainer, user_id: Option<i32>) -> CliResult<()> {
    let summary = services.health_service.health_summary(user_id)?;
    display::print_health_summary(&summary);
    Ok(())
}

#[instrument(skip(services), level = "debug")]
pub fn repair_redirect(services: &ServiceContainer, bookmark_id: i32) -> CliResult<()> {
    let bookmark = services.health_service.apply_redirect(bookmark_id)?;

    println!("{}", "Updated URL:".green().bold());
    display::print_bookmark(&bookmark);
    Ok(())
}

/// Parse "1,2,3" into ids, rejecting anything unparseable.
fn parse_ids(ids: &str) -> CliResult<Vec<i32>> {
    ids.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i32>()
                .map_err(|_| CliError::InvalidInput(format!("Invalid bookmark id: {}", s)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_id_list_when_parse_ids_then_vec_of_ids() {
        assert_eq!(parse_ids("1,2,3").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_ids(" 4 , 5 ,").unwrap(), vec![4, 5]);
    }

    #[test]
    fn given_garbage_when_parse_ids_then_error() {
        assert!(parse_ids("1,x,3").is_err());
    }
}
