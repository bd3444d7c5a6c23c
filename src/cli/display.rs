// src/cli/display.rs
use crossterm::style::Stylize;

use crate::domain::bookmark::Bookmark;
use crate::domain::duplicate::{DuplicateGroup, MatchKind};
use crate::domain::health::{HealthCheck, HealthSummary};

pub fn print_bookmark(bookmark: &Bookmark) {
    let id = bookmark.id.map_or("?".to_string(), |id| id.to_string());
    println!("{} {}", format!("[{}]", id).green(), bookmark.title.clone().bold());
    println!("    {}", bookmark.url.clone().cyan());

    let tags = bookmark.formatted_tags();
    if tags != ",," {
        println!("    {}", tags);
    }
}

pub fn print_duplicate_group(index: usize, group: &DuplicateGroup) {
    match &group.kind {
        MatchKind::Url { normalized_url } => {
            println!(
                "{} {}",
                format!("Group {} (same URL):", index + 1).bold(),
                normalized_url.clone().cyan()
            );
        }
        MatchKind::Title => {
            println!("{}", format!("Group {} (similar titles):", index + 1).bold());
        }
    }

    for bookmark in &group.bookmarks {
        let id = bookmark.id.map_or("?".to_string(), |id| id.to_string());
        println!("  {} {} - {}", format!("[{}]", id).green(), bookmark.title, bookmark.url);
    }
    println!();
}

pub fn print_health_check(url: &str, check: &HealthCheck) {
    println!("{} {}", "URL:".bold(), url);
    println!("{} {}", "Status:".bold(), check.status);
    if let Some(code) = check.status_code {
        println!("{} {}", "HTTP:".bold(), code);
    }
    if let Some(final_url) = &check.final_url {
        if final_url != url {
            println!("{} {}", "Resolved to:".bold(), final_url.clone().cyan());
        }
    }
    if let Some(ms) = check.response_time_ms {
        println!("{} {}ms", "Response time:".bold(), ms);
    }
    if let Some(error) = &check.error {
        println!("{} {}", "Error:".bold(), error.clone().red());
    }
    if let Some(archive_url) = &check.archive_url {
        println!("{} {}", "Archived at:".bold(), archive_url.clone().cyan());
    }
}

pub fn print_health_summary(summary: &HealthSummary) {
    println!("{}", "Link health summary".bold());
    println!("  ok:         {}", summary.ok);
    println!("  redirected: {}", summary.redirected);
    println!("  broken:     {}", summary.broken);
    println!("  archived:   {}", summary.archived);
    println!("  pending:    {}", summary.pending);
    println!("  unchecked:  {}", summary.unchecked);
    println!("  checked total: {}", summary.total_checked());
}
