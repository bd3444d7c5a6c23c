// src/cli/mod.rs
pub mod args;
pub mod commands;
pub mod display;
pub mod error;

use crate::cli::args::{Cli, Commands, HealthCommands};
use crate::cli::error::{CliError, CliResult};
use crate::config::Settings;
use crate::infrastructure::di::ServiceContainer;

/// Dispatch a parsed CLI invocation against the service container.
pub fn execute_command(
    cli: Cli,
    services: &ServiceContainer,
    settings: &Settings,
) -> CliResult<()> {
    let user_id = cli.user.unwrap_or(settings.default_user_id);

    match cli.command {
        Some(Commands::Add {
            url,
            tags,
            title,
            desc,
            favorite,
        }) => commands::add_bookmark(
            services,
            user_id,
            &url,
            tags.as_deref(),
            title.as_deref(),
            desc.as_deref(),
            favorite,
        ),
        Some(Commands::Search { query, limit }) => {
            commands::search_bookmarks(services, user_id, query.as_deref().unwrap_or(""), limit)
        }
        Some(Commands::Dedupe { is_json }) => {
            commands::list_duplicates(services, user_id, is_json)
        }
        Some(Commands::Merge { primary_id, ids }) => {
            commands::merge_bookmarks(services, primary_id, &ids)
        }
        Some(Commands::Health { command }) => match command {
            HealthCommands::Check { url } => commands::check_url(services, &url),
            HealthCommands::Run { limit } => commands::run_health_batch(
                services,
                cli.user,
                limit.unwrap_or(settings.health.batch_size),
            ),
            HealthCommands::Summary => commands::health_summary(services, cli.user),
            HealthCommands::Repair { bookmark_id } => {
                commands::repair_redirect(services, bookmark_id)
            }
        },
        None => Err(CliError::InvalidInput(
            "No command given; see --help".to_string(),
        )),
    }
}
