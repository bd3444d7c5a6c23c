// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Bookmark hygiene for the terminal: find duplicates, merge them, watch for link rot
pub struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Turn debugging information on
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Bookmark owner to operate on (defaults to the configured user)
    #[arg(short = 'u', long = "user")]
    pub user: Option<i32>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a bookmark
    Add {
        url: String,
        /// list of tags, separated by comma, no blanks in between
        tags: Option<String>,
        #[arg(long = "title", help = "title")]
        title: Option<String>,
        #[arg(short = 'd', long = "description", help = "description")]
        desc: Option<String>,
        #[arg(long = "favorite", help = "mark as favorite")]
        favorite: bool,
    },
    /// Search bookmarks: free text plus tag:, domain:, unread:, favorite:,
    /// archived:, after:, before: filters and "quoted phrases"
    Search {
        /// query string; empty lists everything
        query: Option<String>,

        #[arg(short = 'l', long = "limit", help = "limit number of results")]
        limit: Option<usize>,
    },
    /// List duplicate bookmark groups (by URL, then by title similarity)
    Dedupe {
        #[arg(long = "json", help = "non-interactive mode, output as json")]
        is_json: bool,
    },
    /// Merge duplicate bookmarks into a surviving primary
    Merge {
        /// id of the surviving bookmark
        primary_id: i32,

        /// list of duplicate ids, separated by comma, no blanks
        ids: String,
    },
    /// Link health checking
    Health {
        #[command(subcommand)]
        command: HealthCommands,
    },
}

#[derive(Subcommand)]
pub enum HealthCommands {
    /// Probe a single URL and classify it
    Check { url: String },
    /// Probe due bookmarks (all users unless --user is given)
    Run {
        #[arg(short = 'l', long = "limit", help = "limit number of bookmarks")]
        limit: Option<usize>,
    },
    /// Health status counts
    Summary,
    /// Rewrite a redirected bookmark to its final URL
    Repair {
        /// id of the redirected bookmark
        bookmark_id: i32,
    },
}
