// src/config.rs
use crate::domain::error::DomainResult;
use crate::domain::health::RecheckPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::trace;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthOpts {
    /// Per-request timeout for link probes in seconds (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum redirects followed per probe (default: 5)
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Worker threads for batch probing (default: 5)
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Bookmarks per batch run (default: 50)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// User agent sent with probes and archive lookups
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_redirects() -> usize {
    5
}

fn default_max_workers() -> usize {
    5
}

fn default_batch_size() -> usize {
    50
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; linkward-linkchecker/0.4; +https://github.com/sysid/linkward)"
        .to_string()
}

impl Default for HealthOpts {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
            max_workers: default_max_workers(),
            batch_size: default_batch_size(),
            user_agent: default_user_agent(),
        }
    }
}

/// Recheck scheduling knobs, mapped 1:1 onto `RecheckPolicy`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecheckOpts {
    #[serde(default = "default_ok_interval_hours")]
    pub ok_interval_hours: i64,

    #[serde(default = "default_redirected_interval_hours")]
    pub redirected_interval_hours: i64,

    #[serde(default = "default_broken_interval_hours")]
    pub broken_interval_hours: i64,

    #[serde(default = "default_growth_factor")]
    pub growth_factor: f64,

    #[serde(default = "default_max_interval_hours")]
    pub max_interval_hours: i64,
}

fn default_ok_interval_hours() -> i64 {
    7 * 24
}

fn default_redirected_interval_hours() -> i64 {
    3 * 24
}

fn default_broken_interval_hours() -> i64 {
    24
}

fn default_growth_factor() -> f64 {
    2.0
}

fn default_max_interval_hours() -> i64 {
    30 * 24
}

impl Default for RecheckOpts {
    fn default() -> Self {
        Self {
            ok_interval_hours: default_ok_interval_hours(),
            redirected_interval_hours: default_redirected_interval_hours(),
            broken_interval_hours: default_broken_interval_hours(),
            growth_factor: default_growth_factor(),
            max_interval_hours: default_max_interval_hours(),
        }
    }
}

impl RecheckOpts {
    pub fn to_policy(&self) -> RecheckPolicy {
        RecheckPolicy {
            ok_interval_hours: self.ok_interval_hours,
            redirected_interval_hours: self.redirected_interval_hours,
            broken_interval_hours: self.broken_interval_hours,
            growth_factor: self.growth_factor,
            max_interval_hours: self.max_interval_hours,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Path to the SQLite database file
    #[serde(default = "default_db_path")]
    pub db_url: String,

    /// Owner id used by the CLI when --user is not given
    #[serde(default = "default_user_id")]
    pub default_user_id: i32,

    #[serde(default)]
    pub health: HealthOpts,

    #[serde(default)]
    pub recheck: RecheckOpts,
}

fn default_db_path() -> String {
    let db_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("../db"))
        .join(".config/linkward");

    // Ensure directory exists
    std::fs::create_dir_all(&db_dir).ok();

    db_dir
        .join("linkward.db")
        .to_str()
        .unwrap_or("../db/linkward.db")
        .to_string()
}

fn default_user_id() -> i32 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_url: default_db_path(),
            default_user_id: default_user_id(),
            health: HealthOpts::default(),
            recheck: RecheckOpts::default(),
        }
    }
}

// Load settings from config files and environment variables
pub fn load_settings(config_file: Option<&Path>) -> DomainResult<Settings> {
    trace!("Loading settings");

    // Start with default settings
    let mut settings = Settings::default();

    // Explicit config file first, then the standard location
    let config_sources = [
        config_file.map(Path::to_path_buf),
        dirs::home_dir().map(|p| p.join(".config/linkward/config.toml")),
    ];

    for config_path in config_sources.iter().flatten() {
        if config_path.exists() {
            trace!("Loading config from: {:?}", config_path);

            if let Ok(config_text) = std::fs::read_to_string(config_path) {
                if let Ok(file_settings) = toml::from_str::<Settings>(&config_text) {
                    settings = file_settings;
                    break;
                }
            }
        }
    }

    // Override with environment variables
    if let Ok(db_url) = std::env::var("LINKWARD_DB_URL") {
        trace!("Using LINKWARD_DB_URL from environment: {}", db_url);
        settings.db_url = db_url;
    }

    if let Ok(user_id) = std::env::var("LINKWARD_USER_ID") {
        if let Ok(user_id) = user_id.parse::<i32>() {
            trace!("Using LINKWARD_USER_ID from environment: {}", user_id);
            settings.default_user_id = user_id;
        }
    }

    trace!("Settings loaded: {:?}", settings);
    Ok(settings)
}
