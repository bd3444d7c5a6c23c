// src/util/testing.rs

use std::env;
use std::sync::OnceLock;
use tempfile::TempDir;
use tracing::debug;
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::infrastructure::repositories::sqlite::repository::SqliteBookmarkRepository;

static TEST_ENV: OnceLock<()> = OnceLock::new();

/// Initializes logging for tests exactly once.
pub fn init_test_env() {
    TEST_ENV.get_or_init(setup_test_logging);
}

/// Logging setup only runs once; subsequent calls do nothing if `tracing` is already set.
fn setup_test_logging() {
    debug!("Attempting logger init from testing.rs");
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
        return;
    }

    let noisy_modules = ["reqwest", "mio", "want", "hyper_util"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    subscriber.try_init().unwrap_or_else(|e| {
        eprintln!("Error: Failed to set up logging: {}", e);
    });
}

/// Saves and restores the LINKWARD_* environment variables around a test.
#[derive(Debug, Clone)]
pub struct EnvGuard {
    db_url: Option<String>,
    user_id: Option<String>,
}

impl Default for EnvGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvGuard {
    pub fn new() -> Self {
        Self {
            db_url: env::var("LINKWARD_DB_URL").ok(),
            user_id: env::var("LINKWARD_USER_ID").ok(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        env::remove_var("LINKWARD_DB_URL");
        env::remove_var("LINKWARD_USER_ID");
        if let Some(val) = &self.db_url {
            env::set_var("LINKWARD_DB_URL", val);
        }
        if let Some(val) = &self.user_id {
            env::set_var("LINKWARD_USER_ID", val);
        }
    }
}

/// Creates a repository over a fresh migrated database in a temp directory.
/// Keep the returned TempDir alive for the duration of the test.
pub fn setup_test_db() -> (SqliteBookmarkRepository, TempDir) {
    init_test_env();

    let tempdir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = tempdir.path().join("linkward_test.db");
    let repository = SqliteBookmarkRepository::from_url(db_path.to_string_lossy().as_ref())
        .expect("Failed to create SqliteBookmarkRepository");

    (repository, tempdir)
}
