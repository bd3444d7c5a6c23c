// src/infrastructure/repositories/sqlite/migration.rs
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::debug;

use crate::infrastructure::repositories::sqlite::error::SqliteRepositoryError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

/// Run all pending migrations. Idempotent: an up-to-date database is a no-op.
/// This is the explicit bootstrap step performed once at pool creation.
pub fn run_pending_migrations(
    connection: &mut impl MigrationHarness<diesel::sqlite::Sqlite>,
) -> Result<(), SqliteRepositoryError> {
    let pending = connection.pending_migrations(MIGRATIONS).map_err(|e| {
        SqliteRepositoryError::MigrationError(format!("Failed to check pending migrations: {}", e))
    })?;

    if pending.is_empty() {
        debug!("No pending migrations to run");
        return Ok(());
    }

    for migration in &pending {
        debug!("Pending migration: {}", migration.name());
    }

    connection.run_pending_migrations(MIGRATIONS).map_err(|e| {
        SqliteRepositoryError::MigrationError(format!("Failed to run migrations: {}", e))
    })?;

    Ok(())
}
