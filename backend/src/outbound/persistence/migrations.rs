//! Embedded schema migrations applied at startup.

use diesel::{Connection, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use super::pool::{PoolConfig, PoolError};

/// Embedded migrations from the backend/migrations directory.
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

fn run_pending(database_url: &str) -> Result<usize, PoolError> {
    let mut conn = SqliteConnection::establish(database_url)
        .map_err(|err| PoolError::build(format!("open for migrations: {err}")))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| PoolError::build(format!("run migrations: {err}")))?;
    Ok(applied.len())
}

/// Apply every pending migration to the database described by `config`.
///
/// Runs on the blocking pool because the migration harness is synchronous.
///
/// # Errors
///
/// Returns `PoolError::Build` when the database cannot be opened or a
/// migration fails.
pub async fn run_migrations(config: &PoolConfig) -> Result<(), PoolError> {
    let database_url = config.database_url().to_owned();
    let applied = tokio::task::spawn_blocking(move || run_pending(&database_url))
        .await
        .map_err(|err| PoolError::build(format!("migration task failed: {err}")))??;
    info!(applied, "database migrations complete");
    Ok(())
}
