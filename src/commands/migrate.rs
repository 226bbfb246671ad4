use anyhow::{Context, Result};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use super::run::build_pool;
use crate::web::PgPool;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply any pending embedded migrations. Blocking; callers on the async
/// runtime wrap this in `spawn_blocking`.
pub fn run_pending_migrations(pool: &PgPool) -> Result<()> {
    let mut conn = pool
        .get()
        .context("failed to get database connection for migrations")?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("failed to run pending migrations: {e}"))?;

    if applied.is_empty() {
        info!("No pending migrations");
    } else {
        for version in &applied {
            info!("Applied migration {}", version);
        }
    }

    Ok(())
}

/// `migrate` subcommand: bring the schema up to date and exit.
pub async fn handle_migrate() -> Result<()> {
    let pool = build_pool()?;

    tokio::task::spawn_blocking(move || run_pending_migrations(&pool)).await??;

    info!("Database schema is up to date");
    Ok(())
}
