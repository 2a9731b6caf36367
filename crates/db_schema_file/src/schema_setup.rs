use anyhow::Context;
use comflex_utils::error::ComflexResult;
use diesel::{Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../../migrations");

/// Runs all pending migrations on a blocking connection.
pub fn run(db_url: &str) -> ComflexResult<()> {
  // Migrations don't support async connection
  let mut conn = PgConnection::establish(db_url).with_context(|| "Error connecting to database")?;

  info!("Running Database migrations...");
  let executed_migration_versions = conn
    .run_pending_migrations(MIGRATIONS)
    .map_err(|e| anyhow::anyhow!("Couldn't run DB Migrations: {e}"))?;
  info!(
    "Database migrations complete, {} migration(s) applied.",
    executed_migration_versions.len()
  );

  Ok(())
}
