//! # Schema Migrations
//!
//! The SQL under `migrations/sqlite/` is compiled into the binary and applied
//! when the store opens. sqlx records each applied script in
//! `_sqlx_migrations`, so reopening an existing database only runs scripts it
//! has not seen.
//!
//! ```text
//! 001_initial_schema.sql   submissions, submission_files, artifacts
//! ```
//!
//! Scripts are append-only: schema changes go in a new `NNN_*.sql` file.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies any embedded script the database has not recorded yet.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let embedded = MIGRATOR.migrations.len();
    MIGRATOR.run(pool).await?;
    info!(embedded, "Schema up to date");
    Ok(())
}

/// `(embedded, applied)` script counts. A database that was never migrated
/// has no `_sqlx_migrations` table and reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let applied = match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
    {
        Ok(count) => count,
        Err(sqlx::Error::Database(err)) if err.message().starts_with("no such table") => 0,
        Err(err) => return Err(err.into()),
    };

    Ok((MIGRATOR.migrations.len(), applied.max(0) as usize))
}
