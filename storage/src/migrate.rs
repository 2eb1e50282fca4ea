//! Embedded forward-only migrations.
//!
//! Migration files live in `storage/migrations` and are compiled into the binary. Applied
//! versions are tracked by sqlx in `_sqlx_migrations`; this module only reports on them.

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::Result;

static MIGRATOR: Migrator = sqlx::migrate!();

/// Outcome of a migration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    /// Migrations applied by this run.
    pub applied: usize,
    /// Migrations known to this binary.
    pub total: usize,
}

impl MigrationReport {
    pub fn is_up_to_date(&self) -> bool {
        self.applied == 0
    }
}

/// Applies every pending migration. Running against an up-to-date schema is a no-op.
pub async fn run_migrations(pool: &SqlitePool) -> Result<MigrationReport> {
    let total = MIGRATOR.iter().count();
    let before = applied_count(pool).await?;
    info!(already_applied = before, known = total, "step: migration started");

    MIGRATOR.run(pool).await?;

    let after = applied_count(pool).await?;
    let report = MigrationReport {
        applied: after.saturating_sub(before),
        total,
    };
    info!(applied = report.applied, known = total, "step: migration done");
    Ok(report)
}

async fn applied_count(pool: &SqlitePool) -> Result<usize> {
    let table: Option<(String,)> = sqlx::query_as(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_optional(pool)
    .await?;
    if table.is_none() {
        return Ok(0);
    }

    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await?;
    Ok(usize::try_from(count).unwrap_or(0))
}
