//! Migrated database handle.
//!
//! [`Database`] can only be obtained through [`Database::connect_and_migrate`], so anything
//! holding one (repositories, the handler chain) runs against the latest schema.

use tracing::{info, instrument};

use crate::error::Result;
use crate::migrate::{run_migrations, MigrationReport};
use crate::sqlite_pool::SqlitePoolManager;
use crate::token_repo::ServiceTokenRepository;
use crate::user_repo::UserRepository;

#[derive(Clone)]
pub struct Database {
    pool_manager: SqlitePoolManager,
    report: MigrationReport,
}

impl Database {
    /// Opens the pool and applies pending migrations. Any failure is returned unchanged;
    /// partially applied migrations are left to sqlx's per-migration transactions.
    #[instrument]
    pub async fn connect_and_migrate(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool_manager = SqlitePoolManager::new(database_url, max_connections).await?;
        let report = run_migrations(pool_manager.pool()).await?;
        info!(
            applied = report.applied,
            total = report.total,
            "Database ready"
        );
        Ok(Self {
            pool_manager,
            report,
        })
    }

    /// Report of the migration run performed when this handle was created.
    pub fn migration_report(&self) -> MigrationReport {
        self.report
    }

    pub fn pool(&self) -> &sqlx::SqlitePool {
        self.pool_manager.pool()
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool_manager.clone())
    }

    pub fn service_tokens(&self) -> ServiceTokenRepository {
        ServiceTokenRepository::new(self.pool_manager.clone())
    }

    pub async fn close(&self) {
        self.pool_manager.pool().close().await;
    }
}
