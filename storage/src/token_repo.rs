//! Credentials for external services that are obtained out-of-band (e.g. OAuth tokens).

use chrono::Utc;

use crate::error::Result;
use crate::models::ServiceToken;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct ServiceTokenRepository {
    pool_manager: SqlitePoolManager,
}

impl ServiceTokenRepository {
    pub(crate) fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    pub async fn get(&self, service: &str) -> Result<Option<ServiceToken>> {
        let token =
            sqlx::query_as::<_, ServiceToken>("SELECT * FROM service_tokens WHERE service = ?")
                .bind(service)
                .fetch_optional(self.pool_manager.pool())
                .await?;
        Ok(token)
    }

    pub async fn put(&self, service: &str, token: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO service_tokens (service, token, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(service) DO UPDATE SET token = excluded.token, updated_at = excluded.updated_at
            "#,
        )
        .bind(service)
        .bind(token)
        .bind(Utc::now())
        .execute(self.pool_manager.pool())
        .await?;
        Ok(())
    }
}
