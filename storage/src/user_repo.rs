//! User repository: lookup, first-contact creation and referral bookkeeping.

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{Result, StorageError};
use crate::models::{UserProfile, UserRecord};
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct UserRepository {
    pool_manager: SqlitePoolManager,
}

impl UserRepository {
    pub(crate) fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    pub async fn find_by_telegram_id(&self, telegram_id: i64) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE telegram_id = ?")
            .bind(telegram_id)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        Ok(user)
    }

    /// Returns the user for `profile.telegram_id`, creating it on first contact.
    ///
    /// The boolean is true only for the call that inserted the row; concurrent first
    /// updates from the same user race on the unique index, not on application state.
    pub async fn find_or_create(&self, profile: &UserProfile) -> Result<(UserRecord, bool)> {
        let pool = self.pool_manager.pool();
        let now = Utc::now();

        let inserted = sqlx::query(
            r#"
            INSERT INTO users (telegram_id, username, first_name, last_name, language_code, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(telegram_id) DO NOTHING
            "#,
        )
        .bind(profile.telegram_id)
        .bind(&profile.username)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.language_code)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?
        .rows_affected()
            == 1;

        let mut user = self
            .find_by_telegram_id(profile.telegram_id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("user {}", profile.telegram_id)))?;

        if inserted {
            info!(user_id = user.id, telegram_id = user.telegram_id, "Created user on first contact");
        } else if user.differs_from(profile) {
            user = self.refresh_profile(profile).await?;
        }

        Ok((user, inserted))
    }

    /// Overwrites the stored profile fields with the platform-supplied ones.
    pub async fn refresh_profile(&self, profile: &UserProfile) -> Result<UserRecord> {
        sqlx::query(
            r#"
            UPDATE users
            SET username = ?, first_name = ?, last_name = ?, language_code = ?, updated_at = ?
            WHERE telegram_id = ?
            "#,
        )
        .bind(&profile.username)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.language_code)
        .bind(Utc::now())
        .bind(profile.telegram_id)
        .execute(self.pool_manager.pool())
        .await?;

        debug!(telegram_id = profile.telegram_id, "Refreshed user profile");
        self.find_by_telegram_id(profile.telegram_id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("user {}", profile.telegram_id)))
    }

    /// Records the acquisition source unless one is already stored. Returns whether it was written.
    pub async fn set_referral_if_absent(&self, user_id: i64, source: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET referral_source = ?, updated_at = ? WHERE id = ? AND referral_source IS NULL",
        )
        .bind(source)
        .bind(Utc::now())
        .bind(user_id)
        .execute(self.pool_manager.pool())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool_manager.pool())
            .await?;
        Ok(count)
    }
}
