//! Storage crate: database pool, embedded migrations and repositories.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – UserRecord, UserProfile, ServiceToken
//! - [`database`] – Database (connect + migrate)
//! - [`user_repo`] – UserRepository
//! - [`token_repo`] – ServiceTokenRepository
//! - [`sqlite_pool`] – SqlitePoolManager

mod database;
mod error;
mod migrate;
mod models;
mod sqlite_pool;
mod token_repo;
mod user_repo;

pub use database::Database;
pub use error::{Result, StorageError};
pub use migrate::MigrationReport;
pub use models::{ServiceToken, UserProfile, UserRecord};
pub use token_repo::ServiceTokenRepository;
pub use user_repo::UserRepository;
