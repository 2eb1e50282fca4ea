//! Integration tests for [`storage::Database`] migrations.
//!
//! Uses a temporary SQLite file so that a second `connect_and_migrate` sees the schema left
//! by the first one.

use storage::Database;
use tempfile::TempDir;

fn database_url(dir: &TempDir) -> String {
    format!("sqlite://{}/bot.db", dir.path().display())
}

/// **Test: Fresh database gets every known migration applied.**
#[tokio::test]
async fn test_fresh_database_applies_all_migrations() {
    let dir = TempDir::new().unwrap();
    let db = Database::connect_and_migrate(&database_url(&dir), 4)
        .await
        .expect("Failed to migrate");

    let report = db.migration_report();
    assert!(report.total > 0);
    assert_eq!(report.applied, report.total);

    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'service_tokens') ORDER BY name",
    )
    .fetch_all(db.pool())
    .await
    .unwrap();
    assert_eq!(
        tables.into_iter().map(|t| t.0).collect::<Vec<_>>(),
        vec!["service_tokens".to_string(), "users".to_string()]
    );
}

/// **Test: Re-running startup against a migrated database applies nothing and does not fail.**
#[tokio::test]
async fn test_migrations_are_idempotent() {
    let dir = TempDir::new().unwrap();
    let url = database_url(&dir);

    let first = Database::connect_and_migrate(&url, 4).await.unwrap();
    first
        .users()
        .find_or_create(&storage::UserProfile::new(42))
        .await
        .unwrap();
    first.close().await;

    let second = Database::connect_and_migrate(&url, 4)
        .await
        .expect("Second migration run must succeed");
    assert!(second.migration_report().is_up_to_date());
    assert_eq!(second.users().count().await.unwrap(), 1);
}

/// **Test: A fresh checkout migrates without the data directory existing.**
#[tokio::test]
async fn test_connect_creates_missing_directory() {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}/missing/dir/bot.db", dir.path().display());
    let db = Database::connect_and_migrate(&url, 1).await.unwrap();
    assert_eq!(db.users().count().await.unwrap(), 0);
    db.close().await;
    assert!(dir.path().join("missing/dir/bot.db").exists());
}

/// **Test: Unreachable database location is a startup error.**
#[tokio::test]
async fn test_connect_fails_when_directory_is_a_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("occupied"), b"not a directory").unwrap();
    let url = format!("sqlite://{}/occupied/bot.db", dir.path().display());
    assert!(Database::connect_and_migrate(&url, 1).await.is_err());
}
