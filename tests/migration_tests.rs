//! Schema migration tests
//!
//! Migrations run on every start, so they must tolerate an already migrated
//! database and a `logs` table created before the coordinate columns existed.

use linktracker::storage::SeaOrmStorage;
use linktracker::storage::backend::{connect_sqlite, run_migrations};
use migration::SchemaManager;
use sea_orm::ConnectionTrait;
use tempfile::TempDir;

async fn temp_db() -> (sea_orm::DatabaseConnection, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let url = format!("sqlite://{}", temp_dir.path().join("legacy.db").display());
    let db = connect_sqlite(&url).await.expect("Failed to open SQLite");
    (db, temp_dir)
}

#[tokio::test]
async fn test_fresh_database_gets_both_tables() {
    let (db, _dir) = temp_db().await;
    run_migrations(&db).await.unwrap();

    let manager = SchemaManager::new(&db);
    assert!(manager.has_table("links").await.unwrap());
    assert!(manager.has_table("logs").await.unwrap());
    assert!(manager.has_column("logs", "latitude").await.unwrap());
    assert!(manager.has_column("logs", "longitude").await.unwrap());
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let (db, _dir) = temp_db().await;
    run_migrations(&db).await.unwrap();
    run_migrations(&db).await.unwrap();

    let manager = SchemaManager::new(&db);
    assert!(manager.has_column("logs", "latitude").await.unwrap());
}

#[tokio::test]
async fn test_legacy_logs_table_gains_coordinate_columns() {
    let (db, _dir) = temp_db().await;

    db.execute_unprepared(
        "CREATE TABLE logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            link_id TEXT NOT NULL,
            ip TEXT,
            country TEXT,
            platform TEXT,
            browser TEXT,
            referrer TEXT,
            timestamp DATETIME
        )",
    )
    .await
    .unwrap();
    db.execute_unprepared(
        "INSERT INTO logs (link_id, ip, country, platform, browser, timestamp)
         VALUES ('0a1b2c3d', '203.0.113.1', 'DE', 'Linux', 'Firefox', '2024-01-01T00:00:00+00:00')",
    )
    .await
    .unwrap();

    let manager = SchemaManager::new(&db);
    assert!(!manager.has_column("logs", "latitude").await.unwrap());

    run_migrations(&db).await.unwrap();

    assert!(manager.has_column("logs", "latitude").await.unwrap());
    assert!(manager.has_column("logs", "longitude").await.unwrap());
    assert!(manager.has_table("links").await.unwrap());
    drop(manager);

    // 旧数据保留，新列为空
    let storage = SeaOrmStorage::from_connection(db, "sqlite").await.unwrap();
    let visits = storage.all_visits("0a1b2c3d").await.unwrap();
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].country.as_deref(), Some("DE"));
    assert_eq!(visits[0].latitude, None);
    assert_eq!(visits[0].longitude, None);
}
