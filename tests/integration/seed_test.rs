//! Database bootstrap integration tests.
//!
//! Tests loading the bundled seed script.

use askql::db::{DatabaseClient, SqliteClient};

use super::common::{seed_path, seeded_db};

#[tokio::test]
async fn test_seed_creates_artists() {
    let (_dir, db) = seeded_db().await;

    let count = db.count_rows("Artist").await.unwrap();
    assert!(count > 0);

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    let (_dir, db) = seeded_db().await;
    let before = db.count_rows("Track").await.unwrap();

    db.load_seed_script(&seed_path()).await.unwrap();

    assert_eq!(db.count_rows("Track").await.unwrap(), before);
    db.close().await.unwrap();
}

#[tokio::test]
async fn test_seed_survives_reopen() {
    let (dir, db) = seeded_db().await;
    let artists = db.count_rows("Artist").await.unwrap();
    db.close().await.unwrap();

    let db = SqliteClient::open(&dir.path().join("Chinook.db"))
        .await
        .unwrap();
    assert_eq!(db.count_rows("Artist").await.unwrap(), artists);
    db.close().await.unwrap();
}

#[tokio::test]
async fn test_missing_seed_is_setup_error() {
    let dir = tempfile::tempdir().unwrap();
    let db = SqliteClient::open(&dir.path().join("Chinook.db"))
        .await
        .unwrap();

    let missing = dir.path().join("nope.sql");
    let err = db.load_seed_script(&missing).await.unwrap_err();

    assert_eq!(err.category(), "Setup Error");
    assert_eq!(
        err.message(),
        format!("SQL file not found at {}.", missing.display())
    );
    db.close().await.unwrap();
}

#[tokio::test]
async fn test_broken_seed_is_setup_error() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("broken.sql");
    std::fs::write(
        &script,
        "CREATE TABLE Artist (ArtistId INTEGER);\nINSERT INTO Nowhere VALUES (1);",
    )
    .unwrap();

    let db = SqliteClient::open(&dir.path().join("Chinook.db"))
        .await
        .unwrap();
    let err = db.load_seed_script(&script).await.unwrap_err();

    assert_eq!(err.category(), "Setup Error");
    assert!(err.message().starts_with("Error creating/loading database:"));
    assert!(err.message().contains("no such table: Nowhere"));
    db.close().await.unwrap();
}
