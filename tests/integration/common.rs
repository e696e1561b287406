//! Shared fixtures for the integration tests.

use std::path::PathBuf;

use askql::db::SqliteClient;
use tempfile::TempDir;

/// Path of the bundled seed script.
pub fn seed_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("chinook_seed.sql")
}

/// Opens a fresh database file in a temporary directory and seeds it.
///
/// Keep the returned directory alive for as long as the client is used.
pub async fn seeded_db() -> (TempDir, SqliteClient) {
    let dir = tempfile::tempdir().unwrap();
    let db = SqliteClient::open(&dir.path().join("Chinook.db"))
        .await
        .unwrap();
    db.load_seed_script(&seed_path()).await.unwrap();
    (dir, db)
}
