//! Schema introspection integration tests.
//!
//! Tests schema discovery and its text rendering against the seeded
//! Chinook database.

use askql::db::{describe_schema, DatabaseClient};
use pretty_assertions::assert_eq;

use super::common::seeded_db;

const CHINOOK_TABLES: &[&str] = &[
    "Album",
    "Artist",
    "Customer",
    "Employee",
    "Genre",
    "Invoice",
    "InvoiceLine",
    "MediaType",
    "Playlist",
    "PlaylistTrack",
    "Track",
];

#[tokio::test]
async fn test_tables_in_creation_order() {
    let (_dir, db) = seeded_db().await;

    let tables = db.list_tables().await.unwrap();
    assert_eq!(tables, CHINOOK_TABLES);

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_description_has_one_block_per_table() {
    let (_dir, db) = seeded_db().await;

    let schema = db.introspect_schema().await.unwrap();
    let text = describe_schema(&db).await;

    let headers = text.lines().filter(|l| l.starts_with("table: ")).count();
    let column_lines = text.lines().filter(|l| l.starts_with("  - ")).count();

    assert_eq!(headers, schema.tables.len());
    assert_eq!(column_lines, schema.column_count());
    assert!(!text.contains("Error extracting schema"));

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_description_matches_typed_schema() {
    let (_dir, db) = seeded_db().await;

    let schema = db.introspect_schema().await.unwrap();
    assert_eq!(describe_schema(&db).await, schema.format_for_llm());

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_declared_types_are_kept() {
    let (_dir, db) = seeded_db().await;

    let text = describe_schema(&db).await;
    assert!(text.starts_with(
        "table: Album\nColumns:\n  - AlbumId (INTEGER)\n  - Title (NVARCHAR(160))\n  - ArtistId (INTEGER)\n\n"
    ));
    assert!(text.contains("  - Total (NUMERIC(10,2))\n"));

    let schema = db.introspect_schema().await.unwrap();
    let title = schema
        .table("Album")
        .and_then(|t| t.columns.iter().find(|c| c.name == "Title"))
        .unwrap();
    assert!(!title.is_nullable);

    db.close().await.unwrap();
}
