//! Query execution integration tests.
//!
//! Tests running SQL against the seeded Chinook database.

use askql::db::{DatabaseClient, Value};
use askql::query::{ExecutionResult, QueryExecutor};

use super::common::seeded_db;

#[tokio::test]
async fn test_canada_customers() {
    let (_dir, db) = seeded_db().await;

    let result = db
        .execute_query("SELECT * FROM Customer WHERE Country = 'Canada';")
        .await
        .unwrap();

    assert!(result.row_count > 0);
    for row in 0..result.row_count {
        assert_eq!(
            result.get(row, "Country"),
            Some(&Value::String("Canada".to_string()))
        );
    }

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_total_revenue_is_one_number() {
    let (_dir, db) = seeded_db().await;

    let result = db
        .execute_query("SELECT SUM(UnitPrice * Quantity) AS TotalRevenue FROM InvoiceLine;")
        .await
        .unwrap();

    assert_eq!(result.row_count, 1);
    assert_eq!(result.column_names(), vec!["TotalRevenue"]);
    let revenue = result.rows[0][0].as_f64().unwrap();
    assert!(revenue > 0.0);

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_rows_as_records() {
    let (_dir, db) = seeded_db().await;

    let result = db
        .execute_query("SELECT ArtistId, Name FROM Artist WHERE ArtistId = 1")
        .await
        .unwrap();

    let record = result.record(0).unwrap();
    assert_eq!(
        record,
        vec![
            ("ArtistId", &Value::Int(1)),
            ("Name", &Value::String("AC/DC".to_string())),
        ]
    );

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_empty_result_keeps_headers() {
    let (_dir, db) = seeded_db().await;

    let result = db
        .execute_query("SELECT FirstName, LastName FROM Customer WHERE Country = 'Atlantis'")
        .await
        .unwrap();

    assert!(result.is_empty());
    assert_eq!(result.column_names(), vec!["FirstName", "LastName"]);

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_missing_table_becomes_error_text() {
    let (_dir, db) = seeded_db().await;
    let executor = QueryExecutor::new(&db);

    match executor.execute("SELECT * FROM Foo").await {
        ExecutionResult::Error(message) => {
            assert_eq!(message, "Error executing SQL: no such table: Foo");
        }
        other => panic!("Expected Error, got {other:?}"),
    }

    // The shared connection is still usable
    assert!(matches!(
        executor.execute("SELECT COUNT(*) FROM Artist").await,
        ExecutionResult::Success(_)
    ));

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_read_only_keeps_data() {
    let (_dir, db) = seeded_db().await;
    let executor = QueryExecutor::new(&db).with_read_only(true);

    let result = executor.execute("DELETE FROM InvoiceLine").await;
    assert!(matches!(result, ExecutionResult::Rejected(_)));
    assert!(db.count_rows("InvoiceLine").await.unwrap() > 0);

    db.close().await.unwrap();
}
