//! End-to-end pipeline integration tests.
//!
//! Drives the question pipeline over the seeded Chinook database with the
//! mock LLM clients.

use std::sync::atomic::{AtomicUsize, Ordering};

use askql::config::DEFAULT_QUESTIONS;
use askql::db::{Column, DatabaseClient, QueryResult, SqliteClient, Value};
use askql::error::Result;
use askql::llm::{FailingLlmClient, MockLlmClient};
use askql::output::format_report;
use askql::pipeline::{Pipeline, QuestionOutcome};
use async_trait::async_trait;
use pretty_assertions::assert_eq;

use super::common::seeded_db;

/// Wraps a database and counts executed queries.
struct CountingDb<'a> {
    inner: &'a SqliteClient,
    executed: AtomicUsize,
}

impl<'a> CountingDb<'a> {
    fn new(inner: &'a SqliteClient) -> Self {
        Self {
            inner,
            executed: AtomicUsize::new(0),
        }
    }

    fn executed(&self) -> usize {
        self.executed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseClient for CountingDb<'_> {
    async fn list_tables(&self) -> Result<Vec<String>> {
        self.inner.list_tables().await
    }

    async fn table_columns(&self, table: &str) -> Result<Vec<Column>> {
        self.inner.table_columns(table).await
    }

    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        self.executed.fetch_add(1, Ordering::SeqCst);
        self.inner.execute_query(sql).await
    }

    async fn close(&self) -> Result<()> {
        self.inner.close().await
    }
}

fn rows(outcome: &QuestionOutcome) -> &QueryResult {
    match outcome {
        QuestionOutcome::Rows(result) => result,
        other => panic!("Expected rows, got {other:?}"),
    }
}

#[tokio::test]
async fn test_canada_question() {
    let (_dir, db) = seeded_db().await;
    let llm = MockLlmClient::new();
    let pipeline = Pipeline::new(&db, &llm).await;

    let report = pipeline
        .process_question("List all customers in Canada.")
        .await;

    assert_eq!(
        report.sql.as_deref(),
        Some("SELECT * FROM Customer WHERE Country = 'Canada';")
    );
    let result = rows(&report.outcome);
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
async fn test_total_revenue_question() {
    let (_dir, db) = seeded_db().await;
    let llm = MockLlmClient::new();
    let pipeline = Pipeline::new(&db, &llm).await;

    let report = pipeline
        .process_question("What is the total revenue from sales?")
        .await;

    let result = rows(&report.outcome);
    assert_eq!(result.row_count, 1);
    assert_eq!(result.columns.len(), 1);
    assert!(result.rows[0][0].is_numeric());

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_every_demo_question_runs() {
    let (_dir, db) = seeded_db().await;
    let llm = MockLlmClient::new();
    let pipeline = Pipeline::new(&db, &llm).await;
    let questions: Vec<String> = DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect();

    let reports = pipeline.run(&questions, |_| {}).await;

    assert_eq!(reports.len(), questions.len());
    for report in &reports {
        assert!(
            report.outcome.is_success(),
            "{:?} failed: {:?}",
            report.question,
            report.outcome.error_text()
        );
    }

    let artists = rows(&reports[4].outcome);
    assert!(artists.row_count > 0);
    for row in 0..artists.row_count {
        let albums = artists.get(row, "AlbumCount").and_then(Value::as_f64).unwrap();
        assert!(albums > 5.0);
    }

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_failing_sql_does_not_stop_later_questions() {
    let (_dir, db) = seeded_db().await;
    let llm = MockLlmClient::new().with_response("foo", "```sql\nSELECT * FROM Foo\n```");
    let pipeline = Pipeline::new(&db, &llm).await;
    let questions = vec![
        "Show me everything in foo".to_string(),
        "List all customers in Canada.".to_string(),
    ];

    let reports = pipeline.run(&questions, |_| {}).await;

    assert_eq!(reports[0].sql.as_deref(), Some("SELECT * FROM Foo"));
    assert_eq!(
        reports[0].outcome.error_text(),
        Some("Error executing SQL: no such table: Foo")
    );
    assert!(reports[1].outcome.is_success());

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_generation_failure_skips_execution() {
    let (_dir, db) = seeded_db().await;
    let counting = CountingDb::new(&db);
    let llm = FailingLlmClient::new("Request timed out. Try again.");
    let pipeline = Pipeline::new(&counting, &llm).await;
    let questions = vec![
        "List all customers in Canada.".to_string(),
        "What is the total revenue from sales?".to_string(),
    ];

    let mut printed = Vec::new();
    let reports = pipeline
        .run(&questions, |r| printed.push(format_report(r, 20)))
        .await;

    assert_eq!(counting.executed(), 0);
    assert_eq!(reports.len(), 2);
    for report in &reports {
        assert!(report.sql.is_none());
        assert_eq!(
            report.outcome.error_text(),
            Some("Error generating SQL with LLM: Request timed out. Try again.")
        );
    }
    assert!(printed[0].contains("SQL Query: None\n"));

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_successful_question_executes_once() {
    let (_dir, db) = seeded_db().await;
    let counting = CountingDb::new(&db);
    let llm = MockLlmClient::new();
    let pipeline = Pipeline::new(&counting, &llm).await;

    pipeline
        .process_question("Which employees are sales agents?")
        .await;

    assert_eq!(counting.executed(), 1);
    db.close().await.unwrap();
}

#[tokio::test]
async fn test_schema_is_described_once_and_reused() {
    let (_dir, db) = seeded_db().await;
    let llm = MockLlmClient::new();
    let pipeline = Pipeline::new(&db, &llm).await;
    let before = pipeline.schema_text().to_string();

    db.execute_script("CREATE TABLE Scratch (Id INTEGER);")
        .await
        .unwrap();
    pipeline.process_question("What is the total revenue from sales?").await;

    assert_eq!(pipeline.schema_text(), before);
    assert!(!before.contains("Scratch"));

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_read_only_pipeline_refuses_writes() {
    let (_dir, db) = seeded_db().await;
    let llm = MockLlmClient::new().with_response("wipe", "```sql\nDELETE FROM Invoice;\n```");
    let pipeline = Pipeline::new(&db, &llm).await.with_read_only(true);

    let report = pipeline.process_question("Please wipe the invoices").await;

    assert_eq!(report.sql.as_deref(), Some("DELETE FROM Invoice;"));
    assert_eq!(
        report.outcome.error_text(),
        Some("Refusing to execute DELETE statement in read-only mode")
    );
    assert!(db.count_rows("Invoice").await.unwrap() > 0);

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_multi_statement_answer_is_refused() {
    let (_dir, db) = seeded_db().await;
    let llm = MockLlmClient::new().with_response(
        "artists",
        "```sql\nSELECT Name FROM Artist;\nDELETE FROM Artist;\n```",
    );
    let pipeline = Pipeline::new(&db, &llm).await;
    let before = db.count_rows("Artist").await.unwrap();

    let report = pipeline.process_question("Show the artists").await;

    assert_eq!(
        report.sql.as_deref(),
        Some("SELECT Name FROM Artist;\nDELETE FROM Artist;")
    );
    assert_eq!(
        report.outcome.error_text(),
        Some("Error executing SQL: You can only execute one statement at a time.")
    );
    assert_eq!(db.count_rows("Artist").await.unwrap(), before);

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_empty_completion_is_execution_error() {
    let (_dir, db) = seeded_db().await;
    let llm = MockLlmClient::new().with_response("nothing", "```sql\n```");
    let pipeline = Pipeline::new(&db, &llm).await;

    let report = pipeline.process_question("Say nothing").await;

    assert_eq!(report.sql.as_deref(), Some(""));
    assert_eq!(
        report.outcome.error_text(),
        Some("Error executing SQL: No SQL statement to execute.")
    );

    db.close().await.unwrap();
}
