//! Query execution with an optional read-only gate.
//!
//! Runs one SQL string against the database and folds every failure into
//! a reportable value, so a bad query never stops the run.

use std::time::Instant;

use tracing::{debug, warn};

use crate::db::{DatabaseClient, QueryResult};
use crate::safety::{classify_sql, ClassificationResult};

/// Query executor that runs generated SQL.
pub struct QueryExecutor<'a> {
    db: &'a dyn DatabaseClient,
    read_only: bool,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new query executor. The read-only gate starts disabled.
    pub fn new(db: &'a dyn DatabaseClient) -> Self {
        Self {
            db,
            read_only: false,
        }
    }

    /// Refuses statements that are not read-only when `read_only` is set.
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Runs `sql` and returns its rows, a rejection, or the error text.
    pub async fn execute(&self, sql: &str) -> ExecutionResult {
        if self.read_only {
            let classification = classify_sql(sql);
            if !classification.is_read_only() {
                if let Some(warning) = &classification.warning {
                    warn!("Refused {} statement: {}", classification.statement_type, warning);
                }
                return ExecutionResult::Rejected(classification);
            }
        }

        let start = Instant::now();
        match self.db.execute_query(sql).await {
            Ok(result) => {
                debug!(
                    "Query returned {} rows in {:?}",
                    result.row_count,
                    start.elapsed()
                );
                ExecutionResult::Success(result)
            }
            Err(e) => {
                debug!("Query failed after {:?}: {}", start.elapsed(), e);
                ExecutionResult::Error(format!("Error executing SQL: {}", e.message()))
            }
        }
    }
}

/// Result of executing a query.
#[derive(Debug)]
pub enum ExecutionResult {
    /// Query executed successfully.
    Success(QueryResult),
    /// Read-only mode refused the statement before it ran.
    Rejected(ClassificationResult),
    /// Query execution failed; holds the full report text.
    Error(String),
}
