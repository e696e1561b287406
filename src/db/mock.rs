//! Mock database client for testing.
//!
//! Serves a predefined schema and can be told to fail during introspection.

use super::{Column, ColumnInfo, DatabaseClient, QueryResult, Schema, Value};
use crate::error::{AskqlError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// A mock database client that returns predefined results.
#[derive(Debug, Clone, Default)]
pub struct MockDatabaseClient {
    schema: Schema,
    failing_table: Option<String>,
    fail_listing: bool,
}

impl MockDatabaseClient {
    /// Creates a new mock database client with an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new mock database client with the given schema.
    pub fn with_schema(schema: Schema) -> Self {
        Self {
            schema,
            ..Self::default()
        }
    }

    /// Makes column enumeration fail for the named table.
    pub fn failing_on_table(mut self, table: impl Into<String>) -> Self {
        self.failing_table = Some(table.into());
        self
    }

    /// Makes table enumeration fail.
    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn list_tables(&self) -> Result<Vec<String>> {
        if self.fail_listing {
            return Err(AskqlError::query("cannot list tables"));
        }
        Ok(self.schema.tables.iter().map(|t| t.name.clone()).collect())
    }

    async fn table_columns(&self, table: &str) -> Result<Vec<Column>> {
        if self.failing_table.as_deref() == Some(table) {
            return Err(AskqlError::query(format!("cannot read columns of {table}")));
        }
        self.schema
            .table(table)
            .map(|t| t.columns.clone())
            .ok_or_else(|| AskqlError::query(format!("no such table: {table}")))
    }

    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        if sql.trim_start().to_uppercase().starts_with("SELECT") {
            let columns = vec![ColumnInfo::new("result", "TEXT")];
            let rows = vec![vec![Value::String(format!("Mock result for: {}", sql))]];
            Ok(QueryResult::with_data(columns, rows).with_execution_time(Duration::from_millis(1)))
        } else {
            Ok(QueryResult::new().with_execution_time(Duration::from_millis(1)))
        }
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
