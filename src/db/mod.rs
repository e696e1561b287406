//! Database abstraction layer for askql.
//!
//! Provides a trait-based interface over the shared database connection so
//! the schema introspector and the query executor can borrow the same client.

mod mock;
mod schema;
mod sqlite;
mod types;

pub use mock::MockDatabaseClient;
pub use schema::{Column, Schema, Table};
pub use sqlite::SqliteClient;
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::error::Result;
use async_trait::async_trait;
use tracing::warn;

/// Trait defining the interface for database clients.
///
/// All database operations are async and return Results with AskqlError.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Lists user tables in creation order, excluding internal bookkeeping tables.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Lists the columns of a table in declaration order.
    async fn table_columns(&self, table: &str) -> Result<Vec<Column>>;

    /// Introspects the full schema, failing on the first error.
    async fn introspect_schema(&self) -> Result<Schema> {
        let mut tables = Vec::new();
        for name in self.list_tables().await? {
            let columns = self.table_columns(&name).await?;
            tables.push(Table { name, columns });
        }
        Ok(Schema { tables })
    }

    /// Executes a SQL statement and returns all rows with their headers.
    async fn execute_query(&self, sql: &str) -> Result<QueryResult>;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;
}

/// Renders the schema description for the prompt, best-effort.
///
/// Never fails: if enumeration breaks partway, the text gathered so far is
/// returned followed by an `Error extracting schema:` line.
pub async fn describe_schema(db: &dyn DatabaseClient) -> String {
    let mut out = String::new();

    let tables = match db.list_tables().await {
        Ok(tables) => tables,
        Err(e) => {
            warn!("Schema introspection failed: {e}");
            out.push_str(&format!("Error extracting schema: {}\n", e.message()));
            return out;
        }
    };

    for table in tables {
        schema::push_table_header(&mut out, &table);
        match db.table_columns(&table).await {
            Ok(columns) => {
                for column in &columns {
                    schema::push_column_line(&mut out, column);
                }
                out.push('\n');
            }
            Err(e) => {
                warn!("Schema introspection failed on table {table}: {e}");
                out.push_str(&format!("Error extracting schema: {}\n", e.message()));
                return out;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_schema() -> Schema {
        Schema {
            tables: vec![
                Table::new("Genre")
                    .with_column(Column::new("GenreId", "INTEGER"))
                    .with_column(Column::new("Name", "NVARCHAR(120)")),
                Table::new("MediaType")
                    .with_column(Column::new("MediaTypeId", "INTEGER"))
                    .with_column(Column::new("Name", "NVARCHAR(120)")),
            ],
        }
    }

    #[tokio::test]
    async fn test_describe_matches_format_for_llm() {
        let schema = sample_schema();
        let client = MockDatabaseClient::with_schema(schema.clone());

        assert_eq!(describe_schema(&client).await, schema.format_for_llm());
    }

    #[tokio::test]
    async fn test_describe_keeps_partial_text_on_column_failure() {
        let client = MockDatabaseClient::with_schema(sample_schema()).failing_on_table("MediaType");

        let text = describe_schema(&client).await;

        assert!(text.starts_with("table: Genre\nColumns:\n  - GenreId (INTEGER)\n"));
        assert!(text.contains("table: MediaType\nColumns:\n"));
        assert!(text.ends_with("Error extracting schema: cannot read columns of MediaType\n"));
    }

    #[tokio::test]
    async fn test_describe_reports_listing_failure() {
        let client = MockDatabaseClient::with_schema(sample_schema()).failing_listing();

        let text = describe_schema(&client).await;

        assert_eq!(text, "Error extracting schema: cannot list tables\n");
    }

    #[tokio::test]
    async fn test_introspect_schema_propagates_errors() {
        let client = MockDatabaseClient::with_schema(sample_schema()).failing_on_table("Genre");
        assert!(client.introspect_schema().await.is_err());

        let client = MockDatabaseClient::with_schema(sample_schema());
        assert_eq!(client.introspect_schema().await.unwrap(), sample_schema());
    }
}
