//! SQLite database client implementation.
//!
//! Provides the `SqliteClient` struct that implements the `DatabaseClient` trait
//! on top of a single-connection sqlx pool, so every stage of the pipeline
//! shares one connection.

use crate::db::{Column, ColumnInfo, DatabaseClient, QueryResult, Row, Value};
use crate::error::{AskqlError, Result};
use async_trait::async_trait;
use sqlparser::dialect::SQLiteDialect;
use sqlparser::tokenizer::{Token, Tokenizer, TokenizerError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column as SqlxColumn, Executor, Row as SqlxRow, Statement, TypeInfo, ValueRef};
use std::path::Path;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Path value that selects an in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

/// How long to wait on a locked database file.
const BUSY_TIMEOUT_SECS: u64 = 5;

/// SQLite database client.
#[derive(Debug, Clone)]
pub struct SqliteClient {
    pool: SqlitePool,
    location: String,
}

impl SqliteClient {
    /// Opens the database at `path`, creating the file if it does not exist.
    ///
    /// `:memory:` opens a private in-memory database.
    pub async fn open(path: &Path) -> Result<Self> {
        let location = path.display().to_string();

        let options = if location == MEMORY_PATH {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| AskqlError::connection(format!("Invalid database path: {e}")))?
        } else {
            SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
        }
        .busy_timeout(Duration::from_secs(BUSY_TIMEOUT_SECS))
        .foreign_keys(false);

        // One connection, kept for the whole run. An in-memory database lives
        // only as long as its connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(|e| {
                AskqlError::connection(format!("Failed to open database {location}: {e}"))
            })?;

        debug!("Opened SQLite database at {location}");
        Ok(Self { pool, location })
    }

    /// Returns the database location as given to [`SqliteClient::open`].
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Reads a seed script from disk and executes it.
    ///
    /// Both a missing/unreadable file and a failing script are setup errors.
    pub async fn load_seed_script(&self, path: &Path) -> Result<()> {
        let script = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AskqlError::setup(format!("SQL file not found at {}.", path.display()))
            } else {
                AskqlError::setup(format!("Error reading SQL file: {e}"))
            }
        })?;

        self.execute_script(&script).await.map_err(|e| {
            AskqlError::setup(format!("Error creating/loading database: {}", e.message()))
        })?;

        info!("Seed script {} loaded into {}", path.display(), self.location);
        Ok(())
    }

    /// Executes a multi-statement SQL script as one batch.
    pub async fn execute_script(&self, script: &str) -> Result<()> {
        sqlx::raw_sql(script)
            .execute(&self.pool)
            .await
            .map_err(|e| AskqlError::query(format_query_error(e)))?;
        Ok(())
    }

    /// Counts the rows of a table.
    pub async fn count_rows(&self, table: &str) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(table));
        sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AskqlError::query(format_query_error(e)))
    }

    /// Reads column headers from the prepared statement.
    async fn fetch_column_metadata(&self, sql: &str) -> Result<Vec<ColumnInfo>> {
        let statement = self
            .pool
            .prepare(sql)
            .await
            .map_err(|e| AskqlError::query(format_query_error(e)))?;

        Ok(statement
            .columns()
            .iter()
            .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
            .collect())
    }
}

#[async_trait]
impl DatabaseClient for SqliteClient {
    async fn list_tables(&self) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT name
            FROM sqlite_master
            WHERE type = 'table' AND name NOT LIKE 'sqlite\_%' ESCAPE '\'
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AskqlError::query(format!(
                "Failed to fetch tables: {}",
                format_query_error(e)
            ))
        })
    }

    async fn table_columns(&self, table: &str) -> Result<Vec<Column>> {
        let rows: Vec<(String, String, i64, Option<String>)> = sqlx::query_as(
            r#"
            SELECT name, type, "notnull", dflt_value
            FROM pragma_table_info(?1)
            ORDER BY cid
            "#,
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AskqlError::query(format!(
                "Failed to fetch columns for {table}: {}",
                format_query_error(e)
            ))
        })?;

        Ok(rows
            .into_iter()
            .map(|(name, data_type, not_null, default)| Column {
                name,
                data_type,
                is_nullable: not_null == 0,
                default,
            })
            .collect())
    }

    /// Runs exactly one statement and returns its result set.
    ///
    /// Input with several statements is refused before anything runs. A
    /// statement that produces no result set still runs, but is reported as
    /// an error.
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        match count_statements(sql) {
            Ok(0) => return Err(AskqlError::query("No SQL statement to execute.")),
            Ok(1) => {}
            Ok(_) => {
                return Err(AskqlError::query(
                    "You can only execute one statement at a time.",
                ))
            }
            Err(e) => {
                // SQLite's own message is more useful when it rejects the first statement.
                self.fetch_column_metadata(sql).await?;
                return Err(AskqlError::query(e.to_string()));
            }
        }

        let start = Instant::now();
        let columns = self.fetch_column_metadata(sql).await?;

        if columns.is_empty() {
            let done = sqlx::query(sql)
                .execute(&self.pool)
                .await
                .map_err(|e| AskqlError::query(format_query_error(e)))?;
            return Err(AskqlError::query(format!(
                "Statement returned no result set ({} rows affected)",
                done.rows_affected()
            )));
        }

        let result = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AskqlError::query(format_query_error(e)))?;

        let execution_time = start.elapsed();
        let rows: Vec<Row> = result.iter().map(convert_row).collect();
        debug!("Query returned {} rows in {:?}", rows.len(), execution_time);

        Ok(QueryResult::with_data(columns, rows).with_execution_time(execution_time))
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        debug!("Closed SQLite database at {}", self.location);
        Ok(())
    }
}

/// Counts the statements in `sql`, ignoring comments and empty statements.
///
/// Semicolons inside string literals, quoted identifiers and comments do not
/// separate statements.
fn count_statements(sql: &str) -> std::result::Result<usize, TokenizerError> {
    let tokens = Tokenizer::new(&SQLiteDialect {}, sql).tokenize()?;

    let mut count = 0;
    let mut in_statement = false;
    for token in tokens {
        match token {
            Token::Whitespace(_) | Token::EOF => {}
            Token::SemiColon => in_statement = false,
            _ if !in_statement => {
                count += 1;
                in_statement = true;
            }
            _ => {}
        }
    }
    Ok(count)
}

/// Quotes an identifier for interpolation into SQL text.
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Extracts the database's own message from a sqlx error when there is one.
fn format_query_error(error: sqlx::Error) -> String {
    match error.as_database_error() {
        Some(db_error) => db_error.message().to_string(),
        None => error.to_string(),
    }
}

/// Converts a sqlx SqliteRow to our Row type.
fn convert_row(row: &SqliteRow) -> Row {
    (0..row.columns().len())
        .map(|i| convert_value(row, i))
        .collect()
}

/// Converts a single column value, dispatching on the value's storage class.
fn convert_value(row: &SqliteRow, index: usize) -> Value {
    let storage_class = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_uppercase(),
        Err(_) => return Value::Null,
    };

    match storage_class.as_str() {
        "INTEGER" | "BOOLEAN" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Int)
            .unwrap_or(Value::Null),

        "REAL" | "NUMERIC" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Float)
            .unwrap_or(Value::Null),

        "BLOB" => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bytes)
            .unwrap_or(Value::Null),

        _ => match row.try_get::<Option<String>, _>(index) {
            Ok(Some(text)) => Value::String(text),
            Ok(None) => Value::Null,
            Err(_) => row
                .try_get::<Option<Vec<u8>>, _>(index)
                .ok()
                .flatten()
                .map(Value::Bytes)
                .unwrap_or(Value::Null),
        },
    }
}
