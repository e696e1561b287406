//! Database schema types for askql.
//!
//! Represents the tables and columns of a database and renders them as the
//! plain-text schema description sent to the LLM.

/// Represents the user tables of a database, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    /// All user tables.
    pub tables: Vec<Table>,
}

impl Schema {
    /// Creates a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of columns across all tables.
    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }

    /// Looks up a table by name (case-insensitive, like SQLite).
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Formats the schema for inclusion in an LLM prompt.
    ///
    /// One block per table: a `table:` header, a `Columns:` line, one line per
    /// column and a trailing blank line.
    pub fn format_for_llm(&self) -> String {
        let mut out = String::new();
        for table in &self.tables {
            push_table_header(&mut out, &table.name);
            for column in &table.columns {
                push_column_line(&mut out, column);
            }
            out.push('\n');
        }
        out
    }
}

/// Appends the header lines of a table block.
pub(crate) fn push_table_header(out: &mut String, table: &str) {
    out.push_str("table: ");
    out.push_str(table);
    out.push_str("\nColumns:\n");
}

/// Appends one column line of a table block.
pub(crate) fn push_column_line(out: &mut String, column: &Column) {
    out.push_str(&format!("  - {} ({})\n", column.name, column.data_type));
}

/// Represents a database table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Table name.
    pub name: String,

    /// Columns in declaration order.
    pub columns: Vec<Column>,
}

impl Table {
    /// Creates a new table with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Adds a column.
    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }
}

/// Represents a column in a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Declared type (may be empty; SQLite allows untyped columns).
    pub data_type: String,

    /// Whether the column accepts NULL.
    pub is_nullable: bool,

    /// Default value expression, if any.
    pub default: Option<String>,
}

impl Column {
    /// Creates a new nullable column with the given name and declared type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            is_nullable: true,
            default: None,
        }
    }

    /// Sets whether the column is nullable.
    pub fn nullable(self, is_nullable: bool) -> Self {
        Self {
            is_nullable,
            ..self
        }
    }
}
