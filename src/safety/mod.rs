//! Read-only gate for generated SQL.
//!
//! Classifies SQLite statements so the pipeline can refuse anything that is
//! not a plain read when running in read-only mode.

mod parser;

pub use parser::classify_sql;

use std::fmt;

/// How much a statement can change the database, least to most.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SafetyLevel {
    /// Reads only: SELECT, EXPLAIN, PRAGMA without a value.
    Safe,
    /// Writes rows or connection state: INSERT, UPDATE, PRAGMA assignments, ATTACH.
    Mutating,
    /// Loses data or changes the schema: DELETE, DROP, ALTER, CREATE.
    Destructive,
}

impl fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safe => write!(f, "Safe"),
            Self::Mutating => write!(f, "Mutating"),
            Self::Destructive => write!(f, "Destructive"),
        }
    }
}

/// Kind of SQLite statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementType {
    Select,
    Explain,
    Pragma,
    Insert,
    Update,
    Delete,
    Create,
    Alter,
    Drop,
    Attach,
    /// Several statements; holds the kind of the most dangerous one.
    Multiple(Box<StatementType>),
    Unknown,
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            Self::Select => "SELECT",
            Self::Explain => "EXPLAIN",
            Self::Pragma => "PRAGMA",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Create => "CREATE",
            Self::Alter => "ALTER",
            Self::Drop => "DROP",
            Self::Attach => "ATTACH",
            Self::Multiple(inner) => return write!(f, "Multiple ({inner})"),
            Self::Unknown => "Unknown",
        };
        f.write_str(keyword)
    }
}

/// Outcome of classifying a SQL string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub level: SafetyLevel,
    pub statement_type: StatementType,
    /// Logged when read-only mode refuses the statement.
    pub warning: Option<String>,
}

impl ClassificationResult {
    pub fn new(level: SafetyLevel, statement_type: StatementType) -> Self {
        let warning = (level == SafetyLevel::Destructive)
            .then(|| "This action cannot be undone.".to_string());
        Self {
            level,
            statement_type,
            warning,
        }
    }

    /// Classification for input that is not a statement we recognize.
    pub fn unknown(warning: impl Into<String>) -> Self {
        Self {
            level: SafetyLevel::Destructive,
            statement_type: StatementType::Unknown,
            warning: Some(warning.into()),
        }
    }

    /// Returns true if the SQL may run in read-only mode.
    pub fn is_read_only(&self) -> bool {
        self.level == SafetyLevel::Safe
    }

    /// Message reported when read-only mode refuses this SQL.
    pub fn rejection_message(&self) -> String {
        format!(
            "Refusing to execute {} statement in read-only mode",
            self.statement_type
        )
    }
}
