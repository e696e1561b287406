//! Error types for askql.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for askql operations.
#[derive(Error, Debug)]
pub enum AskqlError {
    /// Fatal startup errors (missing seed script, failed database load, missing API key).
    #[error("Setup error: {0}")]
    Setup(String),

    /// Database connection errors (unreadable file, locked database, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution errors (syntax errors, missing tables, constraint violations, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// LLM API errors (rate limits, auth, timeouts, etc.)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Configuration errors (invalid config file, unknown provider, etc.)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AskqlError {
    /// Creates a setup error with the given message.
    pub fn setup(msg: impl Into<String>) -> Self {
        Self::Setup(msg.into())
    }

    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates an LLM error with the given message.
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Setup(_) => "Setup Error",
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Llm(_) => "LLM Error",
            Self::Config(_) => "Configuration Error",
        }
    }

    /// Returns the message without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Setup(msg)
            | Self::Connection(msg)
            | Self::Query(msg)
            | Self::Llm(msg)
            | Self::Config(msg) => msg,
        }
    }
}

/// Result type alias using AskqlError.
pub type Result<T> = std::result::Result<T, AskqlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_setup() {
        let err = AskqlError::setup("SQL file not found at data/chinook_seed.sql");
        assert_eq!(
            err.to_string(),
            "Setup error: SQL file not found at data/chinook_seed.sql"
        );
        assert_eq!(err.category(), "Setup Error");
    }

    #[test]
    fn test_error_display_query() {
        let err = AskqlError::query("no such table: Foo");
        assert_eq!(err.to_string(), "Query error: no such table: Foo");
        assert_eq!(err.category(), "Query Error");
    }

    #[test]
    fn test_error_display_llm() {
        let err = AskqlError::llm("Rate limited. Please wait.");
        assert_eq!(err.to_string(), "LLM error: Rate limited. Please wait.");
        assert_eq!(err.category(), "LLM Error");
    }

    #[test]
    fn test_error_display_config() {
        let err = AskqlError::config("unknown provider 'foo'");
        assert_eq!(
            err.to_string(),
            "Configuration error: unknown provider 'foo'"
        );
        assert_eq!(err.category(), "Configuration Error");
    }

    #[test]
    fn test_error_display_connection() {
        let err = AskqlError::connection("database is locked");
        assert_eq!(err.to_string(), "Connection error: database is locked");
        assert_eq!(err.category(), "Connection Error");
    }

    #[test]
    fn test_error_message_has_no_prefix() {
        let err = AskqlError::query("near \"SELEC\": syntax error");
        assert_eq!(err.message(), "near \"SELEC\": syntax error");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AskqlError>();
    }
}
