//! Query execution for askql.
//!
//! Isolates running generated SQL, the optional read-only gate, and the
//! conversion of failures into report text.

pub mod executor;

pub use executor::{ExecutionResult, QueryExecutor};
