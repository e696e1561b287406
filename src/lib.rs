//! askql - ask questions about a SQLite database in plain English.
//!
//! This library exposes the core modules for the binary and for
//! integration tests.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod query;
pub mod safety;
