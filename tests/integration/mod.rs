//! Integration tests for askql.

pub mod common;
pub mod pipeline_test;
pub mod query_test;
pub mod schema_test;
pub mod seed_test;
