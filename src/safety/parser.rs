//! Statement classification on top of sqlparser's SQLite dialect.

use sqlparser::ast::{Query, SetExpr, Statement};
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;

use super::{ClassificationResult, SafetyLevel, StatementType};

/// Classifies a SQL string.
///
/// Unparseable or empty input is never read-only. With several statements
/// the most dangerous one decides.
pub fn classify_sql(sql: &str) -> ClassificationResult {
    let statements = match Parser::parse_sql(&SQLiteDialect {}, sql) {
        Ok(statements) => statements,
        Err(e) => return ClassificationResult::unknown(format!("Could not parse SQL: {e}")),
    };

    match statements.as_slice() {
        [] => ClassificationResult::unknown("Empty SQL statement"),
        [statement] => {
            let (level, kind) = classify_statement(statement);
            ClassificationResult::new(level, kind)
        }
        many => {
            let (level, kind) = many
                .iter()
                .map(classify_statement)
                .fold((SafetyLevel::Safe, StatementType::Select), |worst, next| {
                    if next.0 > worst.0 {
                        next
                    } else {
                        worst
                    }
                });
            ClassificationResult::new(level, StatementType::Multiple(Box::new(kind)))
        }
    }
}

fn classify_statement(statement: &Statement) -> (SafetyLevel, StatementType) {
    use SafetyLevel::{Destructive, Mutating, Safe};

    match statement {
        Statement::Query(query) => classify_query(query),
        // SQLite's EXPLAIN only describes the program, it never runs it
        Statement::Explain { .. } | Statement::ExplainTable { .. } => {
            (Safe, StatementType::Explain)
        }
        Statement::Pragma { value: None, .. } => (Safe, StatementType::Pragma),
        Statement::Pragma { .. } => (Mutating, StatementType::Pragma),

        Statement::Insert { .. } => (Mutating, StatementType::Insert),
        Statement::Update { .. } => (Mutating, StatementType::Update),
        Statement::AttachDatabase { .. } => (Mutating, StatementType::Attach),

        Statement::Delete { .. } => (Destructive, StatementType::Delete),
        Statement::Drop { .. } => (Destructive, StatementType::Drop),
        Statement::AlterTable { .. } => (Destructive, StatementType::Alter),
        Statement::CreateTable { .. }
        | Statement::CreateVirtualTable { .. }
        | Statement::CreateIndex { .. }
        | Statement::CreateView { .. } => (Destructive, StatementType::Create),

        _ => (Destructive, StatementType::Unknown),
    }
}

/// SQLite only allows writes at the top of a query (`WITH ... INSERT`),
/// never in subqueries or CTE bodies, so only the body needs a look.
fn classify_query(query: &Query) -> (SafetyLevel, StatementType) {
    match query.body.as_ref() {
        SetExpr::Insert(statement) | SetExpr::Update(statement) => classify_statement(statement),
        SetExpr::Query(inner) => classify_query(inner),
        _ => (SafetyLevel::Safe, StatementType::Select),
    }
}
