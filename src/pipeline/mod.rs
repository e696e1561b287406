//! The question pipeline.
//!
//! For each question: build the prompt, ask the LLM, sanitize the
//! completion, run it, and record what happened. Every question ends in a
//! [`QuestionReport`]; nothing that goes wrong for one question stops the
//! next.

use tracing::{debug, info};

use crate::db::{describe_schema, DatabaseClient, QueryResult};
use crate::llm::parser::is_fenced;
use crate::llm::{build_prompt, sanitize_sql, LlmClient};
use crate::query::{ExecutionResult, QueryExecutor};

/// Terminal state of one question.
#[derive(Debug)]
pub enum QuestionOutcome {
    /// The SQL ran; holds its rows.
    Rows(QueryResult),
    /// The LLM call failed; the executor was not invoked.
    GenerationFailed(String),
    /// The SQL was generated but failed to run.
    ExecutionFailed(String),
    /// Read-only mode refused the SQL.
    Rejected(String),
}

impl QuestionOutcome {
    /// Returns true if the question produced rows.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Rows(_))
    }

    /// The error text for failed outcomes.
    pub fn error_text(&self) -> Option<&str> {
        match self {
            Self::Rows(_) => None,
            Self::GenerationFailed(msg) | Self::ExecutionFailed(msg) | Self::Rejected(msg) => {
                Some(msg)
            }
        }
    }
}

/// Everything printed for one question.
#[derive(Debug)]
pub struct QuestionReport {
    pub question: String,
    /// Sanitized SQL, or `None` when generation failed.
    pub sql: Option<String>,
    pub outcome: QuestionOutcome,
}

/// Runs questions against one database through one LLM client.
///
/// The schema description is built once and reused for every prompt.
pub struct Pipeline<'a> {
    db: &'a dyn DatabaseClient,
    llm: &'a dyn LlmClient,
    schema_text: String,
    read_only: bool,
}

impl<'a> Pipeline<'a> {
    /// Creates a pipeline, describing the database schema once.
    pub async fn new(db: &'a dyn DatabaseClient, llm: &'a dyn LlmClient) -> Pipeline<'a> {
        let schema_text = describe_schema(db).await;
        Self::with_schema_text(db, llm, schema_text)
    }

    /// Creates a pipeline around an already built schema description.
    pub fn with_schema_text(
        db: &'a dyn DatabaseClient,
        llm: &'a dyn LlmClient,
        schema_text: impl Into<String>,
    ) -> Pipeline<'a> {
        Self {
            db,
            llm,
            schema_text: schema_text.into(),
            read_only: false,
        }
    }

    /// Refuses SQL that is not read-only when set.
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// The schema description sent with every prompt.
    pub fn schema_text(&self) -> &str {
        &self.schema_text
    }

    /// Takes one question through every stage.
    pub async fn process_question(&self, question: &str) -> QuestionReport {
        let prompt = build_prompt(&self.schema_text, question);
        debug!("Prompt is {} bytes for model {}", prompt.len(), self.llm.model());

        let raw = match self.llm.complete(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                return QuestionReport {
                    question: question.to_string(),
                    sql: None,
                    outcome: QuestionOutcome::GenerationFailed(format!(
                        "Error generating SQL with LLM: {}",
                        e.message()
                    )),
                };
            }
        };

        if is_fenced(&raw) {
            debug!("Stripping code fence from completion");
        }
        let sql = sanitize_sql(&raw);
        let executor = QueryExecutor::new(self.db).with_read_only(self.read_only);
        let outcome = match executor.execute(&sql).await {
            ExecutionResult::Success(result) => QuestionOutcome::Rows(result),
            ExecutionResult::Error(message) => QuestionOutcome::ExecutionFailed(message),
            ExecutionResult::Rejected(classification) => {
                QuestionOutcome::Rejected(classification.rejection_message())
            }
        };

        QuestionReport {
            question: question.to_string(),
            sql: Some(sql),
            outcome,
        }
    }

    /// Processes questions in order, handing each report to `on_report`
    /// as soon as it is ready.
    pub async fn run<F>(&self, questions: &[String], mut on_report: F) -> Vec<QuestionReport>
    where
        F: FnMut(&QuestionReport),
    {
        let mut reports = Vec::with_capacity(questions.len());
        for (i, question) in questions.iter().enumerate() {
            info!("Question {}/{}", i + 1, questions.len());
            let report = self.process_question(question).await;
            on_report(&report);
            reports.push(report);
        }

        let succeeded = reports.iter().filter(|r| r.outcome.is_success()).count();
        info!("{} of {} questions returned rows", succeeded, reports.len());
        reports
    }
}
