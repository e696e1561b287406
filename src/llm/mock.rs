//! Mock LLM clients for demos and testing.
//!
//! Provides deterministic completions for the demo questions against the
//! Chinook schema, plus a client that always fails.

use async_trait::async_trait;

use crate::error::{AskqlError, Result};
use crate::llm::prompt::extract_question;
use crate::llm::LlmClient;

/// Mock LLM client that returns canned SQL based on the question asked.
///
/// Only the question is matched, never the schema text around it.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    /// Custom response mappings (pattern -> response), checked first.
    custom_responses: Vec<(String, String)>,
}

impl MockLlmClient {
    /// Creates a new mock client with the default responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom response mapping.
    ///
    /// When the question contains `pattern` (case-insensitive), the mock
    /// returns `response`.
    pub fn with_response(
        mut self,
        pattern: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.custom_responses
            .push((pattern.into(), response.into()));
        self
    }

    /// Generates a mock completion for a question.
    fn mock_response(&self, question: &str) -> String {
        let q = question.to_lowercase();

        for (pattern, response) in &self.custom_responses {
            if q.contains(&pattern.to_lowercase()) {
                return response.clone();
            }
        }

        if q.contains("customers") && q.contains("canada") {
            return "```sql\nSELECT * FROM Customer WHERE Country = 'Canada';\n```".to_string();
        }

        if q.contains("sales agent") {
            return "```sql\nSELECT EmployeeId, FirstName, LastName, Title\nFROM Employee\nWHERE Title LIKE '%Sales%Agent%';\n```".to_string();
        }

        if q.contains("most purchased tracks") {
            return "```sql\nSELECT t.Name, SUM(il.Quantity) AS TimesPurchased\nFROM InvoiceLine il\nJOIN Track t ON t.TrackId = il.TrackId\nGROUP BY t.TrackId\nORDER BY TimesPurchased DESC, t.Name\nLIMIT 5;\n```".to_string();
        }

        if q.contains("sales per country") {
            return "```sql\nSELECT BillingCountry, SUM(Total) AS TotalSales\nFROM Invoice\nGROUP BY BillingCountry\nORDER BY TotalSales DESC;\n```".to_string();
        }

        if q.contains("artists") && q.contains("albums") {
            return "```sql\nSELECT ar.Name, COUNT(al.AlbumId) AS AlbumCount\nFROM Artist ar\nJOIN Album al ON al.ArtistId = ar.ArtistId\nGROUP BY ar.ArtistId\nHAVING COUNT(al.AlbumId) > 5;\n```".to_string();
        }

        if q.contains("expensive albums") {
            return "```sql\nSELECT al.Title, SUM(t.UnitPrice) AS AlbumPrice\nFROM Album al\nJOIN Track t ON t.AlbumId = al.AlbumId\nGROUP BY al.AlbumId\nORDER BY AlbumPrice DESC\nLIMIT 3;\n```".to_string();
        }

        if q.contains("total revenue") {
            return "SELECT SUM(UnitPrice * Quantity) AS TotalRevenue FROM InvoiceLine;".to_string();
        }

        "I don't understand that question. Could you please rephrase it?".to_string()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let question = extract_question(prompt).unwrap_or(prompt);
        Ok(self.mock_response(question))
    }

    fn model(&self) -> &str {
        "mock"
    }
}

/// LLM client whose every call fails with the same error.
#[derive(Debug, Clone)]
pub struct FailingLlmClient {
    message: String,
}

impl FailingLlmClient {
    /// Creates a client that fails with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl LlmClient for FailingLlmClient {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(AskqlError::llm(self.message.clone()))
    }

    fn model(&self) -> &str {
        "failing"
    }
}
