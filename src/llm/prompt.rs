//! Prompt construction for LLM requests.
//!
//! Merges the schema description and a question into a fixed template.

/// Prompt template for the SQL assistant.
pub const PROMPT_TEMPLATE: &str = r#"You are a SQL assistant. Given a database schema and a natural language request,
write the correct SQL query to answer it. Only use the given schema.
Answer with a single SQL query.
Schema:
{schema}
Question: "{question}"

SQL:
"#;

/// Builds the prompt for one question.
///
/// Substitution is a single pass over the template, so braces inside the
/// schema or the question are copied through untouched.
pub fn build_prompt(schema: &str, question: &str) -> String {
    let mut prompt =
        String::with_capacity(PROMPT_TEMPLATE.len() + schema.len() + question.len());
    let mut rest = PROMPT_TEMPLATE;

    while let Some(start) = rest.find('{') {
        prompt.push_str(&rest[..start]);
        let placeholder = &rest[start..];
        if let Some(tail) = placeholder.strip_prefix("{schema}") {
            prompt.push_str(schema);
            rest = tail;
        } else if let Some(tail) = placeholder.strip_prefix("{question}") {
            prompt.push_str(question);
            rest = tail;
        } else {
            prompt.push('{');
            rest = &placeholder[1..];
        }
    }
    prompt.push_str(rest);

    prompt
}

/// Pulls the question back out of a prompt built by [`build_prompt`].
pub fn extract_question(prompt: &str) -> Option<&str> {
    let start = prompt.rfind("Question: \"")? + "Question: \"".len();
    let end = prompt[start..].rfind('"')? + start;
    Some(&prompt[start..end])
}
