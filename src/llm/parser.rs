//! Response sanitizing for LLM outputs.
//!
//! Recovers a bare SQL statement from a completion that may be wrapped in a
//! markdown code fence.

use regex::Regex;
use std::sync::LazyLock;

const FENCE: &str = "```";

/// Opening fence: three backticks and an optional language tag.
///
/// Only known tags count, so SQL that starts right after the backticks
/// (```` ```SELECT ````) keeps its first keyword.
static OPENING_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^```(?:(?:sqlite3?|sql|postgres(?:ql)?|pgsql|psql|mysql|mariadb|tsql|plsql|plaintext|text)\b)?",
    )
    .expect("opening fence pattern is valid")
});

/// Strips markdown code fences from a completion.
///
/// A leading fence (with an optional language tag) is removed even when the
/// closing fence is missing, as happens with truncated completions. A closing
/// fence is only removed when an opening one was. Text without a leading
/// fence comes back trimmed and otherwise unchanged. The result never starts
/// with a fence, so applying this twice is the same as applying it once.
pub fn sanitize_sql(raw: &str) -> String {
    let mut text = raw.trim();
    while let Some(inner) = strip_fence_once(text) {
        text = inner;
    }
    text.to_string()
}

/// Removes one layer of fencing, or returns `None` if `text` is not fenced.
fn strip_fence_once(text: &str) -> Option<&str> {
    if !text.starts_with(FENCE) {
        return None;
    }

    let opening_len = OPENING_FENCE
        .find(text)
        .map(|m| m.end())
        .unwrap_or(FENCE.len());
    let body = text[opening_len..].trim();
    let body = body.strip_suffix(FENCE).unwrap_or(body);

    Some(body.trim())
}

/// Returns true if the completion is wrapped in a code fence.
pub fn is_fenced(raw: &str) -> bool {
    raw.trim_start().starts_with(FENCE)
}
