//! Console output for askql.
//!
//! Renders query results as plain-text tables and prints the per-question
//! report and the startup banners.

use crate::db::{QueryResult, Value};
use crate::pipeline::{QuestionOutcome, QuestionReport};

/// Line printed after every question.
pub const SEPARATOR_WIDTH: usize = 100;

/// How much of the schema description the startup banner shows.
pub const SCHEMA_PREVIEW_CHARS: usize = 1000;

/// Rule printed after each startup stage.
const STAGE_RULE_WIDTH: usize = 72;

/// Maximum width for any column.
const MAX_COLUMN_WIDTH: usize = 40;

/// Minimum width for any column.
const MIN_COLUMN_WIDTH: usize = 3;

const ELLIPSIS: &str = "...";

/// Returns the separator line.
pub fn separator() -> String {
    "=".repeat(SEPARATOR_WIDTH)
}

/// Renders a result as an aligned table.
///
/// When there are more than `max_rows` rows the first and last halves are
/// shown around an ellipsis row. `max_rows == 0` shows every row.
pub fn format_table(result: &QueryResult, max_rows: usize) -> String {
    let headers: Vec<&str> = result.column_names();
    let shape = format!("[{} rows x {} columns]", result.rows.len(), headers.len());

    if result.rows.is_empty() {
        let mut out = String::from("Empty result set\n");
        if !headers.is_empty() {
            out.push_str(&format!("Columns: {}\n", headers.join(", ")));
        }
        out.push_str(&shape);
        return out;
    }

    let (head, tail) = visible_rows(result.rows.len(), max_rows);
    let truncated = head.len() + tail.len() < result.rows.len();

    let display: Vec<Vec<String>> = head
        .chain(tail.clone())
        .map(|i| result.rows[i].iter().map(cell_text).collect())
        .collect();

    let widths = column_widths(&headers, &display);
    let numeric: Vec<bool> = (0..widths.len())
        .map(|col| {
            result
                .rows
                .iter()
                .filter_map(|row| row.get(col))
                .filter(|v| !v.is_null())
                .all(Value::is_numeric)
        })
        .collect();

    let mut lines = Vec::new();
    lines.push(render_border(&widths, '┌', '┬', '┐'));
    lines.push(render_row(
        headers.iter().map(|h| h.to_string()),
        &widths,
        &vec![false; widths.len()],
    ));
    lines.push(render_border(&widths, '├', '┼', '┤'));

    let head_len = display.len() - tail.len();
    for (i, row) in display.iter().enumerate() {
        if truncated && i == head_len {
            lines.push(render_row(
                widths.iter().map(|_| ELLIPSIS.to_string()),
                &widths,
                &numeric,
            ));
        }
        lines.push(render_row(row.iter().cloned(), &widths, &numeric));
    }

    lines.push(render_border(&widths, '└', '┴', '┘'));
    lines.push(shape);
    lines.join("\n")
}

/// Index ranges of the rows to show: everything, or a head and a tail.
fn visible_rows(
    total: usize,
    max_rows: usize,
) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
    if max_rows == 0 || total <= max_rows {
        return (0..total, total..total);
    }
    let head = max_rows.div_ceil(2);
    let tail = max_rows / 2;
    (0..head, total - tail..total)
}

/// Single-line display text for a cell.
fn cell_text(value: &Value) -> String {
    value.to_display_string().replace(['\n', '\r'], " ")
}

fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers
        .iter()
        .map(|h| h.chars().count().max(MIN_COLUMN_WIDTH))
        .collect();

    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    widths.iter().map(|&w| w.min(MAX_COLUMN_WIDTH)).collect()
}

/// Truncates to `max_width` characters, ending in an ellipsis when cut.
fn truncate(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= ELLIPSIS.len() {
        s.chars().take(max_width).collect()
    } else {
        let kept: String = s.chars().take(max_width - ELLIPSIS.len()).collect();
        format!("{kept}{ELLIPSIS}")
    }
}

fn render_border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let inner: Vec<String> = widths.iter().map(|&w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}", inner.join(&mid.to_string()))
}

fn render_row(
    cells: impl Iterator<Item = String>,
    widths: &[usize],
    right_align: &[bool],
) -> String {
    let mut line = String::from("│");
    for (i, cell) in cells.enumerate() {
        let width = widths.get(i).copied().unwrap_or(MIN_COLUMN_WIDTH);
        let text = truncate(&cell, width);
        if right_align.get(i).copied().unwrap_or(false) {
            line.push_str(&format!(" {text:>width$} │"));
        } else {
            line.push_str(&format!(" {text:<width$} │"));
        }
    }
    line
}

/// Renders the console block for one question, separator included.
pub fn format_report(report: &QuestionReport, max_rows: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("Question: {}\n", report.question));
    out.push_str(&format!(
        "SQL Query: {}\n",
        report.sql.as_deref().unwrap_or("None")
    ));
    out.push_str("Result:\n");
    match &report.outcome {
        QuestionOutcome::Rows(result) => out.push_str(&format_table(result, max_rows)),
        QuestionOutcome::GenerationFailed(msg)
        | QuestionOutcome::ExecutionFailed(msg)
        | QuestionOutcome::Rejected(msg) => out.push_str(msg),
    }
    out.push('\n');
    out.push_str(&separator());
    out
}

/// Prints one question's report to stdout, set off by blank lines.
pub fn print_report(report: &QuestionReport, max_rows: usize) {
    println!("\n{}\n", format_report(report, max_rows));
}

/// Prints the heading of a numbered startup stage.
pub fn print_stage(number: usize, title: &str) {
    println!("{number}. {title}");
}

/// Prints the closing line of a startup stage and its rule.
pub fn print_stage_done(message: &str) {
    println!(" -> {message}");
    println!("{}", "~".repeat(STAGE_RULE_WIDTH));
}

/// The first `max_chars` characters of the schema description.
pub fn schema_preview(schema_text: &str, max_chars: usize) -> &str {
    match schema_text.char_indices().nth(max_chars) {
        Some((idx, _)) => &schema_text[..idx],
        None => schema_text,
    }
}
