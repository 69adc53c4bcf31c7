//! Heuristic DML statement segmentation
//!
//! A statement starts at a whole-word `SELECT`, `INSERT INTO`, `UPDATE`,
//! `DELETE FROM` or `MERGE` and runs until the first of:
//!
//! - the next `;` (not included),
//! - a line break followed by a line that starts in column one,
//! - the end of the text.
//!
//! Scanning resumes where the previous statement ended. Nested statements are
//! not suppressed: a subquery that starts on its own unindented line is
//! reported again as a separate entry, while one inside a single-line span is
//! not.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static STATEMENT_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(SELECT|INSERT\s+INTO|UPDATE|DELETE\s+FROM|MERGE)\b").unwrap()
});

/// Leading keyword of a captured statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Merge,
}

impl StatementKind {
    fn from_keyword(keyword: &str) -> Option<Self> {
        let first = keyword.split_whitespace().next()?;
        match first.to_ascii_uppercase().as_str() {
            "SELECT" => Some(StatementKind::Select),
            "INSERT" => Some(StatementKind::Insert),
            "UPDATE" => Some(StatementKind::Update),
            "DELETE" => Some(StatementKind::Delete),
            "MERGE" => Some(StatementKind::Merge),
            _ => None,
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementKind::Select => write!(f, "SELECT"),
            StatementKind::Insert => write!(f, "INSERT"),
            StatementKind::Update => write!(f, "UPDATE"),
            StatementKind::Delete => write!(f, "DELETE"),
            StatementKind::Merge => write!(f, "MERGE"),
        }
    }
}

/// A DML statement found in the script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    #[serde(skip)]
    pub kind: StatementKind,
    #[serde(rename = "sql")]
    pub text: String,
    /// Character count of the untruncated text
    pub length: usize,
}

impl Statement {
    pub fn new(kind: StatementKind, text: impl Into<String>) -> Self {
        let text = text.into();
        let length = text.chars().count();
        Self { kind, text, length }
    }
}

/// Find statements in source order
pub fn segment(cleaned: &str) -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut cursor = 0;

    while let Some(start) = STATEMENT_START_RE.find_at(cleaned, cursor) {
        let end = statement_end(cleaned, start.end());
        let text = cleaned[start.start()..end].trim();

        if let Some(kind) = StatementKind::from_keyword(start.as_str()) {
            statements.push(Statement::new(kind, text));
        }
        cursor = end;
    }

    tracing::debug!(count = statements.len(), "statements segmented");
    statements
}

/// Byte offset where a statement whose keyword ends at `from` stops
fn statement_end(text: &str, from: usize) -> usize {
    for (i, b) in text.bytes().enumerate().skip(from) {
        match b {
            b';' => return i,
            b'\n' if starts_with_non_whitespace(&text[i + 1..]) => return i,
            _ => {}
        }
    }
    text.len()
}

fn starts_with_non_whitespace(text: &str) -> bool {
    text.chars().next().is_some_and(|c| !c.is_whitespace())
}
