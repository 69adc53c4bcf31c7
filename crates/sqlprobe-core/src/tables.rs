//! Table reference extraction

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Identifier right after a relational clause keyword
static TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:FROM|JOIN|INTO|UPDATE|DELETE\s+FROM|MERGE\s+INTO)\s+(["\w.]+)"#)
        .unwrap()
});

/// Collect every identifier following `FROM`, `JOIN`, `INTO`, `UPDATE`,
/// `DELETE FROM` or `MERGE INTO`.
///
/// Nothing checks that the identifier really names a table, so function
/// arguments such as `EXTRACT(YEAR FROM d)` are reported too.
pub fn extract_tables(cleaned: &str) -> BTreeSet<String> {
    let tables: BTreeSet<String> = TABLE_RE
        .captures_iter(cleaned)
        .map(|caps| caps[1].to_string())
        .collect();
    tracing::debug!(count = tables.len(), "table references extracted");
    tables
}
