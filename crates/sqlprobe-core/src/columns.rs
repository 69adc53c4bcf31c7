//! Projected column extraction from `SELECT ... FROM` spans

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::params::split_top_level;

/// Shortest `SELECT <list> FROM` span; spans never overlap
static SELECT_LIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\bSELECT\s+(.*?)\s+FROM\b").unwrap());

static SET_QUANTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:DISTINCT|ALL)\s+").unwrap());

static AS_ALIAS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)\s+AS\s+["\w]+$"#).unwrap());

static BARE_ALIAS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\s+(["\w]+)$"#).unwrap());

/// Collect projected expressions of every select list, aliases removed.
///
/// A select list containing a subquery ends at the subquery's `FROM`, so the
/// outer list is cut short; this is accepted.
pub fn extract_columns(cleaned: &str) -> BTreeSet<String> {
    let mut columns = BTreeSet::new();

    for caps in SELECT_LIST_RE.captures_iter(cleaned) {
        let list = caps[1].trim();
        let list = SET_QUANTIFIER_RE.replace(list, "");

        for item in split_top_level(&list) {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            columns.insert(strip_alias(item).to_string());
        }
    }

    tracing::debug!(count = columns.len(), "select columns extracted");
    columns
}

/// Drop a trailing `AS alias`, or failing that a bare trailing alias.
///
/// A bare trailing word is kept when it closes a `CASE` expression or follows
/// an operator (`a + b`).
fn strip_alias(item: &str) -> &str {
    if let Some(m) = AS_ALIAS_RE.find(item) {
        return &item[..m.start()];
    }

    if let Some(caps) = BARE_ALIAS_RE.captures(item) {
        let whole = caps.get(0).expect("whole match is always present");
        let prefix = &item[..whole.start()];
        if !caps[1].eq_ignore_ascii_case("END") && ends_expression(prefix) {
            return prefix;
        }
    }

    item
}

fn ends_expression(prefix: &str) -> bool {
    prefix.chars().next_back().is_some_and(|c| {
        c.is_alphanumeric() || matches!(c, '_' | '"' | '\'' | ')' | ']' | '*' | '`')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn columns(sql: &str) -> Vec<String> {
        extract_columns(sql).into_iter().collect()
    }

    #[test]
    fn test_extract_simple_list_sorted() {
        assert_eq!(
            columns("SELECT name, email FROM customers WHERE id = 1"),
            vec!["email", "name"]
        );
    }

    #[test]
    fn test_extract_strips_as_alias() {
        assert_eq!(
            columns("SELECT COUNT(*) AS total, c.id as \"Id\" FROM c"),
            vec!["COUNT(*)", "c.id"]
        );
    }

    #[test]
    fn test_extract_strips_bare_alias() {
        assert_eq!(
            columns("SELECT o.amount amt, ROUND(o.tax, 2) tax FROM o"),
            vec!["ROUND(o.tax, 2)", "o.amount"]
        );
    }

    #[test]
    fn test_extract_keeps_operators_and_case() {
        assert_eq!(
            columns("SELECT a + b, CASE WHEN x THEN 1 ELSE 0 END FROM t"),
            vec!["CASE WHEN x THEN 1 ELSE 0 END", "a + b"]
        );
    }

    #[test]
    fn test_extract_case_with_alias() {
        assert_eq!(
            columns("SELECT CASE WHEN x THEN 1 END AS flag FROM t"),
            vec!["CASE WHEN x THEN 1 END"]
        );
    }

    #[test]
    fn test_extract_drops_distinct() {
        assert_eq!(columns("select distinct region, city from t"), vec!["city", "region"]);
    }

    #[test]
    fn test_extract_deduplicates_across_spans() {
        let sql = "SELECT a, b FROM t;\nSELECT b, c FROM u;";
        assert_eq!(columns(sql), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_extract_multiline_list() {
        let sql = "SELECT\n    id,\n    first_name || ' ' || last_name AS full_name\n  FROM emp";
        assert_eq!(
            columns(sql),
            vec!["first_name || ' ' || last_name", "id"]
        );
    }

    #[test]
    fn test_extract_nested_subquery_cuts_outer_list() {
        let sql = "SELECT id, (SELECT MAX(x) FROM u) m FROM t";
        assert_eq!(columns(sql), vec!["(SELECT MAX(x)", "id"]);
    }

    #[test]
    fn test_extract_star_and_no_from() {
        assert_eq!(columns("SELECT * FROM t"), vec!["*"]);
        assert!(extract_columns("SELECT 1;").is_empty());
    }
}
