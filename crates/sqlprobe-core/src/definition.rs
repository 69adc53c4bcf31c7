//! Routine and view header detection

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// `CREATE [OR REPLACE] PROCEDURE|FUNCTION|VIEW name`
static CREATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bCREATE\s+(?:OR\s+REPLACE\s+)?(PROCEDURE|FUNCTION|VIEW)\s+(["\w.]+)"#)
        .unwrap()
});

/// Return clause directly after the header
static RETURNS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*RETURNS\s+([^\s;]+)").unwrap());

/// Looser view header: bracket/backtick quoting, OR ALTER, MATERIALIZED
static VIEW_FALLBACK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\bCREATE\s+(?:OR\s+(?:REPLACE|ALTER)\s+)?(?:MATERIALIZED\s+)?VIEW\b(?:\s+([\[\]`"\w.]+))?"#,
    )
    .unwrap()
});

/// Kind of database object the script defines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ObjectType {
    Procedure,
    Function,
    View,
    #[default]
    Unknown,
}

impl ObjectType {
    fn from_keyword(keyword: &str) -> Self {
        match keyword.to_ascii_uppercase().as_str() {
            "PROCEDURE" => ObjectType::Procedure,
            "FUNCTION" => ObjectType::Function,
            "VIEW" => ObjectType::View,
            _ => ObjectType::Unknown,
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectType::Procedure => write!(f, "PROCEDURE"),
            ObjectType::Function => write!(f, "FUNCTION"),
            ObjectType::View => write!(f, "VIEW"),
            ObjectType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Header information of the object defined by a script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectDefinition {
    pub object_type: ObjectType,
    /// Qualified name exactly as written (e.g. `hr.get_emp`)
    pub name: Option<String>,
    /// Text between the parentheses following the name
    pub raw_parameters: Option<String>,
    pub return_type: Option<String>,
    /// Byte offset in the cleaned text where the body begins
    pub body_offset: usize,
    /// Byte offset of a `(` after the name that never closes
    pub unclosed_parameters_at: Option<usize>,
}

impl ObjectDefinition {
    pub fn is_unknown(&self) -> bool {
        self.object_type == ObjectType::Unknown
    }
}

/// Locate the first object header in `cleaned`.
///
/// Falls back to a looser `CREATE VIEW` scan, then to [`ObjectType::Unknown`]
/// with a zero body offset.
pub fn detect(cleaned: &str) -> ObjectDefinition {
    if let Some(caps) = CREATE_RE.captures(cleaned) {
        let header = caps.get(0).expect("whole match is always present");
        let mut definition = ObjectDefinition {
            object_type: ObjectType::from_keyword(&caps[1]),
            name: Some(caps[2].to_string()),
            ..Default::default()
        };

        // whitespace between name and parameter list belongs to the header
        let after_name = &cleaned[header.end()..];
        let mut end = cleaned.len() - after_name.trim_start().len();

        if cleaned[end..].starts_with('(') {
            match matching_paren(cleaned, end) {
                Some(close) => {
                    definition.raw_parameters = Some(cleaned[end + 1..close].to_string());
                    end = close + 1;
                }
                None => definition.unclosed_parameters_at = Some(end),
            }
        }

        if let Some(returns) = RETURNS_RE.captures(&cleaned[end..]) {
            definition.return_type = Some(returns[1].to_string());
            end += returns.get(0).expect("whole match is always present").end();
        }

        definition.body_offset = end;
        tracing::debug!(
            object_type = %definition.object_type,
            name = ?definition.name,
            body_offset = definition.body_offset,
            "object header detected"
        );
        return definition;
    }

    if let Some(caps) = VIEW_FALLBACK_RE.captures(cleaned) {
        let header = caps.get(0).expect("whole match is always present");
        tracing::debug!("view header matched by fallback scan");
        return ObjectDefinition {
            object_type: ObjectType::View,
            name: caps.get(1).map(|m| m.as_str().to_string()),
            body_offset: header.end(),
            ..Default::default()
        };
    }

    ObjectDefinition::default()
}

/// Byte index of the `)` closing the `(` at `open`, if any
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in text.bytes().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
