//! Parameter list parsing

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// `[mode] name [mode] rest`; the second mode slot covers `p_id IN NUMBER`
static PARAMETER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)^(?:(IN\s+OUT|INOUT|IN|OUT)\s+)?([@"\w]+)\s+(?:(IN\s+OUT|INOUT|IN|OUT)\s+)?(.+)$"#,
    )
    .unwrap()
});

static DEFAULT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\bDEFAULT\b\s+(.+)$").unwrap());

/// Direction of a routine parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParameterMode {
    In,
    Out,
    InOut,
    #[default]
    Unspecified,
}

impl ParameterMode {
    fn from_keyword(keyword: &str) -> Self {
        let normalized: String = keyword
            .split_whitespace()
            .collect::<String>()
            .to_ascii_uppercase();
        match normalized.as_str() {
            "IN" => ParameterMode::In,
            "OUT" => ParameterMode::Out,
            "INOUT" => ParameterMode::InOut,
            _ => ParameterMode::Unspecified,
        }
    }
}

impl fmt::Display for ParameterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterMode::In => write!(f, "IN"),
            ParameterMode::Out => write!(f, "OUT"),
            ParameterMode::InOut => write!(f, "INOUT"),
            ParameterMode::Unspecified => write!(f, "UNSPECIFIED"),
        }
    }
}

/// One entry of a routine's parameter list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Parameter {
    Structured {
        name: String,
        mode: ParameterMode,
        datatype: String,
        #[serde(rename = "default")]
        default_expression: Option<String>,
    },
    /// Fragment that did not fit `[mode] name type [DEFAULT expr]`
    Raw {
        #[serde(rename = "raw")]
        raw_text: String,
    },
}

impl Parameter {
    pub fn name(&self) -> Option<&str> {
        match self {
            Parameter::Structured { name, .. } => Some(name),
            Parameter::Raw { .. } => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Parameter::Raw { .. })
    }
}

/// Parse raw parameter text into parameters, in source order.
///
/// Empty fragments are skipped; fragments that do not match the grammar are
/// kept as [`Parameter::Raw`].
pub fn parse(raw_params: &str) -> Vec<Parameter> {
    split_top_level(raw_params)
        .into_iter()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(parse_fragment)
        .collect()
}

fn parse_fragment(fragment: &str) -> Parameter {
    let Some(caps) = PARAMETER_RE.captures(fragment) else {
        tracing::warn!(fragment, "parameter kept as raw text");
        return Parameter::Raw {
            raw_text: fragment.to_string(),
        };
    };

    let mode = caps
        .get(1)
        .or_else(|| caps.get(3))
        .map(|m| ParameterMode::from_keyword(m.as_str()))
        .unwrap_or_default();
    let rest = caps[4].trim();

    let (datatype, default_expression) = match DEFAULT_RE.captures(rest) {
        Some(default) => {
            let clause = default.get(0).expect("whole match is always present");
            (
                rest[..clause.start()].trim().to_string(),
                Some(default[1].trim().to_string()),
            )
        }
        None => (rest.to_string(), None),
    };

    Parameter::Structured {
        name: caps[2].to_string(),
        mode,
        datatype,
        default_expression,
    }
}

/// Split at commas that are not inside parentheses.
///
/// A stray `)` never drives the depth below zero.
pub fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, b) in text.bytes().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);

    parts
}
