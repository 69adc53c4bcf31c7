//! Report assembly and truncation policy

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::definition::{ObjectDefinition, ObjectType};
use crate::error::Diagnostic;
use crate::params::Parameter;
use crate::source::SourceDocument;
use crate::statements::Statement;

/// Marker appended to truncated text
pub const ELLIPSIS: &str = "...";

pub const DEFAULT_MAX_STATEMENT_CHARS: usize = 5000;
pub const DEFAULT_MAX_EXCERPT_CHARS: usize = 2000;

/// Character caps applied when a report is assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLimits {
    /// Longest statement text kept verbatim
    pub max_statement_chars: usize,
    /// Longest body excerpt kept verbatim
    pub max_excerpt_chars: usize,
}

impl Default for ReportLimits {
    fn default() -> Self {
        Self {
            max_statement_chars: DEFAULT_MAX_STATEMENT_CHARS,
            max_excerpt_chars: DEFAULT_MAX_EXCERPT_CHARS,
        }
    }
}

/// Everything extracted from the cleaned text, before truncation
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub parameters: Vec<Parameter>,
    pub statements: Vec<Statement>,
    pub tables: BTreeSet<String>,
    pub columns: BTreeSet<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Metadata report for one script. Field order is the JSON field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    source_file: String,
    object_type: ObjectType,
    object_name: Option<String>,
    parameters: Vec<Parameter>,
    returns: Option<String>,
    leading_comments: String,
    tables: BTreeSet<String>,
    select_columns: BTreeSet<String>,
    queries: Vec<Statement>,
    body_excerpt: String,
    full_body_length: usize,
    #[serde(skip)]
    diagnostics: Vec<Diagnostic>,
}

impl AnalysisReport {
    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    pub fn object_name(&self) -> Option<&str> {
        self.object_name.as_deref()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn returns(&self) -> Option<&str> {
        self.returns.as_deref()
    }

    pub fn leading_comments(&self) -> &str {
        &self.leading_comments
    }

    pub fn tables(&self) -> &BTreeSet<String> {
        &self.tables
    }

    pub fn select_columns(&self) -> &BTreeSet<String> {
        &self.select_columns
    }

    /// Statements with text capped at [`ReportLimits::max_statement_chars`]
    pub fn queries(&self) -> &[Statement] {
        &self.queries
    }

    pub fn body_excerpt(&self) -> &str {
        &self.body_excerpt
    }

    pub fn full_body_length(&self) -> usize {
        self.full_body_length
    }

    /// Recoverable findings; not part of the JSON document
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Builds [`AnalysisReport`]s under a fixed set of limits
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportAssembler {
    limits: ReportLimits,
}

impl ReportAssembler {
    pub fn new(limits: ReportLimits) -> Self {
        Self { limits }
    }

    pub fn assemble(
        &self,
        source_file: impl Into<String>,
        document: &SourceDocument,
        definition: &ObjectDefinition,
        extraction: Extraction,
    ) -> AnalysisReport {
        let cleaned = document.cleaned();
        let body = cleaned.get(definition.body_offset..).unwrap_or(cleaned).trim();
        let (body_excerpt, full_body_length) = truncate_chars(body, self.limits.max_excerpt_chars);

        let queries = extraction
            .statements
            .into_iter()
            .map(|statement| {
                let (text, _) = truncate_chars(&statement.text, self.limits.max_statement_chars);
                Statement { text, ..statement }
            })
            .collect();

        AnalysisReport {
            source_file: source_file.into(),
            object_type: definition.object_type,
            object_name: definition.name.clone(),
            parameters: extraction.parameters,
            returns: definition.return_type.clone(),
            leading_comments: document.leading_comments().to_string(),
            tables: extraction.tables,
            select_columns: extraction.columns,
            queries,
            body_excerpt,
            full_body_length,
            diagnostics: extraction.diagnostics,
        }
    }
}

/// Cut `text` to `cap` characters plus [`ELLIPSIS`] when longer.
/// Returns the stored text and the true character count.
pub fn truncate_chars(text: &str, cap: usize) -> (String, usize) {
    let count = text.chars().count();
    if count <= cap {
        return (text.to_string(), count);
    }

    let cut = text.char_indices().nth(cap).map_or(text.len(), |(i, _)| i);
    (format!("{}{}", &text[..cut], ELLIPSIS), count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::detect;
    use crate::statements::StatementKind;

    #[test]
    fn test_truncate_within_cap_is_untouched() {
        assert_eq!(truncate_chars("abc", 3), ("abc".to_string(), 3));
        assert_eq!(truncate_chars("", 0), (String::new(), 0));
    }

    #[test]
    fn test_truncate_over_cap() {
        assert_eq!(truncate_chars("abcdef", 4), ("abcd...".to_string(), 6));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let (text, count) = truncate_chars("ééééé", 2);
        assert_eq!(text, "éé...");
        assert_eq!(count, 5);
    }

    #[test]
    fn test_assemble_truncates_statements_and_body() {
        let sql = format!("CREATE VIEW v AS SELECT {} FROM t", "x".repeat(50));
        let document = SourceDocument::new(sql);
        let definition = detect(document.cleaned());
        let statement = Statement::new(
            StatementKind::Select,
            "SELECT ".to_string() + &"y".repeat(30),
        );

        let assembler = ReportAssembler::new(ReportLimits {
            max_statement_chars: 10,
            max_excerpt_chars: 8,
        });
        let report = assembler.assemble(
            "v.sql",
            &document,
            &definition,
            Extraction {
                statements: vec![statement],
                ..Default::default()
            },
        );

        assert_eq!(report.queries()[0].text, "SELECT yyy...");
        assert_eq!(report.queries()[0].length, 37);
        assert_eq!(report.body_excerpt(), "AS SELEC...");
        assert_eq!(report.full_body_length, "AS SELECT  FROM t".len() + 50);
    }

    #[test]
    fn test_assemble_unknown_uses_whole_document() {
        let document = SourceDocument::new("  SELECT 1;  ");
        let definition = detect(document.cleaned());
        let report = ReportAssembler::default().assemble(
            "q.sql",
            &document,
            &definition,
            Extraction::default(),
        );
        assert_eq!(report.object_type(), ObjectType::Unknown);
        assert_eq!(report.body_excerpt(), "SELECT 1;");
        assert_eq!(report.full_body_length(), 9);
    }
}
