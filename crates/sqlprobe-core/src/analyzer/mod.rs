//! SQL script analyzer module

use std::path::Path;

use crate::columns::extract_columns;
use crate::definition::detect;
use crate::error::{AnalyzeError, Diagnostic, DiagnosticKind, Span};
use crate::params::{self, Parameter};
use crate::report::{AnalysisReport, Extraction, ReportAssembler, ReportLimits};
use crate::source::SourceDocument;
use crate::statements::segment;
use crate::tables::extract_tables;

/// Script analyzer - extracts header, parameter and DML metadata from SQL text
#[derive(Debug, Clone, Copy, Default)]
pub struct Analyzer {
    assembler: ReportAssembler,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: ReportLimits) -> Self {
        Self {
            assembler: ReportAssembler::new(limits),
        }
    }

    /// Read and analyze a script file.
    ///
    /// A missing file is reported as [`AnalyzeError::InputNotFound`] without
    /// attempting a read.
    pub fn analyze_file(&self, path: &Path) -> Result<AnalysisReport, AnalyzeError> {
        if !path.exists() {
            return Err(AnalyzeError::InputNotFound {
                path: path.to_path_buf(),
            });
        }
        let sql = std::fs::read_to_string(path).map_err(|source| AnalyzeError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.analyze(&path.display().to_string(), &sql))
    }

    /// Analyze SQL text. Never fails; unrecognised input yields an UNKNOWN report.
    pub fn analyze(&self, source_file: &str, sql: &str) -> AnalysisReport {
        let document = SourceDocument::new(sql);
        let cleaned = document.cleaned();
        let definition = detect(cleaned);
        let mut diagnostics = Vec::new();

        if definition.is_unknown() {
            tracing::info!(source_file, "no CREATE PROCEDURE/FUNCTION/VIEW header found");
            diagnostics.push(
                Diagnostic::info(
                    DiagnosticKind::NoDefinitionFound,
                    "no CREATE PROCEDURE, FUNCTION or VIEW header found",
                )
                .with_help("statements, tables and columns are extracted from the whole script"),
            );
        }

        if let Some(offset) = definition.unclosed_parameters_at {
            tracing::warn!(source_file, offset, "parameter list is never closed");
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticKind::UnbalancedParameterList,
                    "parameter list opened after the object name is never closed",
                )
                .with_span(Span::new(document.raw_offset(offset), 1)),
            );
        }

        let parameters = definition
            .raw_parameters
            .as_deref()
            .map(params::parse)
            .unwrap_or_default();
        for parameter in &parameters {
            if let Parameter::Raw { raw_text } = parameter {
                diagnostics.push(
                    Diagnostic::warning(
                        DiagnosticKind::MalformedParameter,
                        format!("parameter '{}' kept as raw text", raw_text),
                    )
                    .with_help("expected `[IN|OUT|INOUT] name type [DEFAULT expr]`"),
                );
            }
        }

        let extraction = Extraction {
            parameters,
            statements: segment(cleaned),
            tables: extract_tables(cleaned),
            columns: extract_columns(cleaned),
            diagnostics,
        };

        self.assembler
            .assemble(source_file, &document, &definition, extraction)
    }
}
