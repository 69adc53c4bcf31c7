//! Error and diagnostic types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal errors that stop an analysis before it starts
#[derive(Debug, Error, miette::Diagnostic)]
pub enum AnalyzeError {
    #[error("input file not found: {}", path.display())]
    #[diagnostic(
        code(sqlprobe::input_not_found),
        help("check the path, glob patterns are expanded before this check")
    )]
    InputNotFound { path: PathBuf },

    #[error("failed to read input file: {}", path.display())]
    #[diagnostic(code(sqlprobe::read_failed))]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Source location span in the script as read, comments included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset from start of the script
    pub offset: usize,
    /// Length in bytes
    pub length: usize,
}

impl Span {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Info,
}

/// A recoverable finding recorded while analyzing a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    pub span: Option<Span>,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            message: message.into(),
            span: None,
            help: None,
        }
    }

    pub fn info(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Info,
            message: message.into(),
            span: None,
            help: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Get the diagnostic code string (e.g., "W0001")
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// Types of recoverable findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// W0001: Parameter fragment kept as raw text
    MalformedParameter,
    /// W0002: Parameter list opened but never closed
    UnbalancedParameterList,
    /// I0001: No CREATE PROCEDURE/FUNCTION/VIEW header
    NoDefinitionFound,
}

impl DiagnosticKind {
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::MalformedParameter => "W0001",
            DiagnosticKind::UnbalancedParameterList => "W0002",
            DiagnosticKind::NoDefinitionFound => "I0001",
        }
    }

    /// Kebab-case name shown next to the code
    pub fn name(&self) -> &'static str {
        match self {
            DiagnosticKind::MalformedParameter => "malformed-parameter",
            DiagnosticKind::UnbalancedParameterList => "unbalanced-parameter-list",
            DiagnosticKind::NoDefinitionFound => "no-definition-found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(DiagnosticKind::MalformedParameter.code(), "W0001");
        assert_eq!(DiagnosticKind::UnbalancedParameterList.code(), "W0002");
        assert_eq!(DiagnosticKind::NoDefinitionFound.code(), "I0001");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(
            DiagnosticKind::UnbalancedParameterList.name(),
            "unbalanced-parameter-list"
        );
        assert_eq!(DiagnosticKind::MalformedParameter.name(), "malformed-parameter");
    }

    #[test]
    fn test_input_not_found_message() {
        let err = AnalyzeError::InputNotFound {
            path: PathBuf::from("missing.sql"),
        };
        assert_eq!(err.to_string(), "input file not found: missing.sql");
    }
}
