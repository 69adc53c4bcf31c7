//! sqlprobe-core: heuristic metadata extraction for SQL scripts
//!
//! This library reads a script holding one stored procedure, function or
//! view definition and reports its header, parameters, DML statements,
//! referenced tables and projected columns. It does not parse SQL: every
//! stage is a tolerant, linear-time pattern scan over comment-free text.

pub mod analyzer;
pub mod columns;
pub mod definition;
pub mod error;
pub mod params;
pub mod report;
pub mod source;
pub mod statements;
pub mod tables;

pub use analyzer::Analyzer;
pub use definition::{ObjectDefinition, ObjectType};
pub use error::{AnalyzeError, Diagnostic, DiagnosticKind, Severity, Span};
pub use params::{Parameter, ParameterMode};
pub use report::{AnalysisReport, ReportLimits};
pub use source::SourceDocument;
pub use statements::{Statement, StatementKind};
