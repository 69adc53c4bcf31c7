//! Output formatting

use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Result};
use sqlprobe_core::{AnalysisReport, Diagnostic, Parameter, Severity};

use crate::args::OutputFormat;

/// Where and how reports are emitted
pub struct OutputFormatter {
    format: OutputFormat,
    to_stdout: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, to_stdout: bool) -> Self {
        Self { format, to_stdout }
    }

    /// Emit one report for the script at `input`
    pub fn emit(&self, input: &Path, report: &AnalysisReport, quiet: bool) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                let json = render_json(report)?;
                if self.to_stdout {
                    println!("{}", json);
                } else {
                    let out_path = report_path(input);
                    std::fs::write(&out_path, json).into_diagnostic()?;
                    if !quiet {
                        eprintln!("Wrote: {}", out_path.display());
                    }
                }
            }
            OutputFormat::Human => print_human(report),
        }
        Ok(())
    }

    /// Print recoverable findings for one script; `source` is the script as read
    pub fn print_diagnostics(&self, file_name: &str, source: &str, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            let severity_str = match diag.severity {
                Severity::Warning => "\x1b[33mwarning\x1b[0m",
                Severity::Info => "\x1b[34minfo\x1b[0m",
            };

            eprintln!(
                "{}[{}]: {} ({})",
                severity_str,
                diag.code(),
                diag.message,
                diag.kind.name()
            );

            if let Some(span) = &diag.span {
                let (line, col) = offset_to_line_col(source, span.offset);
                eprintln!("  --> {}:{}:{}", file_name, line, col);

                if let Some(source_line) = get_source_line(source, line) {
                    eprintln!("   |");
                    eprintln!("{:>3} | {}", line, source_line);

                    let padding = " ".repeat(col.saturating_sub(1));
                    let remaining = source_line.chars().count().saturating_sub(col - 1);
                    let underline = "^".repeat(span.length.min(remaining).max(1));
                    eprintln!("   | {}{}", padding, underline);
                }
            } else {
                eprintln!("  --> {}", file_name);
            }

            if let Some(help) = &diag.help {
                eprintln!("   = help: {}", help);
            }

            eprintln!();
        }
    }
}

/// Pretty JSON, two-space indentation, non-ASCII kept verbatim
pub fn render_json(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).into_diagnostic()
}

/// Sibling path with the same stem and a `.json` extension
pub fn report_path(input: &Path) -> PathBuf {
    input.with_extension("json")
}

fn print_human(report: &AnalysisReport) {
    let name = report.object_name().unwrap_or("<unnamed>");
    println!("{}: {} {}", report.source_file(), report.object_type(), name);

    if let Some(returns) = report.returns() {
        println!("  returns: {}", returns);
    }

    if !report.parameters().is_empty() {
        println!("  parameters:");
        for parameter in report.parameters() {
            match parameter {
                Parameter::Structured {
                    name,
                    mode,
                    datatype,
                    default_expression,
                } => match default_expression {
                    Some(default) => {
                        println!("    - {} {} {} DEFAULT {}", name, mode, datatype, default)
                    }
                    None => println!("    - {} {} {}", name, mode, datatype),
                },
                Parameter::Raw { raw_text } => println!("    - (raw) {}", raw_text),
            }
        }
    }

    print_set("tables", report.tables().iter());
    print_set("select columns", report.select_columns().iter());

    println!("  statements: {}", report.queries().len());
    for query in report.queries() {
        let first_line = query.text.lines().next().unwrap_or_default();
        println!("    - {} ({} chars) {}", query.kind, query.length, first_line);
    }

    println!("  body: {} chars", report.full_body_length());
}

/// 1-based line and column (in characters) of a byte offset
fn offset_to_line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;

    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (line, col)
}

/// Get a specific line from source (1-indexed)
fn get_source_line(source: &str, line: usize) -> Option<&str> {
    source.lines().nth(line.saturating_sub(1))
}

fn print_set<'a>(label: &str, items: impl Iterator<Item = &'a String>) {
    let items: Vec<&str> = items.map(String::as_str).collect();
    if !items.is_empty() {
        println!("  {}: {}", label, items.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sqlprobe_core::Analyzer;

    #[test]
    fn test_report_path_replaces_extension() {
        assert_eq!(
            report_path(Path::new("procs/get_cust.sql")),
            PathBuf::from("procs/get_cust.json")
        );
        assert_eq!(report_path(Path::new("noext")), PathBuf::from("noext.json"));
    }

    #[test]
    fn test_offset_to_line_col() {
        let source = "-- note\nCREATE PROCEDURE p (a INT";
        let offset = source.find('(').unwrap();
        assert_eq!(offset_to_line_col(source, offset), (2, 20));
        assert_eq!(offset_to_line_col(source, 0), (1, 1));
        assert_eq!(get_source_line(source, 2), Some("CREATE PROCEDURE p (a INT"));
    }

    #[test]
    fn test_offset_to_line_col_counts_characters() {
        assert_eq!(offset_to_line_col("-- é\n  x", "-- é\n  ".len()), (2, 3));
        assert_eq!(offset_to_line_col("é(", "é".len()), (1, 2));
    }

    #[test]
    fn test_unclosed_list_location_in_commented_script() {
        let source = "/* owner: ops */\n-- v2\nCREATE FUNCTION f /* args */ (a INT";
        let report = Analyzer::new().analyze("f.sql", source);
        let span = report.diagnostics()[0].span.unwrap();

        assert_eq!(offset_to_line_col(source, span.offset), (3, 30));
    }

    #[test]
    fn test_render_json_is_pretty_and_keeps_unicode() {
        let report = Analyzer::new().analyze("café.sql", "SELECT prix FROM café;");
        let json = render_json(&report).unwrap();

        assert!(json.starts_with("{\n  \"source_file\": \"café.sql\""));
        assert!(json.contains("\"tables\": [\n    \"café\"\n  ]"));
    }
}
