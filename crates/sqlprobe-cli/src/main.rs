//! sqlprobe CLI - SQL script metadata extraction tool

mod args;
mod config;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use sqlprobe_core::{AnalyzeError, Analyzer};
use tracing_subscriber::EnvFilter;

use crate::args::Args;
use crate::config::Config;
use crate::output::OutputFormatter;

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing
    let level = match (args.quiet, args.verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::WARN,
        (false, 1) => tracing::Level::INFO,
        (false, _) => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(args: Args) -> Result<()> {
    // Load configuration
    let config = if let Some(path) = &args.config {
        Config::from_file(path)?
    } else {
        Config::find_and_load()?.unwrap_or_default()
    };

    // Merge CLI args with config (CLI takes precedence)
    let config = config.merge_with_args(
        &args.files,
        args.format,
        args.max_statement_chars,
        args.max_excerpt_chars,
    );

    let inputs = expand_inputs(&config.files)?;
    if inputs.is_empty() {
        miette::bail!(
            "No input files specified. Use positional arguments or configure in sqlprobe.toml"
        );
    }

    let analyzer = Analyzer::with_limits(config.limits());
    let formatter = OutputFormatter::new(config.format.unwrap_or_default(), args.stdout);
    let show_diagnostics = args.verbose > 0 && !args.quiet;

    analyze_inputs(&inputs, &analyzer, &formatter, show_diagnostics, args.quiet)
}

/// Fail on the first path that does not exist
fn check_inputs_exist(inputs: &[PathBuf]) -> std::result::Result<(), AnalyzeError> {
    match inputs.iter().find(|path| !path.exists()) {
        Some(missing) => Err(AnalyzeError::InputNotFound {
            path: missing.clone(),
        }),
        None => Ok(()),
    }
}

/// Analyze every input and emit its report; nothing is written unless all inputs exist
fn analyze_inputs(
    inputs: &[PathBuf],
    analyzer: &Analyzer,
    formatter: &OutputFormatter,
    show_diagnostics: bool,
    quiet: bool,
) -> Result<()> {
    check_inputs_exist(inputs)?;

    for input in inputs {
        let report = analyzer.analyze_file(input)?;
        tracing::info!(
            file = %input.display(),
            object_type = %report.object_type(),
            statements = report.queries().len(),
            "analyzed"
        );

        if show_diagnostics && !report.diagnostics().is_empty() {
            let source = std::fs::read_to_string(input).into_diagnostic()?;
            formatter.print_diagnostics(report.source_file(), &source, report.diagnostics());
        }
        formatter.emit(input, &report, quiet)?;
    }

    Ok(())
}

/// Expand glob patterns; plain paths are kept as given so missing files surface later
fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();

    for pattern in patterns {
        if pattern.contains(['*', '?', '[']) {
            let before = inputs.len();
            for path in glob::glob(pattern).into_diagnostic()?.flatten() {
                inputs.push(path);
            }
            if inputs.len() == before {
                tracing::warn!(pattern = pattern.as_str(), "glob pattern matched no files");
            }
        } else {
            inputs.push(PathBuf::from(pattern));
        }
    }

    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::OutputFormat;
    use pretty_assertions::assert_eq;

    fn write_script(dir: &std::path::Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, "CREATE VIEW v AS SELECT id FROM t;").unwrap();
        path
    }

    #[test]
    fn test_expand_inputs_globs_and_plain_paths() {
        let dir = tempfile::tempdir().unwrap();
        let b = write_script(dir.path(), "b.sql");
        let a = write_script(dir.path(), "a.sql");
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let patterns = vec![
            format!("{}/*.sql", dir.path().display()),
            "missing.sql".to_string(),
        ];
        let inputs = expand_inputs(&patterns).unwrap();

        assert_eq!(inputs, vec![a, b, PathBuf::from("missing.sql")]);
    }

    #[test]
    fn test_expand_inputs_unmatched_glob_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let patterns = vec![format!("{}/*.sql", dir.path().display())];
        assert!(expand_inputs(&patterns).unwrap().is_empty());
    }

    #[test]
    fn test_check_inputs_exist_names_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let present = write_script(dir.path(), "present.sql");
        let missing = dir.path().join("missing.sql");

        assert!(check_inputs_exist(std::slice::from_ref(&present)).is_ok());
        match check_inputs_exist(&[present, missing.clone()]) {
            Err(AnalyzeError::InputNotFound { path }) => assert_eq!(path, missing),
            other => panic!("expected InputNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_input_prevents_all_output() {
        let dir = tempfile::tempdir().unwrap();
        let present = write_script(dir.path(), "present.sql");
        let missing = dir.path().join("missing.sql");
        let formatter = OutputFormatter::new(OutputFormat::Json, false);

        let result = analyze_inputs(
            &[present, missing],
            &Analyzer::new(),
            &formatter,
            false,
            true,
        );

        assert!(result.is_err());
        assert!(!dir.path().join("present.json").exists());
    }

    #[test]
    fn test_existing_inputs_write_sibling_reports() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_script(dir.path(), "first.sql");
        let second = write_script(dir.path(), "second.sql");
        let formatter = OutputFormatter::new(OutputFormat::Json, false);

        analyze_inputs(&[first, second], &Analyzer::new(), &formatter, false, true).unwrap();

        let json = std::fs::read_to_string(dir.path().join("first.json")).unwrap();
        assert!(json.contains("\"object_type\": \"VIEW\""));
        assert!(dir.path().join("second.json").exists());
    }
}
