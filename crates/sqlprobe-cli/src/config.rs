//! Configuration file handling

use miette::{IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};
use sqlprobe_core::ReportLimits;
use std::path::{Path, PathBuf};

use crate::args::OutputFormat;

/// Configuration for sqlprobe
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Script file paths or patterns to analyze
    #[serde(default)]
    pub files: Vec<String>,

    /// Output format (json, human)
    #[serde(default)]
    pub format: Option<OutputFormat>,

    /// Statement truncation cap in characters
    #[serde(default)]
    pub max_statement_chars: Option<usize>,

    /// Body excerpt truncation cap in characters
    #[serde(default)]
    pub max_excerpt_chars: Option<usize>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).into_diagnostic()?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).into_diagnostic()
    }

    /// Try to find and load sqlprobe.toml in current directory or parent directories
    pub fn find_and_load() -> Result<Option<Self>> {
        let mut current_dir = std::env::current_dir().into_diagnostic()?;

        loop {
            let config_path = current_dir.join("sqlprobe.toml");
            if config_path.exists() {
                return Ok(Some(Self::from_file(&config_path)?));
            }

            // Try parent directory
            if !current_dir.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Merge CLI arguments into configuration
    /// CLI arguments take precedence over config file values
    pub fn merge_with_args(
        mut self,
        files: &[PathBuf],
        format: Option<OutputFormat>,
        max_statement_chars: Option<usize>,
        max_excerpt_chars: Option<usize>,
    ) -> Self {
        if !files.is_empty() {
            self.files = files.iter().map(|p| p.display().to_string()).collect();
        }

        if format.is_some() {
            self.format = format;
        }

        if max_statement_chars.is_some() {
            self.max_statement_chars = max_statement_chars;
        }

        if max_excerpt_chars.is_some() {
            self.max_excerpt_chars = max_excerpt_chars;
        }

        self
    }

    /// Truncation limits, falling back to the library defaults
    pub fn limits(&self) -> ReportLimits {
        let defaults = ReportLimits::default();
        ReportLimits {
            max_statement_chars: self
                .max_statement_chars
                .unwrap_or(defaults.max_statement_chars),
            max_excerpt_chars: self.max_excerpt_chars.unwrap_or(defaults.max_excerpt_chars),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_config_file() {
        let config = Config::from_toml(
            r#"
            files = ["procs/*.sql"]
            format = "human"
            max_statement_chars = 800
            "#,
        )
        .unwrap();

        assert_eq!(config.files, vec!["procs/*.sql"]);
        assert_eq!(config.format, Some(OutputFormat::Human));
        assert_eq!(
            config.limits(),
            ReportLimits {
                max_statement_chars: 800,
                max_excerpt_chars: 2000,
            }
        );
    }

    #[test]
    fn test_args_take_precedence() {
        let config = Config::from_toml("files = [\"a.sql\"]\nmax_excerpt_chars = 10")
            .unwrap()
            .merge_with_args(
                &[PathBuf::from("b.sql")],
                Some(OutputFormat::Json),
                Some(99),
                None,
            );

        assert_eq!(config.files, vec!["b.sql"]);
        assert_eq!(config.format, Some(OutputFormat::Json));
        assert_eq!(config.limits().max_statement_chars, 99);
        assert_eq!(config.limits().max_excerpt_chars, 10);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert!(config.files.is_empty());
        assert_eq!(config.limits(), ReportLimits::default());
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Config::from_toml("format = \"sarif\"").is_err());
    }
}
