//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "sqlprobe")]
#[command(author, version, about = "Extract metadata from SQL procedure, function and view scripts")]
pub struct Args {
    /// SQL files to analyze (supports glob patterns)
    pub files: Vec<PathBuf>,

    /// Configuration file (defaults to sqlprobe.toml in this or a parent directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Print JSON reports to stdout instead of writing sibling .json files
    #[arg(long)]
    pub stdout: bool,

    /// Longest statement text kept before truncation
    #[arg(long, value_name = "CHARS", env = "SQLPROBE_MAX_STATEMENT_CHARS")]
    pub max_statement_chars: Option<usize>,

    /// Longest body excerpt kept before truncation
    #[arg(long, value_name = "CHARS", env = "SQLPROBE_MAX_EXCERPT_CHARS")]
    pub max_excerpt_chars: Option<usize>,

    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON report written next to each input
    #[default]
    Json,
    /// Human-readable summary on stdout
    Human,
}
