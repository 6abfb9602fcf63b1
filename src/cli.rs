//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::ingest::IdentityStrategy;
use clap::Parser;
use std::path::PathBuf;

/// BenchAgg - sorting benchmark log aggregator
///
/// Reads CPU-cycle timing logs and memory allocation logs, groups them into
/// experiment cohorts, and writes per-cohort summary statistics.
///
/// Examples:
///   benchagg
///   benchagg --timing-dir results/sort/cpu --memory-dir results/sort/memory
///   benchagg --schema in-record --format json -o stats.json
///   benchagg --dry-run
///   benchagg --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory containing timing (CPU cycle) logs
    #[arg(long, value_name = "DIR", env = "BENCHAGG_TIMING_DIR")]
    pub timing_dir: Option<PathBuf>,

    /// Directory containing memory allocation logs
    #[arg(long, value_name = "DIR", env = "BENCHAGG_MEMORY_DIR")]
    pub memory_dir: Option<PathBuf>,

    /// Where cohort identity is read from
    ///
    /// filename: <algorithm>_<run>_<file label>.csv
    /// in-record: algorithm, file label and file size columns
    #[arg(long, value_name = "SCHEMA")]
    pub schema: Option<IdentityStrategy>,

    /// Extension of log files to read
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .benchagg.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Leave the per-algorithm comparison table out of the report
    #[arg(long)]
    pub no_comparison: bool,

    /// Exit with code 2 if any record or file was skipped
    ///
    /// Useful for CI pipelines that must not silently drop measurements.
    #[arg(long)]
    pub deny_skipped: bool,

    /// Dry run: list the logs that would be read and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .benchagg.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    clap::ValueEnum,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref ext) = self.extension {
            if ext.is_empty() || ext.starts_with('.') {
                return Err("Extension must be non-empty and given without a leading dot".to_string());
            }
        }

        if let (Some(timing), Some(memory)) = (&self.timing_dir, &self.memory_dir) {
            if timing == memory {
                return Err(format!(
                    "Timing and memory logs must live in different directories: {}",
                    timing.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is the `[general] verbose` setting; `--quiet` wins over both.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
