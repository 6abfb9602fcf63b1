//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.benchagg.toml` files.

use crate::cli::OutputFormat;
use crate::ingest::IdentityStrategy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = ".benchagg.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Input settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Where benchmark logs live and how to read them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory of timing logs.
    #[serde(default = "default_timing_dir")]
    pub timing_dir: PathBuf,

    /// Directory of memory logs.
    #[serde(default = "default_memory_dir")]
    pub memory_dir: PathBuf,

    /// Log file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Where cohort identity is read from.
    #[serde(default)]
    pub schema: IdentityStrategy,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            timing_dir: default_timing_dir(),
            memory_dir: default_memory_dir(),
            extension: default_extension(),
            schema: IdentityStrategy::default(),
        }
    }
}

fn default_timing_dir() -> PathBuf {
    PathBuf::from("results/sort/cpu")
}

fn default_memory_dir() -> PathBuf {
    PathBuf::from("results/sort/memory")
}

fn default_extension() -> String {
    "csv".to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output file path.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Include the per-algorithm comparison table.
    #[serde(default = "default_true")]
    pub include_comparison: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            format: OutputFormat::default(),
            include_comparison: true,
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("aggregate_report.md")
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence, but only when given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref dir) = args.timing_dir {
            self.input.timing_dir = dir.clone();
        }
        if let Some(ref dir) = args.memory_dir {
            self.input.memory_dir = dir.clone();
        }
        if let Some(ref ext) = args.extension {
            self.input.extension = ext.clone();
        }
        if let Some(schema) = args.schema {
            self.input.schema = schema;
        }

        if let Some(ref output) = args.output {
            self.report.output = output.clone();
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }
        if args.no_comparison {
            self.report.include_comparison = false;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> Result<String> {
        let config = Config::default();
        toml::to_string_pretty(&config).context("Failed to serialize default config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.timing_dir, PathBuf::from("results/sort/cpu"));
        assert_eq!(config.input.memory_dir, PathBuf::from("results/sort/memory"));
        assert_eq!(config.input.extension, "csv");
        assert_eq!(config.input.schema, IdentityStrategy::FileName);
        assert!(config.report.include_comparison);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
verbose = true

[input]
timing_dir = "logs/cpu"
schema = "in-record"

[report]
output = "stats.json"
format = "json"
include_comparison = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert!(config.general.verbose);
        assert_eq!(config.input.timing_dir, PathBuf::from("logs/cpu"));
        assert_eq!(config.input.memory_dir, PathBuf::from("results/sort/memory"));
        assert_eq!(config.input.schema, IdentityStrategy::InRecord);
        assert_eq!(config.report.output, PathBuf::from("stats.json"));
        assert_eq!(config.report.format, OutputFormat::Json);
        assert!(!config.report.include_comparison);
    }

    #[test]
    fn test_merge_only_explicit_args() {
        let mut config: Config = toml::from_str("[input]\nschema = \"in-record\"\n").unwrap();
        let args = Args::try_parse_from(["benchagg", "--memory-dir", "m", "--no-comparison"])
            .unwrap();
        config.merge_with_args(&args);

        assert_eq!(config.input.schema, IdentityStrategy::InRecord);
        assert_eq!(config.input.memory_dir, PathBuf::from("m"));
        assert!(!config.report.include_comparison);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml().unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[input]"));
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("schema = \"filename\""));
        assert!(toml_str.contains("verbose = false"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert!(!parsed.general.verbose);
        assert_eq!(parsed.input.schema, IdentityStrategy::FileName);
    }

    #[test]
    fn test_verbose_from_config_file() {
        let mut config: Config = toml::from_str("[general]\nverbose = true\n").unwrap();
        let args = Args::try_parse_from(["benchagg"]).unwrap();
        config.merge_with_args(&args);
        assert!(config.general.verbose);
        assert_eq!(args.log_level(config.general.verbose), tracing::Level::DEBUG);

        let quiet = Args::try_parse_from(["benchagg", "--quiet"]).unwrap();
        config.merge_with_args(&quiet);
        assert_eq!(quiet.log_level(config.general.verbose), tracing::Level::ERROR);
    }
}
