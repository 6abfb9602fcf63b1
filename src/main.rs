//! BenchAgg - sorting benchmark log aggregator
//!
//! A CLI tool that reads CPU-cycle timing logs and memory allocation logs,
//! groups them into experiment cohorts, and writes per-cohort statistics.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad config, unwritable output, etc.)
//!   2 - Input was skipped and --deny-skipped was set

mod analysis;
mod cli;
mod config;
mod diagnostics;
mod error;
mod ingest;
mod models;
mod report;
mod scanner;

use analysis::IngestOptions;
use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use diagnostics::TracingSink;
use indicatif::{ProgressBar, ProgressStyle};
use ingest::SourceFile;
use models::{Report, ReportMetadata};
use scanner::LogScanner;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration first: `[general] verbose` decides the log level
    let (mut config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(args.log_level(config.general.verbose));

    info!("BenchAgg v{}", env!("CARGO_PKG_VERSION"));
    source.log();
    debug!("Arguments: {:?}", args);

    match run(args, config) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Aggregation failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .benchagg.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml()?;
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize input directories, schema, and report output.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete aggregation workflow. Returns exit code (0 or 2).
fn run(args: Args, config: Config) -> Result<i32> {
    let start_time = Instant::now();

    let input = &config.input;
    let timing_files = LogScanner::new(&input.timing_dir, &input.extension).scan()?;
    let memory_files = LogScanner::new(&input.memory_dir, &input.extension).scan()?;

    if args.dry_run {
        return handle_dry_run(&timing_files, &memory_files);
    }

    let options = IngestOptions {
        strategy: input.schema,
        extension: input.extension.clone(),
    };

    // Step 1: Timing logs
    println!(
        "⏱️  Reading {} timing logs from {}",
        timing_files.len(),
        input.timing_dir.display()
    );
    let mut timing_sink = TracingSink::default();
    let (timing_sources, unreadable) = read_sources(&timing_files, &mut timing_sink, args.quiet);
    let mut timing = analysis::aggregate_timing(&timing_sources, &options, &mut timing_sink);
    timing.stats.files_skipped += unreadable;
    drop(timing_sources);

    // Step 2: Memory logs
    println!(
        "🧠 Reading {} memory logs from {}",
        memory_files.len(),
        input.memory_dir.display()
    );
    let mut memory_sink = TracingSink::default();
    let (memory_sources, unreadable) = read_sources(&memory_files, &mut memory_sink, args.quiet);
    let mut memory = analysis::aggregate_memory(&memory_sources, &options, &mut memory_sink);
    memory.stats.files_skipped += unreadable;
    drop(memory_sources);

    // Step 3: Build the report
    let comparison = if config.report.include_comparison {
        analysis::compare_algorithms(&timing.rows)
    } else {
        Vec::new()
    };

    let metadata = ReportMetadata {
        generated_at: Utc::now(),
        timing_dir: input.timing_dir.display().to_string(),
        memory_dir: input.memory_dir.display().to_string(),
        schema: input.schema.to_string(),
        timing: timing.stats,
        memory: memory.stats,
        duration_seconds: start_time.elapsed().as_secs_f64(),
    };

    let report = Report {
        metadata,
        timing: timing.rows,
        memory: memory.rows,
        comparison,
    };

    let output = match config.report.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    let output_path = &config.report.output;
    std::fs::write(output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    // Print summary
    println!("\n📊 Aggregation Summary:");
    println!(
        "   Timing cohorts: {} ({} records from {} files)",
        report.timing.len(),
        report.metadata.timing.records_accepted,
        report.metadata.timing.files_read
    );
    println!(
        "   Memory cohorts: {} ({} records from {} files)",
        report.memory.len(),
        report.metadata.memory.records_accepted,
        report.metadata.memory.files_read
    );

    let records_skipped = timing_sink.records_skipped + memory_sink.records_skipped;
    let files_skipped = timing_sink.files_skipped + memory_sink.files_skipped;
    if records_skipped + files_skipped > 0 {
        println!(
            "   ⚠️  Skipped {} files and {} records (see warnings above)",
            files_skipped, records_skipped
        );
    }
    println!(
        "\n✅ Aggregation complete! Report saved to: {}",
        output_path.display()
    );

    let skipped_any = report.metadata.timing.skipped_any() || report.metadata.memory.skipped_any();
    if args.deny_skipped && skipped_any {
        eprintln!("\n⛔ Some input was skipped. Failing (exit code 2).");
        return Ok(2);
    }

    Ok(0)
}

/// Read every log, with a progress bar unless running quietly.
///
/// Returns the loaded sources and the number of unreadable files.
fn read_sources(
    paths: &[PathBuf],
    sink: &mut TracingSink,
    quiet: bool,
) -> (Vec<SourceFile>, usize) {
    let progress = if quiet || paths.is_empty() {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(paths.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("   {bar:30.cyan/blue} {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("█▓░"));
        }
        bar
    };

    let loaded = ingest::load_sources(paths, sink, &progress);
    progress.finish_and_clear();
    loaded
}

/// Handle --dry-run: list the logs that would be read, exit.
fn handle_dry_run(timing_files: &[PathBuf], memory_files: &[PathBuf]) -> Result<i32> {
    println!("\n🔍 Dry run: listing logs (nothing is aggregated)...\n");

    for (kind, files) in [("timing", timing_files), ("memory", memory_files)] {
        if files.is_empty() {
            println!("   No {} logs found.", kind);
            continue;
        }
        println!("   Found {} {} logs:\n", files.len(), kind);
        for file in files {
            println!("     📄 {}", file.display());
        }
        println!();
    }

    println!("✅ Dry run complete.");
    Ok(0)
}

/// Where the configuration came from. Reported once logging is up.
enum ConfigSource {
    Explicit(PathBuf),
    DefaultFile,
    BuiltIn,
    Fallback(anyhow::Error),
}

impl ConfigSource {
    fn log(&self) {
        match self {
            ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigSource::DefaultFile => info!("Loaded default config from {}", CONFIG_FILE),
            ConfigSource::BuiltIn => debug!("No config file found, using defaults"),
            ConfigSource::Fallback(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigSource::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigSource::BuiltIn)),
        Err(e) => Ok((Config::default(), ConfigSource::Fallback(e))),
    }
}
