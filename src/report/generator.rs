//! Report generation.
//!
//! This module renders the aggregate rows as Markdown tables or JSON.

use crate::models::{
    identity_columns, AggregateRow, AlgorithmComparison, IngestStats, MemoryAggregate, Report,
    ReportMetadata, TimingAggregate,
};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# Benchmark Aggregate Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_timing_section(&report.timing));
    output.push_str(&generate_memory_section(&report.memory));
    output.push_str(&generate_comparison_section(&report.comparison));
    output.push_str(&generate_footer());

    output
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Timing Logs:** `{}`\n", metadata.timing_dir));
    section.push_str(&format!("- **Memory Logs:** `{}`\n", metadata.memory_dir));
    section.push_str(&format!("- **Identity Schema:** {}\n", metadata.schema));
    section.push_str(&format!(
        "- **Timing Input:** {}\n",
        describe_stats(&metadata.timing)
    ));
    section.push_str(&format!(
        "- **Memory Input:** {}\n",
        describe_stats(&metadata.memory)
    ));
    section.push_str(&format!(
        "- **Duration:** {:.2}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

fn describe_stats(stats: &IngestStats) -> String {
    let mut text = format!(
        "{} files, {} records",
        stats.files_read, stats.records_accepted
    );
    if stats.skipped_any() {
        text.push_str(&format!(
            " ({} files and {} records skipped)",
            stats.files_skipped, stats.records_skipped
        ));
    }
    text
}

/// Generate the timing statistics table.
fn generate_timing_section(rows: &[TimingAggregate]) -> String {
    let mut section = String::from("## Timing Statistics\n\n");

    if rows.is_empty() {
        section.push_str("No timing data.\n\n");
        return section;
    }

    let with_run = has_run_labels(rows);
    let table_rows = rows
        .iter()
        .map(|r| {
            let mut cells = identity_cells(r, with_run);
            cells.extend([
                format!("{:.2}", r.mean),
                format!("{:.2}", r.stddev),
                r.min.to_string(),
                r.max.to_string(),
                r.count.to_string(),
            ]);
            cells
        })
        .collect::<Vec<_>>();

    section.push_str(&render_table(
        &columns(with_run, &TimingAggregate::STAT_COLUMNS),
        &table_rows,
    ));
    section
}

/// Generate the memory statistics table.
fn generate_memory_section(rows: &[MemoryAggregate]) -> String {
    let mut section = String::from("## Memory Statistics\n\n");

    if rows.is_empty() {
        section.push_str("No memory data.\n\n");
        return section;
    }

    let with_run = has_run_labels(rows);
    let table_rows = rows
        .iter()
        .map(|r| {
            let mut cells = identity_cells(r, with_run);
            cells.extend([
                r.total_allocated.to_string(),
                r.total_freed.to_string(),
                format!("{:.2}", r.average_outstanding),
                r.allocation_count.to_string(),
                r.free_count.to_string(),
            ]);
            cells
        })
        .collect::<Vec<_>>();

    section.push_str(&render_table(
        &columns(with_run, &MemoryAggregate::STAT_COLUMNS),
        &table_rows,
    ));
    section
}

/// Generate the per-algorithm comparison table.
fn generate_comparison_section(comparison: &[AlgorithmComparison]) -> String {
    if comparison.is_empty() {
        return String::new();
    }

    let rows = comparison
        .iter()
        .map(|c| {
            vec![
                c.algorithm.clone(),
                c.cohorts.to_string(),
                format!("{:.2}", c.mean_of_averages),
            ]
        })
        .collect::<Vec<_>>();

    let mut section = String::from("## Algorithm Comparison\n\n");
    section.push_str(&render_table(
        &["Algorithm", "Cohorts", "Mean of Average Cycles"],
        &rows,
    ));
    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Average memory usage is the mean balance sampled once per event, not time-weighted.*\n"
        .to_string()
}

fn has_run_labels<T: AggregateRow>(rows: &[T]) -> bool {
    rows.iter().any(|r| r.run_label().is_some())
}

fn columns(with_run: bool, stats: &[&'static str]) -> Vec<&'static str> {
    let mut columns = identity_columns(with_run);
    columns.extend_from_slice(stats);
    columns
}

fn identity_cells<T: AggregateRow>(row: &T, with_run: bool) -> Vec<String> {
    let mut cells = vec![row.algorithm().to_string()];
    if with_run {
        cells.push(row.run_label().unwrap_or_default().to_string());
    }
    cells.push(row.file_label().to_string());
    cells.push(row.file_size_bytes().to_string());
    cells
}

fn render_table(columns: &[&str], rows: &[Vec<String>]) -> String {
    let mut table = String::new();

    table.push_str(&format!("| {} |\n", columns.join(" | ")));
    table.push_str(&format!(
        "|{}\n",
        columns.iter().map(|_| ":---|").collect::<String>()
    ));
    for row in rows {
        table.push_str(&format!("| {} |\n", row.join(" | ")));
    }
    table.push('\n');

    table
}
