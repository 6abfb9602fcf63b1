//! Data models for the benchmark aggregator.
//!
//! This module contains the parsed measurement types, the cohort key,
//! and the aggregate rows handed to the report generator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single timing repetition from a CPU benchmark log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingMeasurement {
    /// Repetition index within the run.
    #[allow(dead_code)] // Carried through from the log, not summarised
    pub run_number: i64,
    /// Elapsed CPU cycles.
    pub cycles: i64,
    /// Clock frequency the cycles were measured at.
    #[allow(dead_code)]
    pub clock_hz: i64,
    /// Sorting algorithm label.
    pub algorithm: String,
    /// Input file label.
    pub file_label: String,
    /// Input file size in bytes.
    pub file_size_bytes: i64,
}

/// Kind of a memory event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Alloc,
    Free,
    /// Anything other than `ALLOC` or `FREE`; kept so it still counts as a balance sample.
    Other(String),
}

impl From<&str> for EventKind {
    fn from(s: &str) -> Self {
        match s {
            "ALLOC" => EventKind::Alloc,
            "FREE" => EventKind::Free,
            other => EventKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Alloc => write!(f, "ALLOC"),
            EventKind::Free => write!(f, "FREE"),
            EventKind::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A single allocation or deallocation observed during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryEvent {
    #[allow(dead_code)] // Carried through from the log, not summarised
    pub alignment: String,
    pub kind: EventKind,
    pub size_bytes: i64,
    pub algorithm: String,
    pub file_label: String,
    pub file_size_bytes: i64,
}

/// Identity of one experiment cohort.
///
/// `run_label` is only present when the run identifier was encoded in the
/// source filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub algorithm: String,
    pub run_label: Option<String>,
    pub file_label: String,
    pub file_size_bytes: i64,
}

impl GroupKey {
    pub fn new(
        algorithm: impl Into<String>,
        run_label: Option<String>,
        file_label: impl Into<String>,
        file_size_bytes: i64,
    ) -> Self {
        Self {
            algorithm: algorithm.into(),
            run_label,
            file_label: file_label.into(),
            file_size_bytes,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.run_label {
            Some(run) => write!(
                f,
                "{}/{}/{} ({} bytes)",
                self.algorithm, run, self.file_label, self.file_size_bytes
            ),
            None => write!(
                f,
                "{}/{} ({} bytes)",
                self.algorithm, self.file_label, self.file_size_bytes
            ),
        }
    }
}

/// Summary statistics for one timing cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingAggregate {
    pub algorithm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_label: Option<String>,
    pub file_label: String,
    pub file_size_bytes: i64,
    pub count: usize,
    pub mean: f64,
    pub stddev: f64,
    pub min: i64,
    pub max: i64,
}

impl TimingAggregate {
    /// Statistic column labels, following the identity columns.
    pub const STAT_COLUMNS: [&'static str; 5] = [
        "Average Cycles",
        "Std Dev",
        "Min Cycles",
        "Max Cycles",
        "Sample Count",
    ];
}

/// Summary statistics for one memory cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryAggregate {
    pub algorithm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_label: Option<String>,
    pub file_label: String,
    pub file_size_bytes: i64,
    pub total_allocated: i64,
    pub total_freed: i64,
    pub average_outstanding: f64,
    pub allocation_count: usize,
    pub free_count: usize,
}

impl MemoryAggregate {
    /// Statistic column labels, following the identity columns.
    pub const STAT_COLUMNS: [&'static str; 5] = [
        "Total Allocated (bytes)",
        "Total Freed (bytes)",
        "Average Memory Usage (bytes)",
        "Allocation Count",
        "Free Count",
    ];

    /// A zero-valued aggregate for a cohort with no events.
    pub fn empty(key: &GroupKey) -> Self {
        Self {
            algorithm: key.algorithm.clone(),
            run_label: key.run_label.clone(),
            file_label: key.file_label.clone(),
            file_size_bytes: key.file_size_bytes,
            total_allocated: 0,
            total_freed: 0,
            average_outstanding: 0.0,
            allocation_count: 0,
            free_count: 0,
        }
    }
}

/// Leading identity columns shared by both result tables.
pub fn identity_columns(with_run: bool) -> Vec<&'static str> {
    let mut columns = vec!["Algorithm"];
    if with_run {
        columns.push("Run Name");
    }
    columns.extend(["File", "File Size (bytes)"]);
    columns
}

/// Common view over aggregate rows, used by sorting and rendering.
pub trait AggregateRow {
    fn algorithm(&self) -> &str;
    fn run_label(&self) -> Option<&str>;
    fn file_label(&self) -> &str;
    fn file_size_bytes(&self) -> i64;
}

impl AggregateRow for TimingAggregate {
    fn algorithm(&self) -> &str {
        &self.algorithm
    }
    fn run_label(&self) -> Option<&str> {
        self.run_label.as_deref()
    }
    fn file_label(&self) -> &str {
        &self.file_label
    }
    fn file_size_bytes(&self) -> i64 {
        self.file_size_bytes
    }
}

impl AggregateRow for MemoryAggregate {
    fn algorithm(&self) -> &str {
        &self.algorithm
    }
    fn run_label(&self) -> Option<&str> {
        self.run_label.as_deref()
    }
    fn file_label(&self) -> &str {
        &self.file_label
    }
    fn file_size_bytes(&self) -> i64 {
        self.file_size_bytes
    }
}

/// Per-algorithm mean of cohort average cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmComparison {
    pub algorithm: String,
    pub cohorts: usize,
    pub mean_of_averages: f64,
}

/// Counters describing what the ingest pass accepted and skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    pub files_read: usize,
    pub files_skipped: usize,
    pub records_accepted: usize,
    pub records_skipped: usize,
}

impl IngestStats {
    /// Whether any input was dropped.
    pub fn skipped_any(&self) -> bool {
        self.files_skipped > 0 || self.records_skipped > 0
    }
}

/// Metadata about the aggregate report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Directory the timing logs were read from.
    pub timing_dir: String,
    /// Directory the memory logs were read from.
    pub memory_dir: String,
    /// Identity schema used to read the logs.
    pub schema: String,
    /// Timing ingest counters.
    pub timing: IngestStats,
    /// Memory ingest counters.
    pub memory: IngestStats,
    /// Wall-clock duration of the run in seconds.
    pub duration_seconds: f64,
}

/// The complete aggregate report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub timing: Vec<TimingAggregate>,
    pub memory: Vec<MemoryAggregate>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub comparison: Vec<AlgorithmComparison>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_from_str() {
        assert_eq!(EventKind::from("ALLOC"), EventKind::Alloc);
        assert_eq!(EventKind::from("FREE"), EventKind::Free);
        assert_eq!(
            EventKind::from("alloc"),
            EventKind::Other("alloc".to_string())
        );
    }

    #[test]
    fn test_identity_columns() {
        assert_eq!(
            identity_columns(true),
            vec!["Algorithm", "Run Name", "File", "File Size (bytes)"]
        );
        assert_eq!(
            identity_columns(false),
            vec!["Algorithm", "File", "File Size (bytes)"]
        );
    }

    #[test]
    fn test_group_key_display() {
        let key = GroupKey::new("quicksort", Some("i9".to_string()), "01_100.bin", 100);
        assert_eq!(key.to_string(), "quicksort/i9/01_100.bin (100 bytes)");

        let key = GroupKey::new("heapsort", None, "a.bin", 5);
        assert_eq!(key.to_string(), "heapsort/a.bin (5 bytes)");
    }

    #[test]
    fn test_empty_memory_aggregate() {
        let key = GroupKey::new("mergesort", Some("m1".to_string()), "02_1K.bin", 1000);
        let agg = MemoryAggregate::empty(&key);
        assert_eq!(agg.total_allocated, 0);
        assert_eq!(agg.allocation_count, 0);
        assert_eq!(agg.free_count, 0);
        assert_eq!(agg.average_outstanding, 0.0);
        assert_eq!(agg.file_size_bytes, 1000);
    }

    #[test]
    fn test_ingest_stats_skipped_any() {
        let mut stats = IngestStats::default();
        assert!(!stats.skipped_any());
        stats.records_skipped = 1;
        assert!(stats.skipped_any());
    }
}
