//! Aggregation pipeline.
//!
//! For each benchmark kind: parse records, derive cohort identity, group,
//! reduce each cohort, then sort. Timing and memory share no state.

pub mod grouper;
pub mod memory;
pub mod sorter;
pub mod timing;

use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::ingest::identity::{FileIdentity, IdentityStrategy};
use crate::ingest::{record, SourceFile};
use crate::models::{GroupKey, IngestStats, MemoryAggregate, TimingAggregate};
use grouper::Cohorts;
use tracing::debug;

pub use timing::compare_algorithms;

/// How source files are interpreted.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub strategy: IdentityStrategy,
    /// Extension stripped from filenames before identity decoding.
    pub extension: String,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            strategy: IdentityStrategy::default(),
            extension: "csv".to_string(),
        }
    }
}

/// Ordered aggregate rows plus what was accepted and skipped on the way.
#[derive(Debug, Clone)]
pub struct Aggregation<T> {
    pub rows: Vec<T>,
    pub stats: IngestStats,
}

/// Aggregate timing logs into sorted per-cohort statistics.
pub fn aggregate_timing(
    sources: &[SourceFile],
    options: &IngestOptions,
    sink: &mut dyn DiagnosticSink,
) -> Aggregation<TimingAggregate> {
    let mut cohorts = Cohorts::new();
    let mut stats = IngestStats::default();

    for source in sources {
        let Some(identity) = resolve_identity(source, options, false, sink) else {
            stats.files_skipped += 1;
            continue;
        };
        stats.files_read += 1;

        for (line, fields) in source.records() {
            match record::parse_timing(fields, identity.as_ref()) {
                Ok(m) => {
                    let key = cohort_key(
                        identity.as_ref(),
                        &m.algorithm,
                        &m.file_label,
                        m.file_size_bytes,
                    );
                    cohorts.push(key, m);
                    stats.records_accepted += 1;
                }
                Err(e) => {
                    stats.records_skipped += 1;
                    sink.report(Diagnostic::record(&source.name, line, e));
                }
            }
        }
    }

    if cohorts.is_empty() {
        debug!("No timing cohorts built");
    } else {
        debug!("Built {} timing cohorts", cohorts.len());
    }

    let mut rows: Vec<TimingAggregate> = cohorts
        .into_iter()
        .filter_map(|(key, data)| timing::summarize(&key, &data))
        .collect();
    sorter::sort_rows(&mut rows);

    Aggregation { rows, stats }
}

/// Aggregate memory logs into sorted per-cohort statistics.
///
/// A header-only file still yields a zero-valued row for its filename identity.
pub fn aggregate_memory(
    sources: &[SourceFile],
    options: &IngestOptions,
    sink: &mut dyn DiagnosticSink,
) -> Aggregation<MemoryAggregate> {
    let mut cohorts = Cohorts::new();
    let mut stats = IngestStats::default();

    for source in sources {
        let Some(identity) = resolve_identity(source, options, true, sink) else {
            stats.files_skipped += 1;
            continue;
        };

        if source.is_header_only() {
            match &identity {
                Some(id) => {
                    let key = file_key(id);
                    debug!("{} has no data rows, recording empty cohort {}", source.name, key);
                    cohorts.touch(key);
                }
                None => {
                    stats.files_skipped += 1;
                    sink.report(Diagnostic::file(
                        &source.name,
                        DiagnosticKind::EmptyIdentity,
                        "no data rows to read the cohort identity from",
                    ));
                    continue;
                }
            }
        }
        stats.files_read += 1;

        for (line, fields) in source.records() {
            match record::parse_memory(fields, identity.as_ref()) {
                Ok(event) => {
                    let key = cohort_key(
                        identity.as_ref(),
                        &event.algorithm,
                        &event.file_label,
                        event.file_size_bytes,
                    );
                    cohorts.push(key, event);
                    stats.records_accepted += 1;
                }
                Err(e) => {
                    stats.records_skipped += 1;
                    sink.report(Diagnostic::record(&source.name, line, e));
                }
            }
        }
    }

    if cohorts.is_empty() {
        debug!("No memory cohorts built");
    } else {
        debug!("Built {} memory cohorts", cohorts.len());
    }

    let mut rows: Vec<MemoryAggregate> = cohorts
        .into_iter()
        .map(|(key, events)| memory::summarize(&key, &events))
        .collect();
    sorter::sort_rows(&mut rows);

    Aggregation { rows, stats }
}

/// Decode the filename identity when the strategy calls for it.
///
/// `Some(None)` means identity comes from the records; `None` means the file
/// was rejected and a diagnostic has been reported.
fn resolve_identity(
    source: &SourceFile,
    options: &IngestOptions,
    with_size: bool,
    sink: &mut dyn DiagnosticSink,
) -> Option<Option<FileIdentity>> {
    if options.strategy == IdentityStrategy::InRecord {
        return Some(None);
    }

    let decoded = FileIdentity::from_file_name(&source.name, &options.extension).and_then(|id| {
        if with_size {
            id.with_size_from_label()
        } else {
            Ok(id)
        }
    });

    match decoded {
        Ok(id) => Some(Some(id)),
        Err(e) => {
            sink.report(Diagnostic::file(
                &source.name,
                DiagnosticKind::MalformedIdentity,
                e,
            ));
            None
        }
    }
}

fn cohort_key(
    identity: Option<&FileIdentity>,
    algorithm: &str,
    file_label: &str,
    file_size_bytes: i64,
) -> GroupKey {
    GroupKey::new(
        algorithm,
        identity.map(|id| id.run_label.clone()),
        file_label,
        file_size_bytes,
    )
}

fn file_key(identity: &FileIdentity) -> GroupKey {
    GroupKey::new(
        identity.algorithm.as_str(),
        Some(identity.run_label.clone()),
        identity.file_label.as_str(),
        identity.file_size_bytes.unwrap_or_default(),
    )
}
