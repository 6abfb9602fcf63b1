//! CSV source loading.

use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One benchmark log, fully buffered. Row 0 is the header.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Display name used in diagnostics (usually the path).
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Read a comma-delimited file. Records may have differing field counts.
    ///
    /// Fields are decoded lossily, so a stray non-UTF-8 byte only affects the
    /// record it sits in.
    pub fn read(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::None)
            .from_path(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;

        let mut rows = Vec::new();
        for record in reader.byte_records() {
            let record =
                record.with_context(|| format!("Failed to read CSV from {}", path.display()))?;
            rows.push(
                record
                    .iter()
                    .map(|field| String::from_utf8_lossy(field).into_owned())
                    .collect(),
            );
        }

        Ok(Self::new(path.display().to_string(), rows))
    }

    /// True when the file has no data rows after the header.
    pub fn is_header_only(&self) -> bool {
        self.rows.len() <= 1
    }

    /// Data rows paired with their 1-based line number.
    pub fn records(&self) -> impl Iterator<Item = (usize, &[String])> + '_ {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, row)| (i + 1, row.as_slice()))
    }
}

/// Read every path, reporting unreadable files to `sink`.
///
/// Returns the loaded sources and the number of files skipped.
pub fn load_sources(
    paths: &[PathBuf],
    sink: &mut dyn DiagnosticSink,
    progress: &ProgressBar,
) -> (Vec<SourceFile>, usize) {
    let mut sources = Vec::with_capacity(paths.len());
    let mut skipped = 0;

    for path in paths {
        progress.set_message(
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        match SourceFile::read(path) {
            Ok(source) => {
                debug!("Read {} rows from {}", source.rows.len(), source.name);
                sources.push(source);
            }
            Err(e) => {
                skipped += 1;
                sink.report(Diagnostic::file(
                    &path.display().to_string(),
                    DiagnosticKind::Unreadable,
                    format!("{:#}", e),
                ));
            }
        }
        progress.inc(1);
    }

    (sources, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_flexible_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("quicksort_i9_01_100.bin.csv");
        std::fs::write(&path, "a,b,c,d,e,f\n1,2,3,q,f,100\n1,2\n").unwrap();

        let source = SourceFile::read(&path).unwrap();
        assert_eq!(source.rows.len(), 3);
        assert!(!source.is_header_only());

        let records: Vec<_> = source.records().collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, 2);
        assert_eq!(records[1].0, 3);
        assert_eq!(records[1].1.len(), 2);
    }

    #[test]
    fn test_read_keeps_rows_around_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("quicksort_i9_01_100.bin.csv");
        let mut content = b"alignment,type,size,algorithm,file,file_size_bytes\n".to_vec();
        content.extend_from_slice(b"16,ALLOC,100,q,f,100\n");
        content.extend_from_slice(b"\xff\xfe,ALLOC,abc\xff,q,f,100\n");
        content.extend_from_slice(b"16,FREE,20,q,f,100\n");
        std::fs::write(&path, content).unwrap();

        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let (sources, skipped) =
            load_sources(&[path], &mut diagnostics, &ProgressBar::hidden());
        assert_eq!(skipped, 0);
        assert!(diagnostics.is_empty());

        let source = &sources[0];
        assert_eq!(source.rows.len(), 4);
        assert_eq!(source.rows[2][0], "\u{FFFD}\u{FFFD}");
        assert_eq!(source.rows[3][1], "FREE");

        // The damaged row reaches the record parser and is skipped there.
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let result = crate::analysis::aggregate_memory(
            &sources,
            &crate::analysis::IngestOptions::default(),
            &mut diagnostics,
        );
        assert_eq!(result.stats.files_skipped, 0);
        assert_eq!(result.stats.records_accepted, 2);
        assert_eq!(result.stats.records_skipped, 1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, Some(3));
        assert_eq!(diagnostics[0].kind, DiagnosticKind::MalformedRecord);
        assert_eq!(result.rows[0].total_allocated, 100);
        assert_eq!(result.rows[0].total_freed, 20);
    }

    #[test]
    fn test_header_only() {
        let source = SourceFile::new("x.csv", vec![vec!["h".to_string()]]);
        assert!(source.is_header_only());
        assert_eq!(source.records().count(), 0);
        assert!(SourceFile::new("y.csv", Vec::new()).is_header_only());
    }

    #[test]
    fn test_load_sources_skips_missing() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("good.csv");
        std::fs::write(&good, "h\n1\n").unwrap();
        let missing = temp_dir.path().join("missing.csv");

        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let (sources, skipped) =
            load_sources(&[missing, good], &mut diagnostics, &ProgressBar::hidden());

        assert_eq!(sources.len(), 1);
        assert_eq!(skipped, 1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::Unreadable);
    }
}
