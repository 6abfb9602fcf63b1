//! Diagnostics emitted while ingesting benchmark logs.
//!
//! Skipped records and files are reported through a [`DiagnosticSink`]
//! passed into the pipeline, so callers decide whether to log, collect,
//! or drop them.

use std::fmt;
use tracing::warn;

/// What kind of input problem a diagnostic describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A single record was skipped.
    MalformedRecord,
    /// A whole file was skipped because its identity could not be derived.
    MalformedIdentity,
    /// A whole file was skipped because it could not be read.
    Unreadable,
    /// A header-only file whose identity lives in the (absent) records.
    EmptyIdentity,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::MalformedRecord => write!(f, "malformed record"),
            DiagnosticKind::MalformedIdentity => write!(f, "malformed identity"),
            DiagnosticKind::Unreadable => write!(f, "unreadable"),
            DiagnosticKind::EmptyIdentity => write!(f, "empty identity"),
        }
    }
}

/// A single recoverable input problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Source file the problem was found in.
    pub source: String,
    /// 1-based line number, when the problem is tied to one record.
    pub line: Option<usize>,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn record(source: &str, line: usize, message: impl fmt::Display) -> Self {
        Self {
            source: source.to_string(),
            line: Some(line),
            kind: DiagnosticKind::MalformedRecord,
            message: message.to_string(),
        }
    }

    pub fn file(source: &str, kind: DiagnosticKind, message: impl fmt::Display) -> Self {
        Self {
            source: source.to_string(),
            line: None,
            kind,
            message: message.to_string(),
        }
    }

    /// Whether this diagnostic caused a whole file to be dropped.
    pub fn skips_file(&self) -> bool {
        self.line.is_none()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: {}", self.source, line, self.message),
            None => write!(f, "{}: {}", self.source, self.message),
        }
    }
}

/// Receiver for diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<F: FnMut(Diagnostic)> DiagnosticSink for F {
    fn report(&mut self, diagnostic: Diagnostic) {
        self(diagnostic)
    }
}

/// Drops every diagnostic.
#[allow(dead_code)] // Library-style sink for callers that want silence
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

/// Logs each diagnostic as a warning and keeps a tally.
#[derive(Debug, Default)]
pub struct TracingSink {
    pub records_skipped: usize,
    pub files_skipped: usize,
}

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        if diagnostic.skips_file() {
            self.files_skipped += 1;
        } else {
            self.records_skipped += 1;
        }
        warn!("Skipping {} in {}", diagnostic.kind, diagnostic);
    }
}
