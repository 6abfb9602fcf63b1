//! Record parsing.
//!
//! Turns one raw CSV record into a typed measurement. Numeric fields are
//! parsed strictly as base-10 integers; anything else rejects the record.

use super::identity::FileIdentity;
use crate::error::RecordError;
use crate::models::{EventKind, MemoryEvent, TimingMeasurement};

/// Both timing and memory records need at least this many fields.
pub const MIN_FIELDS: usize = 6;

const ALGORITHM_FIELD: usize = 3;
const FILE_LABEL_FIELD: usize = 4;
const FILE_SIZE_FIELD: usize = 5;

/// Parse a timing record: run number, cycles, clock Hz, algorithm, file label, file size.
///
/// With a filename identity, algorithm and file label come from `identity`
/// and the record's own columns 3 and 4 are ignored.
pub fn parse_timing(
    fields: &[String],
    identity: Option<&FileIdentity>,
) -> Result<TimingMeasurement, RecordError> {
    require_fields(fields)?;

    let run_number = parse_int("run number", &fields[0])?;
    let cycles = parse_int("cycles", &fields[1])?;
    let clock_hz = parse_int("CPU clock Hz", &fields[2])?;
    let (algorithm, file_label, file_size_bytes) = identity_fields(fields, identity)?;

    Ok(TimingMeasurement {
        run_number,
        cycles,
        clock_hz,
        algorithm,
        file_label,
        file_size_bytes,
    })
}

/// Parse a memory record: alignment, event kind, size, algorithm, file label, file size.
pub fn parse_memory(
    fields: &[String],
    identity: Option<&FileIdentity>,
) -> Result<MemoryEvent, RecordError> {
    require_fields(fields)?;

    let alignment = fields[0].clone();
    let kind = EventKind::from(fields[1].as_str());
    let size_bytes = parse_int("allocation size bytes", &fields[2])?;
    let (algorithm, file_label, file_size_bytes) = identity_fields(fields, identity)?;

    Ok(MemoryEvent {
        alignment,
        kind,
        size_bytes,
        algorithm,
        file_label,
        file_size_bytes,
    })
}

fn require_fields(fields: &[String]) -> Result<(), RecordError> {
    if fields.len() < MIN_FIELDS {
        return Err(RecordError::TooFewFields {
            found: fields.len(),
            expected: MIN_FIELDS,
        });
    }
    Ok(())
}

/// Algorithm, file label and file size, from the filename when known, else the record.
fn identity_fields(
    fields: &[String],
    identity: Option<&FileIdentity>,
) -> Result<(String, String, i64), RecordError> {
    let file_size_bytes = match identity.and_then(|id| id.file_size_bytes) {
        Some(size) => size,
        None => parse_int("file size bytes", &fields[FILE_SIZE_FIELD])?,
    };

    Ok(match identity {
        Some(id) => (id.algorithm.clone(), id.file_label.clone(), file_size_bytes),
        None => (
            fields[ALGORITHM_FIELD].clone(),
            fields[FILE_LABEL_FIELD].clone(),
            file_size_bytes,
        ),
    })
}

fn parse_int(field: &'static str, value: &str) -> Result<i64, RecordError> {
    value
        .parse::<i64>()
        .map_err(|source| RecordError::InvalidInteger {
            field,
            value: value.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    fn identity() -> FileIdentity {
        FileIdentity {
            algorithm: "quicksort".to_string(),
            run_label: "i9".to_string(),
            file_label: "01_100.bin".to_string(),
            file_size_bytes: None,
        }
    }

    #[test]
    fn test_parse_timing_in_record() {
        let fields = row(&["1", "12345", "3000000000", "mergesort", "a.bin", "1000"]);
        let m = parse_timing(&fields, None).unwrap();
        assert_eq!(m.run_number, 1);
        assert_eq!(m.cycles, 12345);
        assert_eq!(m.clock_hz, 3_000_000_000);
        assert_eq!(m.algorithm, "mergesort");
        assert_eq!(m.file_label, "a.bin");
        assert_eq!(m.file_size_bytes, 1000);
    }

    #[test]
    fn test_parse_timing_with_file_identity() {
        let fields = row(&["2", "500", "3000000000", "ignored", "ignored", "100"]);
        let m = parse_timing(&fields, Some(&identity())).unwrap();
        assert_eq!(m.algorithm, "quicksort");
        assert_eq!(m.file_label, "01_100.bin");
        assert_eq!(m.file_size_bytes, 100);
    }

    #[test]
    fn test_parse_timing_too_few_fields() {
        let fields = row(&["1", "2", "3", "a", "b"]);
        assert_eq!(
            parse_timing(&fields, None).unwrap_err(),
            RecordError::TooFewFields {
                found: 5,
                expected: 6
            }
        );
    }

    #[test]
    fn test_parse_timing_rejects_non_integers() {
        for fields in [
            row(&["x", "1", "1", "a", "b", "1"]),
            row(&["1", "1.5", "1", "a", "b", "1"]),
            row(&["1", "1", " 1", "a", "b", "1"]),
            row(&["1", "1", "1", "a", "b", "1e3"]),
        ] {
            assert!(matches!(
                parse_timing(&fields, None),
                Err(RecordError::InvalidInteger { .. })
            ));
        }
    }

    #[test]
    fn test_parse_memory_uses_filename_size() {
        let mut id = identity();
        id.file_size_bytes = Some(100);
        let fields = row(&["16", "ALLOC", "64", "x", "y", "not-a-number"]);
        let e = parse_memory(&fields, Some(&id)).unwrap();
        assert_eq!(e.kind, EventKind::Alloc);
        assert_eq!(e.size_bytes, 64);
        assert_eq!(e.file_size_bytes, 100);
        assert_eq!(e.alignment, "16");
    }

    #[test]
    fn test_parse_memory_unknown_kind_is_kept() {
        let fields = row(&["8", "REALLOC", "32", "bubble", "f.bin", "10"]);
        let e = parse_memory(&fields, None).unwrap();
        assert_eq!(e.kind, EventKind::Other("REALLOC".to_string()));
        assert_eq!(e.algorithm, "bubble");
    }

    #[test]
    fn test_parse_memory_invalid_size() {
        let fields = row(&["8", "FREE", "lots", "bubble", "f.bin", "10"]);
        assert!(parse_memory(&fields, None).is_err());
    }
}
