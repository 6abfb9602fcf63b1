//! Cohort identity extraction.
//!
//! Benchmark logs carry their algorithm / run / input-file identity either in
//! the filename (`quicksort_i9_01_100.bin.csv`) or in dedicated record
//! columns. [`IdentityStrategy`] selects which.

use crate::error::IdentityError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Where a log file keeps its cohort identity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum IdentityStrategy {
    /// `<algorithm>_<run>_<file label>.<ext>`
    #[default]
    #[serde(rename = "filename")]
    #[value(name = "filename")]
    FileName,
    /// Algorithm, file label and size are record fields 3, 4 and 5.
    #[serde(rename = "in-record")]
    #[value(name = "in-record")]
    InRecord,
}

impl fmt::Display for IdentityStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityStrategy::FileName => write!(f, "filename"),
            IdentityStrategy::InRecord => write!(f, "in-record"),
        }
    }
}

/// Identity decoded from a log filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIdentity {
    pub algorithm: String,
    pub run_label: String,
    pub file_label: String,
    /// Only decoded for memory logs; timing logs carry the size per record.
    pub file_size_bytes: Option<i64>,
}

impl FileIdentity {
    /// Decode `<algorithm>_<run>_<file label>` from a path, stripping `.<extension>`.
    pub fn from_file_name(path: &str, extension: &str) -> Result<Self, IdentityError> {
        let base = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());
        let suffix = format!(".{}", extension);
        let stem = base.strip_suffix(suffix.as_str()).unwrap_or(&base);

        let parts: Vec<&str> = stem.split('_').collect();
        if parts.len() < 3 {
            return Err(IdentityError::TooFewSegments {
                name: base.to_string(),
            });
        }

        Ok(Self {
            algorithm: parts[0].to_string(),
            run_label: parts[1].to_string(),
            file_label: parts[2..].join("_"),
            file_size_bytes: None,
        })
    }

    /// Decode the trailing size token of the file label (`01_100K.bin` -> 100000).
    pub fn with_size_from_label(mut self) -> Result<Self, IdentityError> {
        let token = match self.file_label.rsplit_once('_') {
            Some((_, last)) => last,
            None => {
                return Err(IdentityError::MissingSizeToken {
                    label: self.file_label.clone(),
                })
            }
        };
        self.file_size_bytes = Some(decode_size_token(token)?);
        Ok(self)
    }
}

/// Decode a size token such as `100`, `100K` or `2M`, with an optional `.bin` suffix.
///
/// `K` multiplies by 1000 and `M` by 1,000,000.
pub fn decode_size_token(token: &str) -> Result<i64, IdentityError> {
    let raw = token.strip_suffix(".bin").unwrap_or(token);

    let (digits, multiplier) = if let Some(d) = raw.strip_suffix('K') {
        (d, 1_000)
    } else if let Some(d) = raw.strip_suffix('M') {
        (d, 1_000_000)
    } else {
        (raw, 1)
    };

    let value: i64 = digits
        .parse()
        .map_err(|source| IdentityError::InvalidSizeToken {
            token: token.to_string(),
            source,
        })?;

    value
        .checked_mul(multiplier)
        .ok_or_else(|| IdentityError::SizeOverflow {
            token: token.to_string(),
        })
}
