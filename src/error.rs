//! Error types for record parsing and identity extraction.
//!
//! Both kinds are recoverable: a `RecordError` skips one record, an
//! `IdentityError` skips one source file.

use std::num::ParseIntError;
use thiserror::Error;

/// A raw record that could not be turned into a measurement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("malformed record: expected at least {expected} fields, found {found}")]
    TooFewFields { found: usize, expected: usize },

    #[error("invalid {field} '{value}': {source}")]
    InvalidInteger {
        field: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// A filename or size token that does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("invalid filename format '{name}': expected at least 3 underscore-separated segments")]
    TooFewSegments { name: String },

    #[error("invalid file info format '{label}': no trailing size token")]
    MissingSizeToken { label: String },

    #[error("invalid file size '{token}' in filename: {source}")]
    InvalidSizeToken {
        token: String,
        #[source]
        source: ParseIntError,
    },

    #[error("file size '{token}' in filename overflows")]
    SizeOverflow { token: String },
}
