//! Error types for MARC record building and writing.
//!
//! This module provides the [`MarcError`] type for all library operations
//! and the [`Result`] convenience type.
//!
//! Only two conditions are fatal: a mandatory field builder returning no
//! field, and an I/O failure while writing output. Unrecognized
//! language/country/place names, malformed ISBNs, and malformed barcodes are
//! advisory only; they are logged and the original value passes through.

use thiserror::Error;

/// Error type for all record building and writing operations.
#[derive(Error, Debug)]
pub enum MarcError {
    /// A mandatory field builder produced no field for a record.
    ///
    /// Carries the MARC tag of the missing field and a human-readable
    /// message. Aborts processing of the current record only.
    #[error("missing required field {tag:03}: {message}")]
    MissingField {
        /// MARC tag of the field that could not be built.
        tag: u16,
        /// Explanation of why the field is absent.
        message: String,
    },

    /// An input row did not have the expected column layout.
    #[error("malformed input row: {0}")]
    MalformedRow(String),

    /// Error from the CSV/TSV row reader.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A writer was used after `finish` was called.
    #[error("cannot write to a finished writer")]
    FinishedWriter,

    /// IO error from the underlying destination.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for [`std::result::Result`] with [`MarcError`].
pub type Result<T> = std::result::Result<T, MarcError>;
