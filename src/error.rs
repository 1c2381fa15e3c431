//! Error kinds a cleaning run can fail with.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("column `{0}` not found in input header")]
    MissingColumn(String),

    #[error("row {row}: `Date` value {value:?} does not match MM/DD/YYYY hh:mm:ss AM|PM")]
    DateParse { row: usize, value: String },

    #[error("output path not writable: {}: {source}", path.display())]
    OutputNotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("row {row}: expected {expected} fields, found {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

impl CleanError {
    /// True for errors caused by the input not matching the expected schema.
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, Self::MissingColumn(_) | Self::DateParse { .. } | Self::RaggedRow { .. })
    }
}

pub type Result<T> = std::result::Result<T, CleanError>;
