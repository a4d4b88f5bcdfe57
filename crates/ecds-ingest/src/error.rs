//! Error types for ECDS extract ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing extracts.
#[derive(Debug, Error)]
pub enum IngestError {
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to create or write a file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failed to serialize a frame as CSV.
    #[error("failed to write CSV {path}: {message}")]
    CsvWrite { path: PathBuf, message: String },

    /// CSV file has a header but no columns.
    #[error("CSV file has no columns: {path}")]
    EmptyCsv { path: PathBuf },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
