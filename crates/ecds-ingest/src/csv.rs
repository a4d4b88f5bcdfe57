//! Reading ECDS extracts and writing derived tables.
//!
//! Extracts are read with every column as `String`. Schema inference would
//! turn codes such as `"01"` into integers and lose the leading zero, and
//! coded fields are looked up by their exact text.

use std::fs::File;
use std::path::Path;

use polars::prelude::{CsvReadOptions, CsvWriter, DataFrame, SerReader, SerWriter};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Reads a CSV extract into a DataFrame of nullable `String` columns.
///
/// Empty cells become null.
pub fn read_extract(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if df.width() == 0 {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "extract loaded"
    );
    Ok(df)
}

/// Writes a frame as CSV with a header row, replacing any existing file.
pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .map_err(|e| IngestError::CsvWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "table written"
    );
    Ok(())
}
