#![deny(unsafe_code)]

//! Parsers for the reference table CSV layouts.
//!
//! - value maps: `code,label`
//! - age bins: `lower,upper,label`

use std::path::Path;

use ecds_model::{AgeBins, IntervalClosed, ValueMap};

use crate::error::ReferenceError;

fn header_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn require_header(
    path: &Path,
    headers: &csv::StringRecord,
    name: &str,
) -> Result<usize, ReferenceError> {
    header_index(headers, name)
        .ok_or_else(|| ReferenceError::csv(path, format!("missing '{name}' column")))
}

fn get_string(row: &csv::StringRecord, idx: usize) -> Option<String> {
    row.get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn open_reader(path: &Path) -> Result<(csv::Reader<std::fs::File>, csv::StringRecord), ReferenceError> {
    let file = std::fs::File::open(path).map_err(|e| ReferenceError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(file);
    let headers = reader
        .headers()
        .map_err(|e| ReferenceError::csv(path, e))?
        .clone();
    Ok((reader, headers))
}

/// Parse a `code,label` table. Blank rows are skipped; duplicate codes are an
/// error.
pub fn parse_value_map_csv(path: &Path) -> Result<ValueMap, ReferenceError> {
    let (mut reader, headers) = open_reader(path)?;
    let idx_code = require_header(path, &headers, "code")?;
    let idx_label = require_header(path, &headers, "label")?;

    let mut map = ValueMap::new();
    for (line, row) in reader.records().enumerate() {
        let row = row.map_err(|e| ReferenceError::csv(path, e))?;
        let Some(code) = get_string(&row, idx_code) else {
            continue;
        };
        let label = get_string(&row, idx_label).ok_or_else(|| {
            // +2: one for the header, one for 1-based numbering
            ReferenceError::csv(path, format!("row {} has no label", line + 2))
        })?;
        map.try_insert(code, label)
            .map_err(|source| ReferenceError::Table {
                path: path.to_path_buf(),
                source,
            })?;
    }
    Ok(map)
}

fn parse_edge(path: &Path, raw: Option<String>, column: &str) -> Result<f64, ReferenceError> {
    let raw = raw.ok_or_else(|| ReferenceError::csv(path, format!("empty '{column}' value")))?;
    match raw.to_ascii_lowercase().as_str() {
        "inf" | "+inf" | "infinity" => Ok(f64::INFINITY),
        "-inf" | "-infinity" => Ok(f64::NEG_INFINITY),
        _ => raw
            .parse::<f64>()
            .map_err(|e| ReferenceError::csv(path, format!("invalid {column} '{raw}': {e}"))),
    }
}

/// Parse a `lower,upper,label` age bin table.
pub fn parse_age_bins_csv(path: &Path, closed: IntervalClosed) -> Result<AgeBins, ReferenceError> {
    let (mut reader, headers) = open_reader(path)?;
    let idx_lower = require_header(path, &headers, "lower")?;
    let idx_upper = require_header(path, &headers, "upper")?;
    let idx_label = require_header(path, &headers, "label")?;

    let mut rows = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| ReferenceError::csv(path, e))?;
        let Some(label) = get_string(&row, idx_label) else {
            continue;
        };
        let lower = parse_edge(path, get_string(&row, idx_lower), "lower")?;
        let upper = parse_edge(path, get_string(&row, idx_upper), "upper")?;
        rows.push((lower, upper, label));
    }

    AgeBins::from_intervals(rows, closed).map_err(|source| ReferenceError::Table {
        path: path.to_path_buf(),
        source,
    })
}
