//! Cell extraction helpers shared by the stage executors.

use ecds_common::any_to_code;
use polars::prelude::{AnyValue, DataFrame};

use crate::error::Result;

/// Render every cell of a column as a raw code.
///
/// With `trim` set, surrounding whitespace is removed and a cell that is
/// empty after trimming is treated as null.
pub fn column_codes(df: &DataFrame, name: &str, trim: bool) -> Result<Vec<Option<String>>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let code = any_to_code(column.get(idx).unwrap_or(AnyValue::Null));
        values.push(if trim { code.and_then(trim_code) } else { code });
    }
    Ok(values)
}

fn trim_code(code: String) -> Option<String> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == code.len() {
        Some(code)
    } else {
        Some(trimmed.to_string())
    }
}
