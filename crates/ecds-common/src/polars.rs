//! Polars AnyValue utility functions.
//!
//! Raw ECDS codes are compared as strings, so every cell is rendered to the
//! same textual form regardless of the dtype the frame was built with.

use polars::prelude::AnyValue;

/// Renders a cell as a code string. `Null` stays `None`.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use ecds_common::any_to_code;
///
/// assert_eq!(any_to_code(AnyValue::Null), None);
/// assert_eq!(any_to_code(AnyValue::Int32(1)), Some("1".to_string()));
/// assert_eq!(any_to_code(AnyValue::Float64(1.0)), Some("1".to_string()));
/// assert_eq!(any_to_code(AnyValue::String("A")), Some("A".to_string()));
/// ```
pub fn any_to_code(value: AnyValue<'_>) -> Option<String> {
    let code = match value {
        AnyValue::Null => return None,
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => if b { "Y" } else { "N" }.to_string(),
        other => other.to_string(),
    };
    Some(code)
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// # Examples
///
/// ```
/// use ecds_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(10.0), "10");
/// assert_eq!(format_numeric(1.50), "1.5");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_to_code_integers() {
        assert_eq!(any_to_code(AnyValue::Int64(-100)).as_deref(), Some("-100"));
        assert_eq!(any_to_code(AnyValue::UInt32(0)).as_deref(), Some("0"));
    }

    #[test]
    fn test_any_to_code_keeps_leading_zeros_in_strings() {
        assert_eq!(any_to_code(AnyValue::String("01")).as_deref(), Some("01"));
    }

    #[test]
    fn test_any_to_code_boolean() {
        assert_eq!(any_to_code(AnyValue::Boolean(true)).as_deref(), Some("Y"));
        assert_eq!(any_to_code(AnyValue::Boolean(false)).as_deref(), Some("N"));
    }

    #[test]
    fn test_format_numeric() {
        assert_eq!(format_numeric(1.5), "1.5");
        assert_eq!(format_numeric(100.0), "100");
    }

    #[test]
    fn test_parse_f64() {
        assert_eq!(parse_f64(" 45 "), Some(45.0));
        assert_eq!(parse_f64("17.5"), Some(17.5));
        assert_eq!(parse_f64("invalid"), None);
        assert_eq!(parse_f64(""), None);
    }
}
