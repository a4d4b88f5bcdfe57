//! Column executors called by the pipeline, one per [`StageKind`].
//!
//! Each executor reads one source column, resolves every cell and writes a
//! new nullable string column. The source column is never modified.
//!
//! [`StageKind`]: crate::stage::StageKind

use ecds_common::parse_f64;
use ecds_model::{
    AcscMapping, AgeBins, LookupOutcome, Resolution, UnmappedPolicy, ValueMap,
};
use polars::prelude::{DataFrame, NamedFrom, Series};

use crate::data_utils::column_codes;
use crate::error::Result;
use crate::report::ColumnReport;

/// Map a code column through a value map under `policy`.
pub fn remap_column(
    df: &mut DataFrame,
    source: &str,
    target: &str,
    map: &ValueMap,
    policy: &UnmappedPolicy,
    trim: bool,
) -> Result<ColumnReport> {
    let codes = column_codes(df, source, trim)?;
    write_resolved(df, source, target, codes.iter(), |code| {
        map.resolve(code, policy)
    })
}

/// Categorize a numeric column into labelled intervals.
///
/// Null, NaN and non-numeric cells produce null; numeric values outside every
/// interval produce null and count as unmapped.
pub fn bin_column(
    df: &mut DataFrame,
    source: &str,
    target: &str,
    bins: &AgeBins,
) -> Result<ColumnReport> {
    let codes = column_codes(df, source, true)?;
    write_resolved(df, source, target, codes.iter(), |code| bin_value(bins, code))
}

/// Map diagnosis codes to ACSC categories, `"-"` for everything else.
pub fn acsc_column(
    df: &mut DataFrame,
    source: &str,
    target: &str,
    mapping: &AcscMapping,
    trim: bool,
) -> Result<ColumnReport> {
    let codes = column_codes(df, source, trim)?;
    write_resolved(df, source, target, codes.iter(), |code| {
        mapping.categorize(code)
    })
}

fn bin_value(bins: &AgeBins, code: Option<&str>) -> Resolution {
    let Some(code) = code else {
        return Resolution {
            value: None,
            outcome: LookupOutcome::Missing,
        };
    };
    match parse_f64(code) {
        Some(value) if value.is_nan() => Resolution {
            value: None,
            outcome: LookupOutcome::Missing,
        },
        Some(value) => match bins.categorize(value) {
            Some(label) => Resolution {
                value: Some(label.to_string()),
                outcome: LookupOutcome::Mapped,
            },
            None => Resolution {
                value: None,
                outcome: LookupOutcome::Unmapped,
            },
        },
        None => Resolution {
            value: None,
            outcome: LookupOutcome::Unmapped,
        },
    }
}

fn write_resolved<'a, I, F>(
    df: &mut DataFrame,
    source: &str,
    target: &str,
    codes: I,
    mut resolve: F,
) -> Result<ColumnReport>
where
    I: Iterator<Item = &'a Option<String>>,
    F: FnMut(Option<&str>) -> Resolution,
{
    let mut report = ColumnReport::new(source, target);
    let mut values: Vec<Option<String>> = Vec::with_capacity(df.height());
    for code in codes {
        let resolution = resolve(code.as_deref());
        report.record(&resolution);
        values.push(resolution.value);
    }

    df.with_column(Series::new(target.into(), values))?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecds_model::IntervalClosed;
    use polars::prelude::Column;

    fn bins() -> AgeBins {
        AgeBins::new(
            vec![-1.0, 17.0, 64.0, f64::INFINITY],
            vec!["0-17".into(), "18-64".into(), "65+".into()],
            IntervalClosed::Right,
        )
        .unwrap()
    }

    fn target(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        column_codes(df, name, false).unwrap()
    }

    #[test]
    fn bin_value_edges_are_right_closed() {
        let bins = bins();
        assert_eq!(bin_value(&bins, Some("17")).value.as_deref(), Some("0-17"));
        assert_eq!(bin_value(&bins, Some("17.5")).value.as_deref(), Some("18-64"));
        assert_eq!(bin_value(&bins, Some("-5")).outcome, LookupOutcome::Unmapped);
        assert_eq!(bin_value(&bins, Some("abc")).value, None);
        assert_eq!(bin_value(&bins, Some("NaN")).outcome, LookupOutcome::Missing);
    }

    #[test]
    fn remap_writes_new_column_and_keeps_source() {
        let mut df = DataFrame::new(vec![Column::new(
            "gender".into(),
            vec![Some("1"), Some("7"), None],
        )])
        .unwrap();
        let map: ValueMap = [("1", "Male")].into_iter().collect();

        let report = remap_column(
            &mut df,
            "gender",
            "gender_cat",
            &map,
            &UnmappedPolicy::PassThrough,
            true,
        )
        .unwrap();

        assert_eq!(
            target(&df, "gender_cat"),
            vec![Some("Male".to_string()), Some("7".to_string()), None]
        );
        assert_eq!(
            target(&df, "gender"),
            vec![Some("1".to_string()), Some("7".to_string()), None]
        );
        assert_eq!(report.mapped, 1);
        assert_eq!(report.unmapped, 1);
        assert_eq!(report.missing_input, 1);
    }

    #[test]
    fn acsc_column_marks_missing_as_not_applicable() {
        let mut df = DataFrame::new(vec![Column::new(
            "eddiag_01".into(),
            vec![Some("J45"), None, Some("R07")],
        )])
        .unwrap();
        let mapping = AcscMapping::new([("J45", "Asthma")].into_iter().collect());

        acsc_column(&mut df, "eddiag_01", "eddiag_01_acsc", &mapping, true).unwrap();

        assert_eq!(
            target(&df, "eddiag_01_acsc"),
            vec![
                Some("Asthma".to_string()),
                Some("-".to_string()),
                Some("-".to_string())
            ]
        );
    }
}
