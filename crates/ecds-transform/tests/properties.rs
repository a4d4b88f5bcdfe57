//! Property tests for the categorization stages.

use ecds_model::{
    AcscMapping, AgeBins, FeatureOptions, IntervalClosed, NOT_APPLICABLE, ReferenceSet,
    ReferenceTable, StageId, ValueMap,
};
use ecds_transform::{FeaturePipeline, derive_features};
use polars::prelude::{Column, DataFrame};
use proptest::prelude::*;

const AGE_LABELS: [&str; 4] = ["0-17", "18-44", "45-64", "65+"];
const ACSC_CATEGORIES: [&str; 2] = ["Asthma", "Diabetes"];

fn bins() -> AgeBins {
    AgeBins::new(
        vec![-1.0, 17.0, 44.0, 64.0, 120.0],
        AGE_LABELS.iter().map(|l| (*l).to_string()).collect(),
        IntervalClosed::Right,
    )
    .unwrap()
}

fn reference() -> ReferenceSet {
    let acsc = AcscMapping::new(
        [("J45", "Asthma"), ("E10", "Diabetes"), ("E11", "Diabetes")]
            .into_iter()
            .collect(),
    );
    let mut set = ReferenceSet::new(bins(), acsc);
    for table in ReferenceTable::ALL {
        set.insert_map(table, ValueMap::new());
    }
    set.with_map(
        ReferenceTable::Investigation,
        [("B", "Bloods"), ("U", "Urgent")].into_iter().collect(),
    )
}

fn only(stage: StageId) -> FeaturePipeline {
    let skip = StageId::ALL.into_iter().filter(|s| *s != stage);
    FeaturePipeline::with_options(FeatureOptions::new().with_skip(skip))
}

fn strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

fn diagnosis_code() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("J45".to_string())),
        Just(Some("E11".to_string())),
        Just(Some("Asthma".to_string())),
        "[A-Z][0-9]{2}".prop_map(Some),
        ".{0,6}".prop_map(Some),
    ]
}

proptest! {
    #[test]
    fn ages_inside_the_range_get_exactly_one_label(age in -0.999f64..120.0) {
        let bins = bins();
        let label = bins.categorize(age);
        prop_assert!(label.is_some());
        let matching = bins
            .edges()
            .windows(2)
            .filter(|edge| edge[0] < age && age <= edge[1])
            .count();
        prop_assert_eq!(matching, 1);
    }

    #[test]
    fn ages_outside_the_range_are_null(age in prop_oneof![-1000.0f64..=-1.0, 120.001f64..1000.0]) {
        let bins = bins();
        prop_assert_eq!(bins.categorize(age), None);
    }

    #[test]
    fn acsc_output_is_closed(codes in prop::collection::vec(diagnosis_code(), 1..20)) {
        let mut df = DataFrame::new(vec![Column::new("eddiag_01".into(), codes)]).unwrap();
        only(StageId::Acsc).execute(&mut df, &reference()).unwrap();

        for value in strings(&df, "eddiag_01_acsc") {
            let value = value.expect("ACSC output is never null");
            prop_assert!(
                value == NOT_APPLICABLE || ACSC_CATEGORIES.contains(&value.as_str()),
                "unexpected ACSC value {value}"
            );
        }
    }

    #[test]
    fn default_policy_never_emits_null(codes in prop::collection::vec(prop::option::of("[A-Z ]{0,3}"), 1..20)) {
        let mut df = DataFrame::new(vec![Column::new("edinvest_01".into(), codes)]).unwrap();
        only(StageId::Investigation).execute(&mut df, &reference()).unwrap();

        for value in strings(&df, "edinvest_01_cat") {
            let value = value.expect("default policy fills every cell");
            prop_assert!(value == "Bloods" || value == "Urgent", "unexpected value {value}");
        }
    }

    #[test]
    fn rerun_gives_identical_frames(codes in prop::collection::vec(diagnosis_code(), 1..10)) {
        let ages: Vec<Option<String>> = (0..codes.len()).map(|i| Some((i * 13).to_string())).collect();
        let mut df = DataFrame::new(vec![
            Column::new("eddiag_01".into(), codes.clone()),
            Column::new("activage".into(), ages),
        ])
        .unwrap();
        let options = FeatureOptions::new().with_skip(
            StageId::ALL
                .into_iter()
                .filter(|s| !matches!(s, StageId::Age | StageId::Acsc | StageId::SeasonalDiagnosis)),
        );
        let pipeline = FeaturePipeline::with_options(options);

        pipeline.execute(&mut df, &reference()).unwrap();
        let first = df.clone();
        pipeline.execute(&mut df, &reference()).unwrap();

        prop_assert!(first.equals_missing(&df));
        prop_assert_eq!(df.height(), codes.len());
    }
}

#[test]
fn derive_features_requires_every_named_column() {
    let mut df = DataFrame::new(vec![Column::new("gender".into(), vec!["1"])]).unwrap();
    assert!(derive_features(&mut df, &reference()).is_err());
    assert_eq!(df.width(), 1);
}
