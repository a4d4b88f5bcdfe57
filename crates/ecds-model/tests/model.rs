#![allow(missing_docs)]

use ecds_model::{
    AcscMapping, AgeBins, FeatureOptions, IntervalClosed, ReferenceSet, ReferenceTable, StageId,
    ValueMap,
};

fn minimal_set() -> ReferenceSet {
    let bins = AgeBins::new(
        vec![0.0, 18.0, 65.0],
        vec!["Child".into(), "Adult".into()],
        IntervalClosed::Right,
    )
    .unwrap();
    ReferenceSet::new(bins, AcscMapping::default())
}

#[test]
fn stage_ids_round_trip_through_names() {
    for stage in StageId::ALL {
        let parsed: StageId = stage.as_str().parse().unwrap();
        assert_eq!(parsed, stage);
    }
    assert_eq!("GENDER".parse::<StageId>().unwrap(), StageId::Gender);
    assert!("unknown".parse::<StageId>().is_err());
}

#[test]
fn stage_serializes_to_field_name() {
    let json = serde_json::to_string(&StageId::SeasonalDiagnosis).unwrap();
    assert_eq!(json, "\"eddiag_seasonal\"");
}

#[test]
fn every_value_map_stage_has_a_table() {
    let tables: Vec<_> = StageId::ALL
        .into_iter()
        .filter_map(StageId::reference_table)
        .collect();
    assert_eq!(tables.len(), ReferenceTable::ALL.len());
    for table in tables {
        assert_eq!(table.role().parse::<ReferenceTable>().unwrap(), table);
    }
}

#[test]
fn reference_set_reports_missing_tables() {
    let set = minimal_set().with_map(
        ReferenceTable::Gender,
        [("1", "Male")].into_iter().collect::<ValueMap>(),
    );
    let missing = set.missing_tables();
    assert_eq!(missing.len(), ReferenceTable::ALL.len() - 1);
    assert!(!missing.contains(&ReferenceTable::Gender));
    assert_eq!(
        set.value_map(ReferenceTable::Gender).unwrap().get("1"),
        Some("Male")
    );
}

#[test]
fn options_skip_stages() {
    let options = FeatureOptions::new().with_skip([StageId::Acsc]);
    assert!(options.trim_codes);
    assert!(!options.is_enabled(StageId::Acsc));
    assert!(options.is_enabled(StageId::Age));

    let json = serde_json::to_string(&options).unwrap();
    let round: FeatureOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(round, options);
}

#[test]
fn options_fill_missing_fields_with_defaults() {
    let options: FeatureOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(options, FeatureOptions::default());
    assert!(options.trim_codes);

    let options: FeatureOptions = serde_json::from_str(r#"{"skip":["gender"]}"#).unwrap();
    assert!(options.trim_codes);
    assert!(!options.is_enabled(StageId::Gender));
}
