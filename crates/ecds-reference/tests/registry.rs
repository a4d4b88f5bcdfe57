#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};

use ecds_model::{IntervalClosed, ReferenceTable};
use ecds_reference::{ReferenceError, load_default_reference_set, verify_and_load};
use tempfile::TempDir;

fn shipped_reference_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../reference")
}

fn copy_reference_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    for entry in fs::read_dir(shipped_reference_dir()).unwrap() {
        let path = entry.unwrap().path();
        fs::copy(&path, dir.path().join(path.file_name().unwrap())).unwrap();
    }
    dir
}

fn rewrite(path: &Path, from: &str, to: &str) {
    let contents = fs::read_to_string(path).unwrap();
    fs::write(path, contents.replace(from, to)).unwrap();
}

#[test]
fn loads_shipped_reference_tables() {
    let (set, summary) = verify_and_load(&shipped_reference_dir()).expect("load reference");

    assert_eq!(summary.release.as_deref(), Some("sample-2024.1"));
    assert_eq!(summary.file_count, 15);
    assert_eq!(summary.tables.len(), 15);
    assert!(set.missing_tables().is_empty());
    assert_eq!(set.age_bins().closed(), IntervalClosed::Right);
    assert_eq!(set.age_bins().categorize(45.0), Some("45-64"));
    assert_eq!(set.age_bins().categorize(0.0), Some("0-17"));
    assert_eq!(set.age_bins().categorize(101.0), Some("85+"));
    assert!(set.acsc().is_category("Asthma"));
    assert_eq!(
        set.value_map(ReferenceTable::Gender).unwrap().get("1"),
        Some("Male")
    );
}

#[test]
fn default_reference_set_is_shared() {
    let first = load_default_reference_set().expect("load default");
    let second = load_default_reference_set().expect("load default");
    assert!(std::sync::Arc::ptr_eq(&first, &second));
}

#[test]
fn checksum_mismatch_is_rejected() {
    let dir = copy_reference_dir();
    rewrite(&dir.path().join("gender.csv"), "Female", "F");

    let err = verify_and_load(dir.path()).unwrap_err();
    assert!(matches!(err, ReferenceError::Sha256Mismatch { .. }), "{err}");
}

#[test]
fn unlisted_file_is_rejected() {
    let dir = copy_reference_dir();
    fs::write(dir.path().join("extra.csv"), "code,label\n").unwrap();

    let err = verify_and_load(dir.path()).unwrap_err();
    assert!(matches!(err, ReferenceError::UnexpectedFile { .. }), "{err}");
}

#[test]
fn missing_role_is_rejected() {
    let dir = copy_reference_dir();
    rewrite(
        &dir.path().join("manifest.toml"),
        "role = \"gender\"",
        "role = \"gender_v2\"",
    );

    let err = verify_and_load(dir.path()).unwrap_err();
    match err {
        ReferenceError::MissingRole { role } => assert_eq!(role, "gender"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unsupported_schema_is_rejected() {
    let dir = copy_reference_dir();
    rewrite(
        &dir.path().join("manifest.toml"),
        "schema_version = 1",
        "schema_version = 2",
    );

    let err = verify_and_load(dir.path()).unwrap_err();
    assert!(matches!(err, ReferenceError::InvalidManifest { .. }), "{err}");
}

#[test]
fn missing_manifest_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = verify_and_load(dir.path()).unwrap_err();
    assert!(matches!(err, ReferenceError::Io { .. }), "{err}");
}

#[test]
fn manifest_paths_must_stay_inside_the_directory() {
    for bad_path in ["../gender.csv", "/gender.csv"] {
        let dir = copy_reference_dir();
        rewrite(
            &dir.path().join("manifest.toml"),
            "path = \"gender.csv\"",
            &format!("path = \"{bad_path}\""),
        );

        let err = verify_and_load(dir.path()).unwrap_err();
        match err {
            ReferenceError::InvalidPath { path, .. } => assert_eq!(path, Path::new(bad_path)),
            other => panic!("unexpected error for {bad_path}: {other}"),
        }
    }
}

#[test]
fn duplicate_role_is_rejected() {
    let dir = copy_reference_dir();
    rewrite(
        &dir.path().join("manifest.toml"),
        "role = \"ethnos\"",
        "role = \"gender\"",
    );

    let err = verify_and_load(dir.path()).unwrap_err();
    match err {
        ReferenceError::DuplicateRole { role } => assert_eq!(role, "gender"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_checksum_is_rejected() {
    let dir = copy_reference_dir();
    let manifest = dir.path().join("manifest.toml");
    let contents = fs::read_to_string(&manifest).unwrap();
    let sha = contents
        .lines()
        .find_map(|line| line.strip_prefix("sha256 = \""))
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap()
        .to_string();
    rewrite(&manifest, &sha, "not-a-checksum");

    let err = verify_and_load(dir.path()).unwrap_err();
    assert!(matches!(err, ReferenceError::InvalidSha256 { .. }), "{err}");
}

#[test]
fn manifest_selects_left_closed_age_bins() {
    let dir = copy_reference_dir();
    rewrite(
        &dir.path().join("manifest.toml"),
        "closed = \"right\"",
        "closed = \"left\"",
    );

    let (set, _) = verify_and_load(dir.path()).expect("load reference");
    assert_eq!(set.age_bins().closed(), IntervalClosed::Left);
    assert_eq!(set.age_bins().categorize(17.0), Some("18-24"));
    assert_eq!(set.age_bins().categorize(16.0), Some("0-17"));
}
