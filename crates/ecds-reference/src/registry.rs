#![deny(unsafe_code)]

//! Manifest verification and loading of a reference directory.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use ecds_model::{AcscMapping, ReferenceSet, ReferenceTable};
use tracing::debug;

use crate::error::ReferenceError;
use crate::hash::sha256_hex;
use crate::manifest::{MANIFEST_FILE_NAME, MANIFEST_SCHEMA, Manifest, ManifestFile};
use crate::tables::{parse_age_bins_csv, parse_value_map_csv};

pub const ROLE_AGE_BINS: &str = "age_bins";
pub const ROLE_ACSC: &str = "acsc";

const ALLOWED_KINDS: &[&str] = &["csv"];

/// Every role the manifest must list.
pub fn required_roles() -> Vec<&'static str> {
    let mut roles = vec![ROLE_AGE_BINS, ROLE_ACSC];
    roles.extend(ReferenceTable::ALL.into_iter().map(ReferenceTable::role));
    roles
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct TableSummary {
    pub role: String,
    pub path: String,
    pub entries: usize,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct VerifySummary {
    pub reference_dir: PathBuf,
    pub release: Option<String>,
    pub file_count: usize,
    pub age_bin_count: usize,
    pub acsc_code_count: usize,
    pub acsc_category_count: usize,
    pub tables: Vec<TableSummary>,
}

/// Verify a reference directory against its manifest and load every table.
///
/// Fails on the first problem: schema, roles, paths, unlisted files,
/// checksums, then table contents.
pub fn verify_and_load(
    reference_dir: &Path,
) -> Result<(ReferenceSet, VerifySummary), ReferenceError> {
    let manifest = load_manifest(&reference_dir.join(MANIFEST_FILE_NAME))?;

    validate_manifest(&manifest, reference_dir)?;

    let mut files = manifest.files.clone();
    files.sort_by(|a, b| a.path.cmp(&b.path));

    for file in &files {
        verify_file(reference_dir, file)?;
    }

    let age_bins = parse_age_bins_csv(
        &resolve_role_path(reference_dir, &files, ROLE_AGE_BINS)?,
        manifest.age_bins.closed,
    )?;
    let acsc = AcscMapping::new(parse_value_map_csv(&resolve_role_path(
        reference_dir,
        &files,
        ROLE_ACSC,
    )?)?);

    let mut tables = vec![
        TableSummary {
            role: ROLE_AGE_BINS.to_string(),
            path: role_file(&files, ROLE_AGE_BINS),
            entries: age_bins.labels().len(),
        },
        TableSummary {
            role: ROLE_ACSC.to_string(),
            path: role_file(&files, ROLE_ACSC),
            entries: acsc.codes().len(),
        },
    ];
    let acsc_code_count = acsc.codes().len();
    let acsc_category_count = acsc.categories().count();
    let age_bin_count = age_bins.labels().len();

    let mut set = ReferenceSet::new(age_bins, acsc);
    for table in ReferenceTable::ALL {
        let map = parse_value_map_csv(&resolve_role_path(reference_dir, &files, table.role())?)?;
        debug!(table = %table, entries = map.len(), "loaded reference table");
        tables.push(TableSummary {
            role: table.role().to_string(),
            path: role_file(&files, table.role()),
            entries: map.len(),
        });
        set.insert_map(table, map);
    }

    let release = manifest.pins.as_ref().map(|pins| pins.release.clone());
    if let Some(release) = &release {
        set = set.with_release(release.clone());
    }

    let summary = VerifySummary {
        reference_dir: reference_dir.to_path_buf(),
        release,
        file_count: files.len(),
        age_bin_count,
        acsc_code_count,
        acsc_category_count,
        tables,
    };

    Ok((set, summary))
}

fn load_manifest(path: &Path) -> Result<Manifest, ReferenceError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ReferenceError::io(path, e))?;
    toml::from_str(&contents).map_err(|e| ReferenceError::Toml {
        path: path.to_path_buf(),
        source: e,
    })
}

fn validate_manifest(manifest: &Manifest, reference_dir: &Path) -> Result<(), ReferenceError> {
    if manifest.manifest.schema != MANIFEST_SCHEMA {
        return Err(ReferenceError::InvalidManifest {
            message: format!("unsupported schema: {}", manifest.manifest.schema),
        });
    }
    if manifest.manifest.schema_version != 1 {
        return Err(ReferenceError::InvalidManifest {
            message: format!(
                "unsupported schema_version: {}",
                manifest.manifest.schema_version
            ),
        });
    }

    let mut roles: BTreeSet<&str> = BTreeSet::new();
    let mut manifest_paths: BTreeSet<PathBuf> = BTreeSet::new();

    for file in &manifest.files {
        if !roles.insert(file.role.as_str()) {
            return Err(ReferenceError::DuplicateRole {
                role: file.role.clone(),
            });
        }

        if !ALLOWED_KINDS.contains(&file.kind.as_str()) {
            return Err(ReferenceError::InvalidManifest {
                message: format!("unsupported kind '{}' for {}", file.kind, file.path),
            });
        }

        validate_sha(&file.sha256, &file.path)?;

        let path = validate_path(&file.path)?;
        manifest_paths.insert(normalize_path(&path));
    }

    for role in required_roles() {
        if !roles.contains(role) {
            return Err(ReferenceError::MissingRole {
                role: role.to_string(),
            });
        }
    }

    for path in list_files_under(reference_dir)? {
        if path == Path::new(MANIFEST_FILE_NAME) {
            continue;
        }
        if !manifest_paths.contains(&normalize_path(&path)) {
            return Err(ReferenceError::UnexpectedFile {
                path: reference_dir.join(path),
            });
        }
    }

    Ok(())
}

fn verify_file(reference_dir: &Path, file: &ManifestFile) -> Result<(), ReferenceError> {
    let full_path = reference_dir.join(&file.path);
    let bytes = std::fs::read(&full_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ReferenceError::MissingFile {
                path: full_path.clone(),
            }
        } else {
            ReferenceError::io(full_path.clone(), e)
        }
    })?;

    let actual = sha256_hex(&bytes);
    let expected = file.sha256.to_ascii_lowercase();
    if actual != expected {
        return Err(ReferenceError::Sha256Mismatch {
            path: full_path,
            expected,
            actual,
        });
    }
    Ok(())
}

fn resolve_role_path(
    reference_dir: &Path,
    files: &[ManifestFile],
    role: &str,
) -> Result<PathBuf, ReferenceError> {
    let f = files
        .iter()
        .find(|f| f.role == role)
        .ok_or_else(|| ReferenceError::MissingRole {
            role: role.to_string(),
        })?;
    Ok(reference_dir.join(&f.path))
}

fn role_file(files: &[ManifestFile], role: &str) -> String {
    files
        .iter()
        .find(|f| f.role == role)
        .map(|f| f.path.clone())
        .unwrap_or_default()
}

fn validate_sha(sha: &str, path: &str) -> Result<(), ReferenceError> {
    if sha.len() != 64 || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ReferenceError::InvalidSha256 {
            path: PathBuf::from(path),
            message: "sha256 must be 64 hex characters".to_string(),
        });
    }
    Ok(())
}

fn validate_path(path: &str) -> Result<PathBuf, ReferenceError> {
    if path.contains('\\') {
        return Err(ReferenceError::InvalidPath {
            path: PathBuf::from(path),
            message: "manifest path must use '/' separators".to_string(),
        });
    }

    let p = PathBuf::from(path);
    if p.is_absolute() {
        return Err(ReferenceError::InvalidPath {
            path: p,
            message: "manifest path must be relative".to_string(),
        });
    }

    if p.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(ReferenceError::InvalidPath {
            path: p,
            message: "manifest path must not traverse out of the reference directory"
                .to_string(),
        });
    }

    Ok(p)
}

fn list_files_under(root: &Path) -> Result<BTreeSet<PathBuf>, ReferenceError> {
    let mut stack = vec![root.to_path_buf()];
    let mut files = BTreeSet::new();

    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir).map_err(|e| ReferenceError::io(&dir, e))? {
            let entry = entry.map_err(|e| ReferenceError::io(&dir, e))?;
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.is_file() {
                let rel = path
                    .strip_prefix(root)
                    .map_err(|e| ReferenceError::InvalidPath {
                        path: path.clone(),
                        message: format!("failed to relativize path: {e}"),
                    })?
                    .to_path_buf();
                files.insert(rel);
            }
        }
    }

    Ok(files)
}

fn normalize_path(p: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for c in p.components() {
        match c {
            Component::CurDir => {}
            _ => out.push(c.as_os_str()),
        }
    }
    out
}
