#![deny(unsafe_code)]

use ecds_model::IntervalClosed;
use serde::{Deserialize, Serialize};

pub const MANIFEST_SCHEMA: &str = "ecds-features.reference-manifest";
pub const MANIFEST_FILE_NAME: &str = "manifest.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub manifest: ManifestHeader,
    #[serde(default)]
    pub pins: Option<Pins>,
    #[serde(default)]
    pub age_bins: AgeBinSettings,
    pub files: Vec<ManifestFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestHeader {
    pub schema: String,
    pub schema_version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pins {
    pub release: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgeBinSettings {
    #[serde(default)]
    pub closed: IntervalClosed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestFile {
    pub path: String,
    pub sha256: String,
    pub kind: String,
    pub role: String,
    #[serde(default)]
    pub notes: Option<String>,
}
