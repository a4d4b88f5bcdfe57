#![deny(unsafe_code)]

use std::path::PathBuf;

use ecds_model::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML manifest {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid manifest: {message}")]
    InvalidManifest { message: String },

    #[error("missing required role in manifest: {role}")]
    MissingRole { role: String },

    #[error("duplicate role in manifest: {role}")]
    DuplicateRole { role: String },

    #[error("invalid sha256 for {path}: {message}")]
    InvalidSha256 { path: PathBuf, message: String },

    #[error("invalid manifest path {path}: {message}")]
    InvalidPath { path: PathBuf, message: String },

    #[error("missing file listed in manifest: {path}")]
    MissingFile { path: PathBuf },

    #[error("unexpected file present under reference directory: {path}")]
    UnexpectedFile { path: PathBuf },

    #[error("sha256 mismatch for {path} (expected {expected}, got {actual})")]
    Sha256Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("invalid reference table {path}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}

impl ReferenceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Csv {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
