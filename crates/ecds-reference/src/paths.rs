//! Reference directory path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the reference directory.
pub const REFERENCE_ENV_VAR: &str = "ECDS_REFERENCE_DIR";

/// Get the reference root directory.
///
/// Resolution order:
/// 1. `ECDS_REFERENCE_DIR` environment variable
/// 2. `reference/` directory relative to workspace root
pub fn reference_root() -> PathBuf {
    if let Ok(root) = std::env::var(REFERENCE_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../reference")
}
