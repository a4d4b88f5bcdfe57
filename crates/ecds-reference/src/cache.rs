//! Process-lifetime cache for the default reference set.

use std::sync::{Arc, OnceLock};

use ecds_model::ReferenceSet;
use tracing::info;

use crate::error::ReferenceError;
use crate::paths::reference_root;
use crate::registry::verify_and_load;

static DEFAULT_REFERENCE: OnceLock<Arc<ReferenceSet>> = OnceLock::new();

/// Load the reference set from [`reference_root`] once and share it.
///
/// A failed load is not cached, so a later call retries.
pub fn load_default_reference_set() -> Result<Arc<ReferenceSet>, ReferenceError> {
    if let Some(set) = DEFAULT_REFERENCE.get() {
        return Ok(Arc::clone(set));
    }

    let root = reference_root();
    let (set, summary) = verify_and_load(&root)?;
    info!(
        reference_dir = %root.display(),
        release = summary.release.as_deref().unwrap_or("unpinned"),
        files = summary.file_count,
        "reference tables loaded"
    );

    // Another thread may have won the race; either value is equivalent.
    Ok(Arc::clone(DEFAULT_REFERENCE.get_or_init(|| Arc::new(set))))
}
