//! Data model for ECDS feature derivation.
//!
//! - **mapping**: code-to-label value maps and unmapped-value policies
//! - **bins**: labelled numeric intervals for age
//! - **acsc**: diagnosis to ACSC category mapping with a closed vocabulary
//! - **reference**: the [`ReferenceSet`] passed into the pipeline
//! - **stage**: stage and reference table identifiers
//! - **options**: per-run [`FeatureOptions`]

pub mod acsc;
pub mod bins;
pub mod error;
pub mod mapping;
pub mod options;
pub mod reference;
pub mod stage;

pub use acsc::{AcscMapping, NOT_APPLICABLE};
pub use bins::{AgeBins, IntervalClosed};
pub use error::{ModelError, Result};
pub use mapping::{LookupOutcome, Resolution, UnmappedPolicy, ValueMap};
pub use options::FeatureOptions;
pub use reference::ReferenceSet;
pub use stage::{ReferenceTable, StageId};
