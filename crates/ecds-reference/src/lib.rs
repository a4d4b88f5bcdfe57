#![deny(unsafe_code)]

//! Reference tables for ECDS feature derivation.
//!
//! A reference directory holds a `manifest.toml` pinning one CSV file per
//! role with its SHA-256. [`verify_and_load`] checks the directory and builds
//! the [`ecds_model::ReferenceSet`] the pipeline consumes.

pub mod cache;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod paths;
pub mod registry;
pub mod tables;

pub use crate::cache::load_default_reference_set;
pub use crate::error::ReferenceError;
pub use crate::paths::{REFERENCE_ENV_VAR, reference_root};
pub use crate::registry::{TableSummary, VerifySummary, required_roles, verify_and_load};
pub use crate::tables::{parse_age_bins_csv, parse_value_map_csv};
