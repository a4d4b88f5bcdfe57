//! ECDS feature derivation.
//!
//! This crate turns raw ECDS attendance codes into categorical features:
//!
//! - **stage**: per-stage input/output columns and resolution kind
//! - **pipeline**: [`FeaturePipeline`] planning and execution
//! - **executors**: column-level remap, binning and ACSC lookup
//! - **report**: per-column counts returned by a run
//! - **data_utils**: raw code extraction from polars columns
//!
//! The pipeline performs no I/O; reference tables are passed in as a
//! [`ReferenceSet`](ecds_model::ReferenceSet).

pub mod data_utils;
pub mod error;
pub mod executors;
pub mod pipeline;
pub mod report;
pub mod stage;

pub use error::{Result, TransformError};
pub use pipeline::{FeaturePipeline, derive_features, required_columns};
pub use report::{ColumnReport, PipelineReport, StageReport};
pub use stage::{StageDefinition, StageInput, StageKind, StagePlan, group_columns};
