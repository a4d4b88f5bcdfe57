//! Options controlling a feature derivation run.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::stage::StageId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureOptions {
    /// Trim surrounding whitespace from raw codes before lookup.
    #[serde(default = "default_trim_codes")]
    pub trim_codes: bool,

    /// Stages to leave out of the run.
    #[serde(default)]
    pub skip: BTreeSet<StageId>,
}

fn default_trim_codes() -> bool {
    true
}

impl Default for FeatureOptions {
    fn default() -> Self {
        Self {
            trim_codes: true,
            skip: BTreeSet::new(),
        }
    }
}

impl FeatureOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_trim_codes(mut self, enable: bool) -> Self {
        self.trim_codes = enable;
        self
    }

    #[must_use]
    pub fn with_skip<I>(mut self, stages: I) -> Self
    where
        I: IntoIterator<Item = StageId>,
    {
        self.skip.extend(stages);
        self
    }

    pub fn is_enabled(&self, stage: StageId) -> bool {
        !self.skip.contains(&stage)
    }
}
