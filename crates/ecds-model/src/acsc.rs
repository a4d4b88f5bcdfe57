//! Ambulatory Care Sensitive Condition (ACSC) mapping.
//!
//! Diagnosis codes are mapped to ACSC categories. The set of categories the
//! table can produce is a closed vocabulary: anything else, including raw
//! codes that have no entry, resolves to [`NOT_APPLICABLE`].

use std::collections::BTreeSet;

use crate::mapping::{LookupOutcome, Resolution, ValueMap};

/// Marker for diagnoses that are not an ACSC.
pub const NOT_APPLICABLE: &str = "-";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcscMapping {
    codes: ValueMap,
    categories: BTreeSet<String>,
}

impl AcscMapping {
    pub fn new(codes: ValueMap) -> Self {
        let categories = codes.labels().into_iter().map(String::from).collect();
        Self { codes, categories }
    }

    pub fn codes(&self) -> &ValueMap {
        &self.codes
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    pub fn is_category(&self, label: &str) -> bool {
        self.categories.contains(label)
    }

    /// Map a diagnosis code and enforce the closed vocabulary.
    pub fn categorize(&self, raw: Option<&str>) -> Resolution {
        let Some(code) = raw else {
            return Resolution {
                value: Some(NOT_APPLICABLE.to_string()),
                outcome: LookupOutcome::Missing,
            };
        };

        let (candidate, outcome) = match self.codes.get(code) {
            Some(category) => (category, LookupOutcome::Mapped),
            None => (code, LookupOutcome::Unmapped),
        };

        let value = if self.is_category(candidate) {
            candidate.to_string()
        } else {
            NOT_APPLICABLE.to_string()
        };

        Resolution {
            value: Some(value),
            outcome,
        }
    }
}
