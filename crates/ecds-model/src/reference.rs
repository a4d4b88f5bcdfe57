//! The reference set handed to the feature pipeline.

use std::collections::BTreeMap;

use crate::acsc::AcscMapping;
use crate::bins::AgeBins;
use crate::mapping::ValueMap;
use crate::stage::ReferenceTable;

/// Every lookup table the pipeline needs, loaded once and shared read-only.
#[derive(Debug, Clone)]
pub struct ReferenceSet {
    /// Release label pinned by the reference manifest, if any.
    pub release: Option<String>,
    age_bins: AgeBins,
    acsc: AcscMapping,
    maps: BTreeMap<ReferenceTable, ValueMap>,
}

impl ReferenceSet {
    pub fn new(age_bins: AgeBins, acsc: AcscMapping) -> Self {
        Self {
            release: None,
            age_bins,
            acsc,
            maps: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_map(mut self, table: ReferenceTable, map: ValueMap) -> Self {
        self.insert_map(table, map);
        self
    }

    #[must_use]
    pub fn with_release(mut self, release: impl Into<String>) -> Self {
        self.release = Some(release.into());
        self
    }

    pub fn insert_map(&mut self, table: ReferenceTable, map: ValueMap) {
        self.maps.insert(table, map);
    }

    pub fn value_map(&self, table: ReferenceTable) -> Option<&ValueMap> {
        self.maps.get(&table)
    }

    pub fn age_bins(&self) -> &AgeBins {
        &self.age_bins
    }

    pub fn acsc(&self) -> &AcscMapping {
        &self.acsc
    }

    /// Value maps that have not been supplied.
    pub fn missing_tables(&self) -> Vec<ReferenceTable> {
        ReferenceTable::ALL
            .into_iter()
            .filter(|table| !self.maps.contains_key(table))
            .collect()
    }
}
