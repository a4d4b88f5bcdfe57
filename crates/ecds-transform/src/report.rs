//! Per-run accounting of what each stage did to each column.

use ecds_model::{LookupOutcome, Resolution, StageId};
use serde::Serialize;

/// Counts for one derived column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnReport {
    pub source: String,
    pub target: String,
    pub rows: usize,
    /// Values found in the reference table.
    pub mapped: usize,
    /// Non-null values absent from the reference table.
    pub unmapped: usize,
    /// Null input cells.
    pub missing_input: usize,
    /// Null output cells.
    pub null_output: usize,
}

impl ColumnReport {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            ..Self::default()
        }
    }

    /// Count one resolved cell.
    pub fn record(&mut self, resolution: &Resolution) {
        self.rows += 1;
        match resolution.outcome {
            LookupOutcome::Mapped => self.mapped += 1,
            LookupOutcome::Unmapped => self.unmapped += 1,
            LookupOutcome::Missing => self.missing_input += 1,
        }
        if resolution.value.is_none() {
            self.null_output += 1;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: StageId,
    pub kind: String,
    pub columns: Vec<ColumnReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub rows: usize,
    pub stages: Vec<StageReport>,
    pub skipped: Vec<StageId>,
}

impl PipelineReport {
    /// Names of every column the run wrote, in write order.
    pub fn derived_columns(&self) -> Vec<&str> {
        self.stages
            .iter()
            .flat_map(|stage| stage.columns.iter().map(|c| c.target.as_str()))
            .collect()
    }

    pub fn stage(&self, stage: StageId) -> Option<&StageReport> {
        self.stages.iter().find(|report| report.stage == stage)
    }

    /// Total unmapped values across all stages.
    pub fn total_unmapped(&self) -> usize {
        self.stages
            .iter()
            .flat_map(|stage| &stage.columns)
            .map(|column| column.unmapped)
            .sum()
    }
}
