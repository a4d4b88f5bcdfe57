//! The feature pipeline: stage planning and execution.
//!
//! A run has two phases. [`FeaturePipeline::plan`] resolves every enabled
//! stage against the input frame and fails on the first missing column.
//! [`FeaturePipeline::execute`] then runs the stages in order on a working
//! copy, which replaces the caller's frame only once every stage succeeded.

use std::collections::BTreeMap;
use std::time::Instant;

use ecds_model::{FeatureOptions, ReferenceSet, StageId};
use polars::prelude::DataFrame;
use tracing::{debug, debug_span, info, info_span};

use crate::error::{Result, TransformError};
use crate::executors::{acsc_column, bin_column, remap_column};
use crate::report::{PipelineReport, StageReport};
use crate::stage::{StageDefinition, StageInput, StageKind, StagePlan};

/// Runs the categorization stages in their fixed order.
#[derive(Debug, Clone, Default)]
pub struct FeaturePipeline {
    options: FeatureOptions,
}

impl FeaturePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: FeatureOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FeatureOptions {
        &self.options
    }

    /// Enabled stages in execution order.
    pub fn stages(&self) -> impl Iterator<Item = StageId> + '_ {
        StageId::ALL
            .into_iter()
            .filter(|stage| self.options.is_enabled(*stage))
    }

    /// Resolve every enabled stage against `df`.
    ///
    /// Fails with [`TransformError::MissingColumn`] for the first absent
    /// input column, or [`TransformError::ColumnConflict`] if a stage would
    /// write a column another stage reads or writes.
    pub fn plan(&self, df: &DataFrame) -> Result<Vec<StagePlan>> {
        let plans = self
            .stages()
            .map(|stage| StageDefinition::of(stage).resolve(df))
            .collect::<Result<Vec<_>>>()?;
        check_column_independence(&plans)?;
        Ok(plans)
    }

    /// Append the derived columns to `df`.
    ///
    /// On error `df` is left exactly as it was passed in.
    pub fn execute(&self, df: &mut DataFrame, reference: &ReferenceSet) -> Result<PipelineReport> {
        let span = info_span!("features", rows = df.height());
        let _guard = span.enter();
        let start = Instant::now();

        let plans = self.plan(df)?;
        check_references(&plans, reference)?;

        let mut working = df.clone();
        let mut report = PipelineReport {
            rows: working.height(),
            stages: Vec::with_capacity(plans.len()),
            skipped: self.options.skip.iter().copied().collect(),
        };

        for plan in &plans {
            let stage_report = debug_span!("stage", stage = %plan.stage)
                .in_scope(|| self.run_stage(&mut working, plan, reference))?;
            report.stages.push(stage_report);
        }

        *df = working;
        info!(
            stages = report.stages.len(),
            skipped = report.skipped.len(),
            derived_columns = report.derived_columns().len(),
            unmapped = report.total_unmapped(),
            duration_ms = start.elapsed().as_millis(),
            "feature derivation complete"
        );
        Ok(report)
    }

    fn run_stage(
        &self,
        df: &mut DataFrame,
        plan: &StagePlan,
        reference: &ReferenceSet,
    ) -> Result<StageReport> {
        let start = Instant::now();
        let trim = self.options.trim_codes;

        if plan.inputs.is_empty() {
            debug!(stage = %plan.stage, "field group has no columns");
        }

        let mut columns = Vec::with_capacity(plan.inputs.len());
        for (source, target) in plan.column_pairs() {
            let column = match &plan.kind {
                StageKind::Binned => bin_column(df, source, target, reference.age_bins())?,
                StageKind::Acsc => acsc_column(df, source, target, reference.acsc(), trim)?,
                StageKind::Remap { table, policy } => {
                    let map = reference.value_map(*table).ok_or(
                        TransformError::MissingReference {
                            stage: plan.stage,
                            table: *table,
                        },
                    )?;
                    remap_column(df, source, target, map, policy, trim)?
                }
            };
            debug!(
                stage = %plan.stage,
                source = %column.source,
                target = %column.target,
                mapped = column.mapped,
                unmapped = column.unmapped,
                missing_input = column.missing_input,
                null_output = column.null_output,
                "column derived"
            );
            columns.push(column);
        }

        debug!(
            stage = %plan.stage,
            columns = columns.len(),
            duration_ms = start.elapsed().as_millis(),
            "stage complete"
        );

        Ok(StageReport {
            stage: plan.stage,
            kind: plan.kind.display_name(),
            columns,
        })
    }
}

/// Run every stage with default options.
pub fn derive_features(df: &mut DataFrame, reference: &ReferenceSet) -> Result<PipelineReport> {
    FeaturePipeline::new().execute(df, reference)
}

fn check_references(plans: &[StagePlan], reference: &ReferenceSet) -> Result<()> {
    for plan in plans {
        if let StageKind::Remap { table, .. } = &plan.kind
            && reference.value_map(*table).is_none()
        {
            return Err(TransformError::MissingReference {
                stage: plan.stage,
                table: *table,
            });
        }
    }
    Ok(())
}

/// Derived columns must be written by exactly one stage and read by none.
fn check_column_independence(plans: &[StagePlan]) -> Result<()> {
    let mut writers: BTreeMap<&str, StageId> = BTreeMap::new();
    for plan in plans {
        for output in &plan.outputs {
            if let Some(first) = writers.insert(output.as_str(), plan.stage) {
                return Err(TransformError::ColumnConflict {
                    column: output.clone(),
                    first,
                    second: plan.stage,
                });
            }
        }
    }
    for plan in plans {
        for input in &plan.inputs {
            if let Some(writer) = writers.get(input.as_str()) {
                return Err(TransformError::ColumnConflict {
                    column: input.clone(),
                    first: *writer,
                    second: plan.stage,
                });
            }
        }
    }
    Ok(())
}

/// Named raw columns the enabled stages require. Field groups are optional
/// and therefore not listed.
pub fn required_columns(options: &FeatureOptions) -> Vec<(StageId, &'static str)> {
    StageId::ALL
        .into_iter()
        .filter(|stage| options.is_enabled(*stage))
        .filter_map(|stage| match StageDefinition::of(stage).input {
            StageInput::Column(name) => Some((stage, name)),
            StageInput::Group { .. } => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_definitions_are_column_independent() {
        let plans: Vec<StagePlan> = StageId::ALL
            .into_iter()
            .map(|stage| {
                let def = StageDefinition::of(stage);
                let inputs = match def.input {
                    StageInput::Column(name) => vec![name.to_string()],
                    StageInput::Group { prefix } => vec![format!("{prefix}_01")],
                };
                let outputs = match def.output {
                    Some(output) => vec![output.to_string()],
                    None => inputs.iter().map(|i| format!("{i}_cat")).collect(),
                };
                StagePlan {
                    stage,
                    kind: def.kind,
                    inputs,
                    outputs,
                }
            })
            .collect();
        assert!(check_column_independence(&plans).is_ok());
    }

    #[test]
    fn duplicate_writer_is_a_conflict() {
        let plan = |stage| StagePlan {
            stage,
            kind: StageKind::Acsc,
            inputs: vec!["eddiag_01".to_string()],
            outputs: vec!["eddiag_01_acsc".to_string()],
        };
        let err = check_column_independence(&[plan(StageId::Acsc), plan(StageId::Gender)])
            .unwrap_err();
        assert!(matches!(err, TransformError::ColumnConflict { .. }));
    }

    #[test]
    fn skipped_stages_drop_out_of_required_columns() {
        let options = FeatureOptions::new().with_skip([StageId::Gender]);
        let required = required_columns(&options);
        assert!(required.iter().all(|(stage, _)| *stage != StageId::Gender));
        assert!(required.contains(&(StageId::Age, "activage")));
    }
}
