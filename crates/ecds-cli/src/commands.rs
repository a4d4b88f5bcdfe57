use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use ecds_cli::pipeline::{DeriveRequest, derive_file};
use ecds_cli::types::DeriveResult;
use ecds_ingest::read_extract;
use ecds_model::{FeatureOptions, StageId};
use ecds_reference::{VerifySummary, reference_root, verify_and_load};
use ecds_transform::{FeaturePipeline, StageDefinition, StageInput, required_columns};
use tracing::info;

use crate::cli::{DeriveArgs, StagesArgs, VerifyArgs};
use crate::summary::{apply_table_style, dim_cell, header_cell, stage_cell};

pub fn run_derive(args: &DeriveArgs) -> Result<DeriveResult> {
    let options = FeatureOptions::new()
        .with_trim_codes(!args.no_trim)
        .with_skip(args.skip.iter().copied());
    let request = DeriveRequest {
        input: args.input.clone(),
        output: args.output.clone(),
        reference_dir: args.reference_dir.clone(),
        report: args.report.clone(),
        options,
    };
    derive_file(&request)
}

pub fn run_stages(args: &StagesArgs) -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Stage"),
        header_cell("Kind"),
        header_cell("Input"),
        header_cell("Output"),
    ]);
    apply_table_style(&mut table);

    match &args.input {
        Some(input) => {
            let df = read_extract(input).with_context(|| format!("read {}", input.display()))?;
            let plans = FeaturePipeline::new()
                .plan(&df)
                .with_context(|| format!("plan stages for {}", input.display()))?;
            for (index, plan) in plans.iter().enumerate() {
                let (inputs, outputs) = if plan.inputs.is_empty() {
                    (dim_cell("none"), dim_cell("none"))
                } else {
                    (
                        Cell::new(plan.inputs.join(", ")),
                        Cell::new(plan.outputs.join(", ")),
                    )
                };
                table.add_row(vec![
                    Cell::new(index + 1),
                    stage_cell(plan.stage.as_str()),
                    Cell::new(plan.kind.display_name()),
                    inputs,
                    outputs,
                ]);
            }
            println!("{table}");
            info!(input = %input.display(), stages = plans.len(), "stage plan resolved");
        }
        None => {
            for (index, stage) in StageId::ALL.into_iter().enumerate() {
                let definition = StageDefinition::of(stage);
                let (input, output) = match definition.input {
                    StageInput::Column(name) => (
                        name.to_string(),
                        definition
                            .output
                            .map_or_else(|| format!("{name}_cat"), str::to_string),
                    ),
                    StageInput::Group { prefix } => {
                        (format!("{prefix}_NN"), format!("{prefix}_NN_cat"))
                    }
                };
                table.add_row(vec![
                    Cell::new(index + 1),
                    stage_cell(stage.as_str()),
                    Cell::new(definition.kind.display_name()),
                    Cell::new(input),
                    Cell::new(output),
                ]);
            }
            println!("{table}");
            let mut required: Vec<&str> = Vec::new();
            for (_, column) in required_columns(&FeatureOptions::default()) {
                if !required.contains(&column) {
                    required.push(column);
                }
            }
            println!("Required columns: {}", required.join(", "));
        }
    }
    Ok(())
}

pub fn run_verify(args: &VerifyArgs) -> Result<VerifySummary> {
    let dir = args.reference_dir.clone().unwrap_or_else(reference_root);
    let (_, summary) = verify_and_load(&dir)
        .with_context(|| format!("verify reference directory {}", dir.display()))?;
    info!(
        reference_dir = %dir.display(),
        files = summary.file_count,
        "reference directory verified"
    );
    Ok(summary)
}
