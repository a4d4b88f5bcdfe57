//! File-level derive flow shared by the `derive` command and its tests.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use ecds_ingest::{read_extract, write_table};
use ecds_model::{FeatureOptions, ReferenceSet};
use ecds_reference::{load_default_reference_set, verify_and_load};
use ecds_transform::FeaturePipeline;
use tracing::{info, info_span};

use crate::types::{DeriveResult, ReportDocument};

/// Suffix appended to the input file stem for the default output path.
pub const OUTPUT_SUFFIX: &str = "_features";

#[derive(Debug, Clone)]
pub struct DeriveRequest {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub reference_dir: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub options: FeatureOptions,
}

/// `<dir>/<stem>_features.csv` next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "extract".to_string());
    input.with_file_name(format!("{stem}{OUTPUT_SUFFIX}.csv"))
}

/// Load reference tables from `dir`, or the shared default set.
pub fn load_reference(dir: Option<&Path>) -> Result<Arc<ReferenceSet>> {
    match dir {
        Some(dir) => {
            let (set, summary) = verify_and_load(dir)
                .with_context(|| format!("load reference tables from {}", dir.display()))?;
            info!(
                reference_dir = %dir.display(),
                release = summary.release.as_deref().unwrap_or("unpinned"),
                files = summary.file_count,
                "reference tables loaded"
            );
            Ok(Arc::new(set))
        }
        None => load_default_reference_set().context("load default reference tables"),
    }
}

/// Read an extract, derive features and write the result.
pub fn derive_file(request: &DeriveRequest) -> Result<DeriveResult> {
    let span = info_span!("derive", input = %request.input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let reference = load_reference(request.reference_dir.as_deref())?;

    let mut df = read_extract(&request.input)
        .with_context(|| format!("read {}", request.input.display()))?;

    let report = FeaturePipeline::with_options(request.options.clone())
        .execute(&mut df, &reference)
        .with_context(|| format!("derive features for {}", request.input.display()))?;

    let output = request
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&request.input));
    write_table(&mut df, &output).with_context(|| format!("write {}", output.display()))?;

    let result = DeriveResult {
        input: request.input.clone(),
        output,
        report_path: request.report.clone(),
        reference_release: reference.release.clone(),
        report,
    };

    if let Some(path) = &result.report_path {
        write_report(&result, path)?;
    }

    info!(
        rows = result.report.rows,
        output = %result.output.display(),
        duration_ms = start.elapsed().as_millis(),
        "derive complete"
    );
    Ok(result)
}

/// Write the run report as pretty JSON.
pub fn write_report(result: &DeriveResult, path: &Path) -> Result<()> {
    let document = ReportDocument {
        generated_at: chrono::Utc::now().to_rfc3339(),
        input: &result.input,
        output: &result.output,
        reference_release: result.reference_release.as_deref(),
        report: &result.report,
    };
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &document)
        .with_context(|| format!("write report {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flush report {}", path.display()))?;
    Ok(())
}
