use std::path::PathBuf;

use ecds_transform::PipelineReport;
use serde::Serialize;

#[derive(Debug)]
pub struct DeriveResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub report_path: Option<PathBuf>,
    pub reference_release: Option<String>,
    pub report: PipelineReport,
}

/// JSON document written by `derive --report`.
#[derive(Debug, Serialize)]
pub struct ReportDocument<'a> {
    pub generated_at: String,
    pub input: &'a PathBuf,
    pub output: &'a PathBuf,
    pub reference_release: Option<&'a str>,
    #[serde(flatten)]
    pub report: &'a PipelineReport,
}
