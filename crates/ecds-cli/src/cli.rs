//! CLI argument definitions for `ecds`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use ecds_model::StageId;

#[derive(Parser)]
#[command(
    name = "ecds",
    version,
    about = "ECDS feature derivation - map raw attendance codes to categorical features",
    long_about = "Derive categorical features from Emergency Care Data Set extracts.\n\n\
                  Reads a CSV extract, applies the fixed sequence of categorization\n\
                  stages using manifest-pinned reference tables and writes the\n\
                  extract back out with the derived columns appended."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Derive categorical features for a CSV extract.
    Derive(DeriveArgs),

    /// List the categorization stages in execution order.
    Stages(StagesArgs),

    /// Verify a reference directory against its manifest.
    Verify(VerifyArgs),
}

#[derive(Parser)]
pub struct DeriveArgs {
    /// CSV extract with the raw ECDS columns.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output CSV path (default: <INPUT stem>_features.csv next to the input).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Reference directory (default: $ECDS_REFERENCE_DIR or the bundled tables).
    #[arg(long = "reference-dir", value_name = "DIR")]
    pub reference_dir: Option<PathBuf>,

    /// Leave a stage out of the run. May be repeated.
    #[arg(long = "skip", value_name = "STAGE", value_parser = parse_stage)]
    pub skip: Vec<StageId>,

    /// Compare raw codes exactly, without trimming whitespace.
    #[arg(long = "no-trim")]
    pub no_trim: bool,

    /// Write the per-stage report as JSON.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,
}

#[derive(Parser)]
pub struct StagesArgs {
    /// Resolve field groups and check required columns against this extract.
    #[arg(long = "input", value_name = "INPUT")]
    pub input: Option<PathBuf>,
}

#[derive(Parser)]
pub struct VerifyArgs {
    /// Reference directory (default: $ECDS_REFERENCE_DIR or the bundled tables).
    #[arg(long = "reference-dir", value_name = "DIR")]
    pub reference_dir: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_stage(value: &str) -> Result<StageId, String> {
    value.parse::<StageId>().map_err(|error| error.to_string())
}
