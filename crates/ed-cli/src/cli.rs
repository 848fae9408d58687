//! CLI argument definitions for the visit log analyzer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use ed_model::{DISCHARGE_DATE_COLUMN, DatePolicy, Feature, VISIT_DATE_COLUMN};
use ed_report::ExportFormat;

#[derive(Parser)]
#[command(
    name = "ed-analyzer",
    version,
    about = "Emergency department visit log analyzer",
    long_about = "Analyze an emergency department visit log.\n\n\
                  Reports time to discharge and parses the consultation, lab test,\n\
                  radiology and pharmacy order columns into frequencies, reply\n\
                  counts and order durations."
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

    /// Include raw order text in log events (patient data).
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze a visit log CSV file.
    Analyze(AnalyzeArgs),

    /// List the order features and how their text is parsed.
    Features,
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Visit log CSV with a header row.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Column holding the visit timestamp.
    #[arg(long = "visit-column", value_name = "COLUMN", default_value = VISIT_DATE_COLUMN)]
    pub visit_column: String,

    /// Column holding the discharge timestamp.
    #[arg(
        long = "discharge-column",
        value_name = "COLUMN",
        default_value = DISCHARGE_DATE_COLUMN
    )]
    pub discharge_column: String,

    /// Order feature to analyze; repeat for several (default: all).
    #[arg(long = "feature", value_enum, value_name = "FEATURE")]
    pub features: Vec<FeatureArg>,

    /// Override a feature's column, e.g. `pharmacy=PHARMACY`.
    #[arg(long = "feature-column", value_name = "FEATURE=COLUMN")]
    pub feature_columns: Vec<String>,

    /// What to do with order timestamps that cannot be parsed.
    #[arg(long = "date-policy", value_enum, default_value = "coerce")]
    pub date_policy: DatePolicyArg,

    /// Write the result tables to this directory.
    #[arg(long = "export-dir", value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Export format (only used with --export-dir).
    #[arg(long = "export-format", value_enum, default_value = "csv")]
    pub export_format: ExportFormatArg,

    /// Print a per-record table for each feature.
    #[arg(long = "show-records")]
    pub show_records: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FeatureArg {
    Consultations,
    LabTests,
    Radiology,
    Pharmacy,
}

impl From<FeatureArg> for Feature {
    fn from(value: FeatureArg) -> Self {
        match value {
            FeatureArg::Consultations => Feature::Consultations,
            FeatureArg::LabTests => Feature::LabTests,
            FeatureArg::Radiology => Feature::Radiology,
            FeatureArg::Pharmacy => Feature::Pharmacy,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DatePolicyArg {
    /// Unreadable timestamps become undefined durations.
    Coerce,
    /// Unreadable timestamps abort the run.
    Strict,
    /// Consultations coerce, other features abort.
    Legacy,
}

impl From<DatePolicyArg> for DatePolicy {
    fn from(value: DatePolicyArg) -> Self {
        match value {
            DatePolicyArg::Coerce => DatePolicy::Coerce,
            DatePolicyArg::Strict => DatePolicy::Strict,
            DatePolicyArg::Legacy => DatePolicy::Legacy,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormatArg {
    Csv,
    Json,
    Both,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(value: ExportFormatArg) -> Self {
        match value {
            ExportFormatArg::Csv => ExportFormat::Csv,
            ExportFormatArg::Json => ExportFormat::Json,
            ExportFormatArg::Both => ExportFormat::Both,
        }
    }
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
