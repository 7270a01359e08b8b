//! CLI argument definitions for the EDC importer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "edc-import",
    version,
    about = "EDC Import Studio - reconcile spreadsheet data with form schemas",
    long_about = "Ingest form-schema documents, match spreadsheet columns to declared\n\
                  fields, validate mappings, and import rows with per-row quality scoring."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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

    /// Store snapshot file holding projects, forms, and imported records.
    #[arg(
        long = "store",
        value_name = "PATH",
        default_value = "edc-store.json",
        global = true
    )]
    pub store: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Ingest a form-schema document (JSON). Idempotent by content hash.
    Ingest(IngestArgs),

    /// List ingested projects with their forms.
    Projects,

    /// List the column headers of a spreadsheet (CSV) file.
    Columns(ColumnsArgs),

    /// Suggest column-to-field mappings for a form.
    Suggest(SuggestArgs),

    /// Validate a mapping file against a form's declared fields.
    Validate(ValidateArgs),

    /// Import spreadsheet rows into a form using a validated mapping.
    Import(ImportArgs),
}

#[derive(Parser)]
pub struct IngestArgs {
    /// Path to the schema document.
    #[arg(value_name = "SCHEMA_JSON")]
    pub schema: PathBuf,
}

#[derive(Parser)]
pub struct ColumnsArgs {
    /// Path to the spreadsheet (CSV) file.
    #[arg(value_name = "DATA_CSV")]
    pub data: PathBuf,
}

#[derive(Parser)]
pub struct SuggestArgs {
    /// Target form id.
    #[arg(long = "form", value_name = "FORM_ID")]
    pub form_id: u64,

    /// Path to the spreadsheet (CSV) file whose columns to match.
    #[arg(value_name = "DATA_CSV")]
    pub data: PathBuf,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Target form id.
    #[arg(long = "form", value_name = "FORM_ID")]
    pub form_id: u64,

    /// Mapping file: JSON object of column name to field name.
    #[arg(value_name = "MAPPING_JSON")]
    pub mapping: PathBuf,
}

#[derive(Parser)]
pub struct ImportArgs {
    /// Target form id.
    #[arg(long = "form", value_name = "FORM_ID")]
    pub form_id: u64,

    /// Mapping file: JSON object of column name to field name.
    #[arg(long = "mapping", value_name = "MAPPING_JSON")]
    pub mapping: PathBuf,

    /// Path to the spreadsheet (CSV) file to import.
    #[arg(value_name = "DATA_CSV")]
    pub data: PathBuf,
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
