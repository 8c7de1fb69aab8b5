use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about = "Normalize multi-row survey headers into clean column mappings", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full pipeline and write the column mapping as JSON
    Map(MapArgs),
    /// Profile the leading rows and print where the data starts
    Detect(DetectArgs),
    /// Compare raw header rows against collapsed and abbreviated names
    Report(ReportArgs),
    /// Write the cleaned dataset: one short-name header row plus all data rows
    Export(ExportArgs),
    /// Preview the first few rows of the raw grid in a formatted table
    Preview(PreviewArgs),
}

/// Options shared by every subcommand that runs the pipeline end to end.
#[derive(Debug, Args)]
pub struct PipelineOpts {
    /// Input workbook (.xlsx/.xlsm) or delimited text file ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Worksheet index when the input is a workbook
    #[arg(long, default_value_t = 0)]
    pub sheet: usize,
    /// Delimiter character for text inputs (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of text inputs (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Row index where data begins, skipping detection
    #[arg(long = "data-start-row")]
    pub data_start_row: Option<usize>,
    /// Detection threshold preset
    #[arg(long, value_enum)]
    pub detection: Option<DetectionPreset>,
    /// YAML file overriding detection thresholds, separator, and batch size
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Abbreviation backend for short column names
    #[arg(long, value_enum, default_value = "heuristic")]
    pub abbreviator: AbbreviatorKind,
    /// Endpoint of the remote abbreviation service
    #[arg(long = "abbrev-url")]
    pub abbrev_url: Option<String>,
    /// Columns per abbreviation request
    #[arg(long = "batch-size")]
    pub batch_size: Option<usize>,
    /// Timeout for remote abbreviation calls, in seconds
    #[arg(long = "timeout-secs")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Args)]
pub struct MapArgs {
    #[command(flatten)]
    pub pipeline: PipelineOpts,
    /// Destination for the column mapping JSON ('-' or omitted for stdout)
    #[arg(short = 'o', long = "mapping")]
    pub mapping: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DetectArgs {
    /// Input workbook (.xlsx/.xlsm) or delimited text file ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Worksheet index when the input is a workbook
    #[arg(long, default_value_t = 0)]
    pub sheet: usize,
    /// Delimiter character for text inputs (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of text inputs (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Detection threshold preset
    #[arg(long, value_enum)]
    pub detection: Option<DetectionPreset>,
    /// YAML file overriding detection thresholds
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub pipeline: PipelineOpts,
    /// Destination file ('-' or omitted for stdout)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: ReportFormat,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub pipeline: PipelineOpts,
    /// Destination CSV file ('-' or omitted for stdout)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Delimiter for the exported file (defaults to the input delimiter)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Input workbook (.xlsx/.xlsm) or delimited text file ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// Worksheet index when the input is a workbook
    #[arg(long, default_value_t = 0)]
    pub sheet: usize,
    /// Delimiter character for text inputs (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of text inputs (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum DetectionPreset {
    Lenient,
    Strict,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum AbbreviatorKind {
    Heuristic,
    Remote,
    None,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum ReportFormat {
    Table,
    Csv,
    Markdown,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
