//! The header-normalization pipeline.
//!
//! Strictly linear: detect the header rows, forward-fill them, collapse the
//! stack into long names, abbreviate, build the mapping. Each stage consumes
//! its predecessor's output whole; the only call that may block is the
//! abbreviation collaborator, and its failures degrade to fallback names
//! instead of aborting the run.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    abbrev::{self, Abbreviator, DEFAULT_BATCH_SIZE, HeuristicAbbreviator, NullAbbreviator},
    cli::{AbbreviatorKind, DetectionPreset, PipelineOpts},
    collapse::{self, DEFAULT_SEPARATOR},
    detect::{self, DetectionConfig, DetectionThresholds},
    fill,
    grid::{self, Grid},
    mapping::ColumnMapping,
    remote::{DEFAULT_TIMEOUT_SECS, RemoteAbbreviator},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub detection: DetectionConfig,
    pub separator: String,
    pub batch_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            detection: DetectionConfig::default(),
            separator: DEFAULT_SEPARATOR.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            fs::read_to_string(path).with_context(|| format!("Opening config file {path:?}"))?;
        serde_yaml::from_str(&raw).with_context(|| format!("Parsing config file {path:?}"))
    }
}

/// Everything a pipeline run produces. The mapping is the durable output;
/// the intermediates are kept for reporting.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub data_start_row: usize,
    pub filled_headers: Vec<Vec<String>>,
    pub long_names: Vec<String>,
    pub mapping: ColumnMapping,
}

/// Runs the full pipeline over an in-memory grid. `data_start_override`
/// skips detection when the caller already knows where data begins.
pub fn run(
    grid: &Grid,
    config: &PipelineConfig,
    abbreviator: &dyn Abbreviator,
    data_start_override: Option<usize>,
) -> PipelineOutcome {
    let data_start_row = data_start_override
        .unwrap_or_else(|| detect::detect_data_start(grid, &config.detection));
    let header_end = data_start_row.min(grid.row_count());
    let filled_headers = fill::fill_rows(&grid.rows()[..header_end]);
    let long_names = collapse::collapse(&filled_headers, &config.separator);
    info!(
        "Collapsed {} header row(s) into {} long name(s)",
        filled_headers.len(),
        long_names.len()
    );
    let short_names = abbrev::abbreviate_all(&long_names, config.batch_size, abbreviator);
    let mapping = ColumnMapping::build(&long_names, &short_names);
    PipelineOutcome {
        data_start_row,
        filled_headers,
        long_names,
        mapping,
    }
}

fn preset_thresholds(preset: DetectionPreset) -> DetectionThresholds {
    match preset {
        DetectionPreset::Lenient => DetectionThresholds::lenient(),
        DetectionPreset::Strict => DetectionThresholds::strict(),
    }
}

/// Resolves layered configuration: built-in defaults, then the YAML file,
/// then individual command-line flags.
pub fn resolve_config(opts: &PipelineOpts) -> Result<PipelineConfig> {
    let mut config = match &opts.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(preset) = opts.detection {
        config.detection.thresholds = preset_thresholds(preset);
    }
    if let Some(batch_size) = opts.batch_size {
        config.batch_size = batch_size;
    }
    Ok(config)
}

/// Detection-only slice of the layered configuration, for subcommands that
/// never reach the abbreviation stage.
pub fn resolve_detection_config(
    config: Option<&Path>,
    preset: Option<DetectionPreset>,
) -> Result<DetectionConfig> {
    let file = match config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    let mut detection = file.detection;
    if let Some(preset) = preset {
        detection.thresholds = preset_thresholds(preset);
    }
    Ok(detection)
}

pub fn build_abbreviator(opts: &PipelineOpts) -> Result<Box<dyn Abbreviator>> {
    match opts.abbreviator {
        AbbreviatorKind::Heuristic => Ok(Box::new(HeuristicAbbreviator::new())),
        AbbreviatorKind::None => Ok(Box::new(NullAbbreviator)),
        AbbreviatorKind::Remote => {
            let url = opts
                .abbrev_url
                .as_deref()
                .context("--abbrev-url is required with --abbreviator remote")?;
            let timeout = Duration::from_secs(opts.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
            Ok(Box::new(RemoteAbbreviator::new(url, timeout)?))
        }
    }
}

/// Shared subcommand glue: load the grid, resolve configuration, run.
pub fn run_from_opts(opts: &PipelineOpts) -> Result<(Grid, PipelineOutcome)> {
    let grid = grid::load_grid(
        &opts.input,
        opts.sheet,
        opts.delimiter,
        opts.input_encoding.as_deref(),
    )?;
    let config = resolve_config(opts)?;
    let abbreviator = build_abbreviator(opts)?;
    let outcome = run(&grid, &config, abbreviator.as_ref(), opts.data_start_row);
    Ok((grid, outcome))
}
