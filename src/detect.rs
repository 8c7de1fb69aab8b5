//! Header-row detection.
//!
//! Survey exports stack one or more header rows above the data. The detector
//! scans a short prefix of the grid and classifies each row by how blank and
//! how numeric it looks; the first row that is meaningfully numeric and not
//! mostly blank is taken as the start of the data.

use std::str::FromStr;

use log::{debug, info};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// Threshold pair deciding when a row counts as data. Two calibrations are
/// in circulation; `lenient` is the default and `strict` is kept as a named
/// preset for exports with sparse numeric answers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionThresholds {
    pub numeric_ratio_min: f64,
    pub empty_ratio_max: f64,
}

impl DetectionThresholds {
    pub fn lenient() -> Self {
        Self {
            numeric_ratio_min: 0.1,
            empty_ratio_max: 0.7,
        }
    }

    pub fn strict() -> Self {
        Self {
            numeric_ratio_min: 0.3,
            empty_ratio_max: 0.5,
        }
    }
}

impl Default for DetectionThresholds {
    fn default() -> Self {
        Self::lenient()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    #[serde(flatten)]
    pub thresholds: DetectionThresholds,
    /// How many leading rows to examine.
    pub scan_rows: usize,
    /// Data start assumed when no scanned row classifies as data.
    pub default_data_start: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            thresholds: DetectionThresholds::default(),
            scan_rows: 10,
            default_data_start: 2,
        }
    }
}

/// Blank/numeric profile of a single row, kept for diagnostics output.
#[derive(Debug, Clone, PartialEq)]
pub struct RowProfile {
    pub row: usize,
    pub empty_ratio: f64,
    pub numeric_ratio: f64,
    pub classified_as_data: bool,
}

pub fn is_blank(cell: &str) -> bool {
    cell.trim().is_empty()
}

/// A cell is numeric when it parses as a plain decimal number. `Decimal`
/// rejects `inf`, `nan`, and stray punctuation that `f64::from_str` lets
/// through.
pub fn is_numeric(cell: &str) -> bool {
    Decimal::from_str(cell.trim()).is_ok()
}

pub fn profile_row(row: &[String], index: usize, thresholds: &DetectionThresholds) -> RowProfile {
    if row.is_empty() {
        return RowProfile {
            row: index,
            empty_ratio: 1.0,
            numeric_ratio: 0.0,
            classified_as_data: false,
        };
    }
    let len = row.len() as f64;
    let empty = row.iter().filter(|cell| is_blank(cell)).count() as f64;
    let numeric = row.iter().filter(|cell| is_numeric(cell)).count() as f64;
    let empty_ratio = empty / len;
    let numeric_ratio = numeric / len;
    RowProfile {
        row: index,
        empty_ratio,
        numeric_ratio,
        classified_as_data: numeric_ratio > thresholds.numeric_ratio_min
            && empty_ratio < thresholds.empty_ratio_max,
    }
}

/// Profiles of the scanned prefix, in row order. Unlike
/// [`detect_data_start`], this does not stop at the first data row.
pub fn profile_rows(grid: &Grid, config: &DetectionConfig) -> Vec<RowProfile> {
    grid.rows()
        .iter()
        .take(config.scan_rows)
        .enumerate()
        .map(|(idx, row)| profile_row(row, idx, &config.thresholds))
        .collect()
}

/// Returns the index of the first data row. Pure over the grid prefix.
pub fn detect_data_start(grid: &Grid, config: &DetectionConfig) -> usize {
    for (idx, row) in grid.rows().iter().take(config.scan_rows).enumerate() {
        let profile = profile_row(row, idx, &config.thresholds);
        debug!(
            "Row {}: empty_ratio={:.2}, numeric_ratio={:.2}",
            idx, profile.empty_ratio, profile.numeric_ratio
        );
        if profile.classified_as_data {
            info!("Data starts at row {idx}");
            return idx;
        }
    }
    info!(
        "No data row found in the first {} row(s); assuming data starts at row {}",
        config.scan_rows.min(grid.row_count()),
        config.default_data_start
    );
    config.default_data_start
}
