//! Raw spreadsheet grid model and loaders.
//!
//! A [`Grid`] is a row-major rectangle of string cells. Missing and `NaN`
//! style cells are normalized to the empty string at load time so every
//! downstream stage can treat "blank" uniformly. The grid is never mutated
//! after loading; pipeline stages copy what they transform.

use std::path::Path;

use anyhow::{Context, Result};
use calamine::{DataType, Reader, Xlsx, open_workbook};
use encoding_rs::Encoding;
use log::info;
use thiserror::Error;

use crate::io_utils;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("input grid contains no rows")]
    Empty,
    #[error("input grid contains no columns")]
    NoColumns,
    #[error("workbook has no sheet at index {0}")]
    MissingSheet(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    /// Validates and wraps raw rows. Rows of unequal length are accepted;
    /// cells beyond a row's end read as empty.
    pub fn new(rows: Vec<Vec<String>>) -> Result<Self, GridError> {
        if rows.is_empty() {
            return Err(GridError::Empty);
        }
        if rows.iter().all(|row| row.is_empty()) {
            return Err(GridError::NoColumns);
        }
        Ok(Self { rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row length; shorter rows are padded conceptually, not in memory.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Loads a grid from `path`, dispatching on the file extension: `.xlsx` and
/// `.xlsm` go through calamine, everything else is read as delimited text.
pub fn load_grid(
    path: &Path,
    sheet: usize,
    delimiter: Option<u8>,
    encoding_label: Option<&str>,
) -> Result<Grid> {
    let is_workbook = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xlsm")
    );
    let grid = if is_workbook {
        load_excel_grid(path, sheet)?
    } else {
        let delimiter = io_utils::resolve_input_delimiter(path, delimiter);
        let encoding = io_utils::resolve_encoding(encoding_label)?;
        load_delimited_grid(path, delimiter, encoding)?
    };
    info!(
        "Loaded grid from {:?}: {} row(s), {} column(s)",
        path,
        grid.row_count(),
        grid.column_count()
    );
    Ok(grid)
}

pub fn load_delimited_grid(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<Grid> {
    let mut reader = io_utils::open_raw_csv_reader(path, delimiter)?;
    let mut rows = Vec::new();
    for (idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", idx + 1))?;
        rows.push(io_utils::decode_record(&record, encoding)?);
    }
    Ok(Grid::new(rows)?)
}

pub fn load_excel_grid(path: &Path, sheet: usize) -> Result<Grid> {
    let mut workbook: Xlsx<_> =
        open_workbook(path).with_context(|| format!("Opening workbook {path:?}"))?;
    let range = workbook
        .worksheet_range_at(sheet)
        .ok_or(GridError::MissingSheet(sheet))?
        .with_context(|| format!("Reading sheet {sheet} of {path:?}"))?;
    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    Ok(Grid::new(rows)?)
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::Empty | DataType::Error(_) => String::new(),
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) | DataType::DateTime(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        DataType::Bool(b) => b.to_string(),
    }
}
