//! Rightward forward-fill of header rows.
//!
//! Matrix questions put the question stem in one cell and leave the cells
//! above the remaining sub-labels blank; filling copies the last non-blank
//! value rightward so every column sees its stem.

use crate::detect::is_blank;

/// Single left-to-right pass. Non-blank cells are trimmed and become the new
/// carry value; blank cells emit the carry, which stays empty until the first
/// non-blank cell is seen.
pub fn fill_row(row: &[String]) -> Vec<String> {
    let mut filled = Vec::with_capacity(row.len());
    let mut last_seen = String::new();
    for cell in row {
        if !is_blank(cell) {
            last_seen = cell.trim().to_string();
        }
        filled.push(last_seen.clone());
    }
    filled
}

/// Fills each header row independently.
pub fn fill_rows(rows: &[Vec<String>]) -> Vec<Vec<String>> {
    rows.iter().map(|row| fill_row(row)).collect()
}
