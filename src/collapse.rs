//! Collapsing the filled header stack into one long name per column.

use itertools::Itertools;

use crate::detect::is_blank;

pub const DEFAULT_SEPARATOR: &str = " | ";

/// Synthesized name for columns no header row contributes to.
pub fn placeholder_name(column: usize) -> String {
    format!("Column_{column}")
}

/// One long name per column `0..max(row lengths)`. Per column the filled
/// values are collected top to bottom, deduplicated preserving first
/// occurrence (forward-fill repeats the same stem across rows), and joined
/// with `separator`. Columns with no non-blank contribution get the
/// `Column_<index>` placeholder.
pub fn collapse(filled_rows: &[Vec<String>], separator: &str) -> Vec<String> {
    let column_count = filled_rows.iter().map(Vec::len).max().unwrap_or(0);
    (0..column_count)
        .map(|column| {
            let joined = filled_rows
                .iter()
                .filter_map(|row| row.get(column))
                .filter(|cell| !is_blank(cell))
                .map(String::as_str)
                .unique()
                .join(separator);
            if joined.is_empty() {
                placeholder_name(column)
            } else {
                joined
            }
        })
        .collect()
}
