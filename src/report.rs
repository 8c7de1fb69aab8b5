//! Per-column comparison report.
//!
//! Shows, side by side, what each column looked like before and after
//! normalization: the raw header-row cells, the collapsed long name, and the
//! abbreviated short name. Downstream of the pipeline; nothing here feeds
//! back into the mapping.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use chrono::Local;
use log::info;

use crate::{
    cli::{ReportArgs, ReportFormat},
    grid::Grid,
    io_utils,
    pipeline::{self, PipelineOutcome},
    table,
};

/// Raw header rows shown per column; deeper stacks are truncated in the
/// report but still contribute to the long name.
pub const MAX_RAW_HEADER_ROWS: usize = 4;

pub fn execute(args: &ReportArgs) -> Result<()> {
    let (grid, outcome) = pipeline::run_from_opts(&args.pipeline)?;
    let (headers, rows) = comparison_rows(&grid, &outcome);
    match args.format {
        ReportFormat::Table => {
            io_utils::write_text(args.output.as_deref(), &table::render_table(&headers, &rows))?;
        }
        ReportFormat::Csv => {
            let mut writer =
                io_utils::open_csv_writer(args.output.as_deref(), io_utils::DEFAULT_CSV_DELIMITER)?;
            writer.write_record(&headers).context("Writing report header")?;
            for row in &rows {
                writer.write_record(row).context("Writing report row")?;
            }
            writer.flush().context("Flushing report output")?;
        }
        ReportFormat::Markdown => {
            io_utils::write_text(args.output.as_deref(), &render_markdown(&headers, &rows))?;
        }
    }
    info!("Reported on {} column(s)", rows.len());
    Ok(())
}

/// One report row per mapped column: index, raw header cells top to bottom,
/// long name, short name. Raw cells come from the unfilled grid so the
/// report shows what the export actually contained.
pub fn comparison_rows(grid: &Grid, outcome: &PipelineOutcome) -> (Vec<String>, Vec<Vec<String>>) {
    let header_row_count = outcome.filled_headers.len().min(MAX_RAW_HEADER_ROWS);
    let mut headers = vec!["#".to_string()];
    for row in 0..header_row_count {
        headers.push(format!("raw_row_{row}"));
    }
    headers.push("long_name".to_string());
    headers.push("short_name".to_string());

    let rows = outcome
        .mapping
        .iter()
        .map(|(column, names)| {
            let mut row = Vec::with_capacity(header_row_count + 3);
            row.push(column.to_string());
            for header_row in 0..header_row_count {
                row.push(grid.cell(header_row, column).to_string());
            }
            row.push(names.long_name.clone());
            row.push(names.short_name.clone());
            row
        })
        .collect();
    (headers, rows)
}

fn render_markdown(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "| {} |", headers.iter().map(|h| escape_cell(h)).collect::<Vec<_>>().join(" | "));
    let _ = writeln!(
        output,
        "|{}|",
        headers.iter().map(|_| " --- ").collect::<Vec<_>>().join("|")
    );
    for row in rows {
        let _ = writeln!(
            output,
            "| {} |",
            row.iter().map(|cell| escape_cell(cell)).collect::<Vec<_>>().join(" | ")
        );
    }
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "_Generated {}_",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    output
}

/// Long names embed the `" | "` separator, which would break table cells.
fn escape_cell(value: &str) -> String {
    value
        .chars()
        .map(|ch| match ch {
            '\n' | '\r' => ' ',
            other => other,
        })
        .collect::<String>()
        .replace('|', "\\|")
}
