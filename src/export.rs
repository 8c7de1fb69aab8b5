//! Cleaned-dataset export.
//!
//! Replaces the multi-row header stack with a single row of short names and
//! copies every data row through verbatim, cell for cell.

use anyhow::{Context, Result};
use log::info;

use crate::{cli::ExportArgs, io_utils, pipeline};

pub fn execute(args: &ExportArgs) -> Result<()> {
    let (grid, outcome) = pipeline::run_from_opts(&args.pipeline)?;
    let input_delimiter =
        io_utils::resolve_input_delimiter(&args.pipeline.input, args.pipeline.delimiter);
    let delimiter = args.output_delimiter.unwrap_or(input_delimiter);
    let mut writer = io_utils::open_csv_writer(args.output.as_deref(), delimiter)?;
    writer
        .write_record(&outcome.mapping.short_names())
        .context("Writing short-name header row")?;
    let mut written = 0usize;
    for (idx, row) in grid.rows().iter().skip(outcome.data_start_row).enumerate() {
        writer
            .write_record(row)
            .with_context(|| format!("Writing data row {}", idx + 1))?;
        written += 1;
    }
    writer.flush().context("Flushing export output")?;
    info!(
        "Exported {} data row(s) across {} column(s)",
        written,
        outcome.mapping.len()
    );
    Ok(())
}
