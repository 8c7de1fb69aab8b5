pub mod abbrev;
pub mod cli;
pub mod collapse;
pub mod detect;
pub mod export;
pub mod fill;
pub mod grid;
pub mod io_utils;
pub mod mapping;
pub mod pipeline;
pub mod remote;
pub mod report;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, info};

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("header_wrangler", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Map(args) => handle_map(&args),
        Commands::Detect(args) => handle_detect(&args),
        Commands::Report(args) => report::execute(&args),
        Commands::Export(args) => export::execute(&args),
        Commands::Preview(args) => handle_preview(&args),
    }
}

fn handle_map(args: &cli::MapArgs) -> Result<()> {
    let (_, outcome) = pipeline::run_from_opts(&args.pipeline)?;
    match args.mapping.as_deref() {
        Some(path) if !io_utils::is_dash(path) => {
            outcome.mapping.save(path)?;
            info!(
                "Column mapping for {} column(s) written to {:?}",
                outcome.mapping.len(),
                path
            );
        }
        _ => println!("{}", outcome.mapping.to_json_string()?),
    }
    Ok(())
}

fn handle_detect(args: &cli::DetectArgs) -> Result<()> {
    let grid = grid::load_grid(
        &args.input,
        args.sheet,
        args.delimiter,
        args.input_encoding.as_deref(),
    )?;
    let config = pipeline::resolve_detection_config(args.config.as_deref(), args.detection)?;
    let profiles = detect::profile_rows(&grid, &config);
    let headers = ["row", "empty_ratio", "numeric_ratio", "class"]
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    let rows = profiles
        .iter()
        .map(|profile| {
            vec![
                profile.row.to_string(),
                format!("{:.2}", profile.empty_ratio),
                format!("{:.2}", profile.numeric_ratio),
                if profile.classified_as_data {
                    "data".to_string()
                } else {
                    "header".to_string()
                },
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
    let data_start = detect::detect_data_start(&grid, &config);
    println!("Data start row: {data_start}");
    Ok(())
}

fn handle_preview(args: &cli::PreviewArgs) -> Result<()> {
    let grid = grid::load_grid(
        &args.input,
        args.sheet,
        args.delimiter,
        args.input_encoding.as_deref(),
    )?;
    let headers = (0..grid.column_count())
        .map(|column| column.to_string())
        .collect::<Vec<_>>();
    let rows = grid
        .rows()
        .iter()
        .take(args.rows)
        .cloned()
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
    info!("Displayed {} row(s) from {:?}", rows.len(), args.input);
    Ok(())
}
