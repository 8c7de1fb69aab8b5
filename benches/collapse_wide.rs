use criterion::{BatchSize, Criterion, criterion_group, criterion_main};

use header_wrangler::abbrev::NullAbbreviator;
use header_wrangler::collapse::{DEFAULT_SEPARATOR, collapse};
use header_wrangler::fill::fill_rows;
use header_wrangler::grid::Grid;
use header_wrangler::pipeline::{PipelineConfig, run};

/// Two-row header stack over a wide grid: a sparse question-stem row above a
/// dense sub-label row, mimicking a matrix-heavy survey export.
fn synthetic_headers(columns: usize) -> Vec<Vec<String>> {
    let mut stems = Vec::with_capacity(columns);
    let mut labels = Vec::with_capacity(columns);
    for column in 0..columns {
        stems.push(if column % 5 == 0 {
            format!("Q{}: How satisfied are you with the following", column / 5)
        } else {
            String::new()
        });
        labels.push(format!("Item {column}"));
    }
    vec![stems, labels]
}

fn synthetic_grid(columns: usize, data_rows: usize) -> Grid {
    let mut rows = synthetic_headers(columns);
    for row in 0..data_rows {
        rows.push((0..columns).map(|column| ((row + column) % 7).to_string()).collect());
    }
    Grid::new(rows).expect("synthetic grid")
}

fn bench_fill_and_collapse(c: &mut Criterion) {
    let headers = synthetic_headers(500);
    c.bench_function("fill_and_collapse_500_columns", |b| {
        b.iter_batched(
            || headers.clone(),
            |rows| {
                let filled = fill_rows(&rows);
                collapse(&filled, DEFAULT_SEPARATOR)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    let grid = synthetic_grid(500, 50);
    let config = PipelineConfig::default();
    c.bench_function("pipeline_500_columns", |b| {
        b.iter(|| run(&grid, &config, &NullAbbreviator, None))
    });
}

criterion_group!(benches, bench_fill_and_collapse, bench_full_pipeline);
criterion_main!(benches);
