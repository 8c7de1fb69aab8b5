mod common;

use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;

use common::{SURVEY_CSV, TestWorkspace, delimited};

fn wrangler() -> Command {
    Command::cargo_bin("header-wrangler").expect("binary exists")
}

#[test]
fn map_writes_mapping_json_to_file() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("survey.csv", SURVEY_CSV);
    let mapping_path = workspace.path().join("mapping.json");

    wrangler()
        .args([
            "map",
            "-i",
            input.to_str().unwrap(),
            "-o",
            mapping_path.to_str().unwrap(),
            "--abbreviator",
            "none",
        ])
        .assert()
        .success();

    let raw = std::fs::read_to_string(&mapping_path).expect("mapping file");
    let mapping: Value = serde_json::from_str(&raw).expect("valid JSON");
    let entries = mapping.as_object().expect("object with string keys");
    assert_eq!(entries.len(), 5);
    assert_eq!(entries["2"]["longName"], "Q1 | Price");
    assert_eq!(entries["2"]["shortName"], "col_2");
    assert_eq!(entries["0"]["longName"], "Column_0");
}

#[test]
fn map_prints_json_to_stdout_by_default() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("survey.csv", SURVEY_CSV);

    wrangler()
        .args(["map", "-i", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("\"longName\": \"Q1 | Quality\""))
        .stdout(contains("\"shortName\""));
}

#[test]
fn map_reads_stdin_when_input_is_dash() {
    wrangler()
        .args(["map", "-i", "-", "--abbreviator", "none"])
        .write_stdin(SURVEY_CSV)
        .assert()
        .success()
        .stdout(contains("\"longName\": \"Q1 | Brand\""));
}

#[test]
fn map_honors_data_start_override() {
    // Detection would put the data start at row 1; the override pulls the
    // numeric row into the header stack instead.
    let workspace = TestWorkspace::new();
    let input = workspace.write(
        "grid.csv",
        &delimited(
            &[
                &["Section", "Section", "Detail"],
                &["1", "2", "3"],
                &["4", "5", "6"],
            ],
            ',',
        ),
    );

    wrangler()
        .args([
            "map",
            "-i",
            input.to_str().unwrap(),
            "--abbreviator",
            "none",
            "--data-start-row",
            "2",
        ])
        .assert()
        .success()
        .stdout(contains("\"longName\": \"Section | 1\""))
        .stdout(contains("\"longName\": \"Detail | 3\""));
}

#[test]
fn detect_prints_profiles_and_data_start() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("survey.csv", SURVEY_CSV);

    wrangler()
        .args(["detect", "-i", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("empty_ratio"))
        .stdout(contains("numeric_ratio"))
        .stdout(contains("Data start row: 2"));
}

#[test]
fn detect_strict_preset_skips_sparsely_numeric_rows() {
    // Second row is one-fifth numeric: data under lenient, header under strict.
    let workspace = TestWorkspace::new();
    let input = workspace.write(
        "sparse.csv",
        &delimited(
            &[
                &["", "", "Q1", "", ""],
                &["7", "a", "b", "c", "d"],
                &["1", "2", "3", "4", "5"],
            ],
            ',',
        ),
    );

    wrangler()
        .args(["detect", "-i", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Data start row: 1"));

    wrangler()
        .args([
            "detect",
            "-i",
            input.to_str().unwrap(),
            "--detection",
            "strict",
        ])
        .assert()
        .success()
        .stdout(contains("Data start row: 2"));
}

#[test]
fn config_file_overrides_detection_thresholds() {
    let workspace = TestWorkspace::new();
    let input = workspace.write(
        "sparse.csv",
        &delimited(
            &[
                &["", "", "Q1", "", ""],
                &["7", "a", "b", "c", "d"],
                &["1", "2", "3", "4", "5"],
            ],
            ',',
        ),
    );
    let config = workspace.write(
        "wrangler.yaml",
        "detection:\n  numeric_ratio_min: 0.3\n  empty_ratio_max: 0.5\n",
    );

    wrangler()
        .args([
            "detect",
            "-i",
            input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("Data start row: 2"));
}

#[test]
fn report_table_pairs_raw_and_collapsed_names() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("survey.csv", SURVEY_CSV);

    wrangler()
        .args([
            "report",
            "-i",
            input.to_str().unwrap(),
            "--abbreviator",
            "none",
        ])
        .assert()
        .success()
        .stdout(contains("raw_row_0"))
        .stdout(contains("long_name"))
        .stdout(contains("Q1 | Price"))
        .stdout(contains("col_2"));
}

#[test]
fn report_markdown_escapes_long_name_separators() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("survey.csv", SURVEY_CSV);

    wrangler()
        .args([
            "report",
            "-i",
            input.to_str().unwrap(),
            "--abbreviator",
            "none",
            "--format",
            "markdown",
        ])
        .assert()
        .success()
        .stdout(contains("Q1 \\| Price"))
        .stdout(contains("_Generated "));
}

#[test]
fn report_csv_writes_to_file() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("survey.csv", SURVEY_CSV);
    let output = workspace.path().join("report.csv");

    wrangler()
        .args([
            "report",
            "-i",
            input.to_str().unwrap(),
            "--abbreviator",
            "none",
            "--format",
            "csv",
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let contents = std::fs::read_to_string(&output).expect("report file");
    assert!(contents.lines().next().unwrap().contains("long_name"));
    assert!(contents.contains("\"Q1 | Quality\""));
    // Header row plus one row per column.
    assert_eq!(contents.lines().count(), 6);
}

#[test]
fn export_replaces_header_stack_with_short_names() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("survey.csv", SURVEY_CSV);
    let output = workspace.path().join("clean.csv");

    wrangler()
        .args([
            "export",
            "-i",
            input.to_str().unwrap(),
            "--abbreviator",
            "none",
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let contents = std::fs::read_to_string(&output).expect("export file");
    let lines = contents.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "\"col_0\",\"col_1\",\"col_2\",\"col_3\",\"col_4\""
    );
    assert_eq!(lines[1], "\"1\",\"34\",\"5\",\"4\",\"3\"");
    assert_eq!(lines[2], "\"2\",\"29\",\"3\",\"5\",\"4\"");
}

#[test]
fn export_honors_output_delimiter() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("survey.csv", SURVEY_CSV);
    let output = workspace.path().join("clean.tsv");

    wrangler()
        .args([
            "export",
            "-i",
            input.to_str().unwrap(),
            "--abbreviator",
            "none",
            "-o",
            output.to_str().unwrap(),
            "--output-delimiter",
            "tab",
        ])
        .assert()
        .success();

    let contents = std::fs::read_to_string(&output).expect("export file");
    assert!(contents.lines().next().unwrap().contains("\"col_0\"\t\"col_1\""));
}

#[test]
fn tsv_extension_switches_the_input_delimiter() {
    let workspace = TestWorkspace::new();
    let input = workspace.write(
        "survey.tsv",
        &delimited(
            &[
                &["", "Q1", "Q1"],
                &["ID", "Price", "Quality"],
                &["1", "5", "4"],
            ],
            '\t',
        ),
    );

    wrangler()
        .args(["map", "-i", input.to_str().unwrap(), "--abbreviator", "none"])
        .assert()
        .success()
        .stdout(contains("\"longName\": \"Q1 | Price\""));
}

#[test]
fn preview_limits_rows() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("survey.csv", SURVEY_CSV);

    let assert = wrangler()
        .args(["preview", "-i", input.to_str().unwrap(), "--rows", "2"])
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout");
    let data_lines = output
        .lines()
        .skip(2)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>();
    assert_eq!(data_lines.len(), 2);
    assert!(data_lines[1].contains("Price"));
}

#[test]
fn missing_input_fails_with_error() {
    wrangler()
        .args(["map", "-i", "does-not-exist.csv"])
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn remote_abbreviator_requires_url() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("survey.csv", SURVEY_CSV);

    wrangler()
        .args([
            "map",
            "-i",
            input.to_str().unwrap(),
            "--abbreviator",
            "remote",
        ])
        .assert()
        .failure()
        .stderr(contains("--abbrev-url"));
}
