#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

/// A small survey export with a two-row header stack: a question stem row
/// above per-item sub-labels, then numeric answer rows.
pub const SURVEY_CSV: &str = "\
,,Q1,,
,,Price,Quality,Brand
1,34,5,4,3
2,29,3,5,4
";

/// Joins rows into delimited text without quoting, for grids whose cells
/// carry no delimiter characters.
pub fn delimited(rows: &[&[&str]], delimiter: char) -> String {
    rows.iter()
        .map(|row| row.join(&delimiter.to_string()))
        .collect::<Vec<_>>()
        .join("\n")
        + "\n"
}
