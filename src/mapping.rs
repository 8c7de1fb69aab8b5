//! The column mapping: the pipeline's durable output.
//!
//! Column indices are integers everywhere inside the crate; they become
//! string keys only at the JSON boundary.

use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::abbrev::fallback_name;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnNames {
    pub long_name: String,
    pub short_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    entries: BTreeMap<usize, ColumnNames>,
}

impl ColumnMapping {
    /// Zips long names with short names into one entry per column. Every
    /// column with a long name gets an entry even when the short-name vector
    /// is truncated.
    pub fn build(long_names: &[String], short_names: &[String]) -> Self {
        let entries = long_names
            .iter()
            .enumerate()
            .map(|(index, long_name)| {
                let short_name = short_names
                    .get(index)
                    .cloned()
                    .unwrap_or_else(|| fallback_name(index));
                (
                    index,
                    ColumnNames {
                        long_name: long_name.clone(),
                        short_name,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, column: usize) -> Option<&ColumnNames> {
        self.entries.get(&column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &ColumnNames)> {
        self.entries.iter().map(|(index, names)| (*index, names))
    }

    /// Short names in column order, for the cleaned-dataset header row.
    pub fn short_names(&self) -> Vec<String> {
        self.entries
            .values()
            .map(|names| names.short_name.clone())
            .collect()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("Creating mapping file {path:?}"))?;
        serde_json::to_writer_pretty(file, self).context("Writing column mapping JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening mapping file {path:?}"))?;
        let reader = BufReader::new(file);
        let mapping = serde_json::from_reader(reader).context("Parsing column mapping JSON")?;
        Ok(mapping)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Serializing column mapping JSON")
    }
}
