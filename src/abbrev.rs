//! Short-alias generation for collapsed long names.
//!
//! Abbreviation is an injected capability: the pipeline only knows about the
//! [`Abbreviator`] trait and the batching driver around it. A failing or
//! partial collaborator never fails the run; affected columns degrade to the
//! deterministic `col_<index>` fallback instead.

use std::collections::HashMap;

use anyhow::Result;
use heck::ToSnakeCase;
use log::{info, warn};
use regex::Regex;

pub const DEFAULT_BATCH_SIZE: usize = 25;
const MAX_SHORT_NAME_CHARS: usize = 30;

/// One column handed to the collaborator: the absolute column index and the
/// collapsed long name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub index: usize,
    pub long_name: String,
}

/// A text-summarization collaborator. The returned map is keyed by absolute
/// column index; entries may be missing, and the whole call may fail.
pub trait Abbreviator {
    fn abbreviate(&self, batch: &[BatchEntry]) -> Result<HashMap<usize, String>>;
}

/// Deterministic alias used whenever the collaborator has no answer.
pub fn fallback_name(index: usize) -> String {
    format!("col_{index}")
}

/// Drives the collaborator over fixed-size batches and guarantees one short
/// name per long name. Batch-local positions are translated to absolute
/// column indices before the batches are merged, so a failing batch only
/// degrades its own columns.
pub fn abbreviate_all(
    long_names: &[String],
    batch_size: usize,
    abbreviator: &dyn Abbreviator,
) -> Vec<String> {
    let batch_size = batch_size.max(1);
    let mut short_names = Vec::with_capacity(long_names.len());
    for (batch_index, chunk) in long_names.chunks(batch_size).enumerate() {
        let start = batch_index * batch_size;
        let entries = chunk
            .iter()
            .enumerate()
            .map(|(offset, long_name)| BatchEntry {
                index: start + offset,
                long_name: long_name.clone(),
            })
            .collect::<Vec<_>>();
        match abbreviator.abbreviate(&entries) {
            Ok(resolved) => {
                for entry in &entries {
                    match resolved.get(&entry.index) {
                        Some(short) => short_names.push(short.clone()),
                        None => {
                            warn!(
                                "No abbreviation for column {}; using fallback",
                                entry.index
                            );
                            short_names.push(fallback_name(entry.index));
                        }
                    }
                }
            }
            Err(err) => {
                warn!(
                    "Abbreviation failed for columns {}-{}: {err:#}",
                    start,
                    start + entries.len() - 1
                );
                short_names.extend(entries.iter().map(|entry| fallback_name(entry.index)));
            }
        }
    }
    info!("Abbreviated {} column name(s)", short_names.len());
    short_names
}

/// Collaborator that never answers; every column falls back.
pub struct NullAbbreviator;

impl Abbreviator for NullAbbreviator {
    fn abbreviate(&self, _batch: &[BatchEntry]) -> Result<HashMap<usize, String>> {
        Ok(HashMap::new())
    }
}

/// Offline abbreviator that condenses a long name into a `snake_case` alias.
///
/// Long names stack the question stem above the sub-label, so the most
/// specific text is at the end: the alias keeps one leading token of the stem
/// and the tail tokens of the final layer, with filler words removed.
pub struct HeuristicAbbreviator {
    word: Regex,
}

const FILLER_WORDS: &[&str] = &[
    "the", "a", "an", "of", "to", "in", "for", "and", "or", "on", "you", "your", "how", "what",
    "which", "when", "with", "do", "does", "is", "are", "per", "one", "select", "please",
    "following", "these", "this",
];

impl HeuristicAbbreviator {
    pub fn new() -> Self {
        Self {
            word: Regex::new(r"[A-Za-z0-9]+").expect("tokenizer pattern is valid"),
        }
    }

    fn keywords<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.word
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|token| !FILLER_WORDS.contains(&token.to_ascii_lowercase().as_str()))
            .collect()
    }

    fn condense(&self, long_name: &str) -> String {
        let layers = long_name
            .split('|')
            .map(str::trim)
            .filter(|layer| !layer.is_empty())
            .collect::<Vec<_>>();
        let mut tokens: Vec<&str> = Vec::new();
        if layers.len() > 1 {
            if let Some(stem_token) = self.keywords(layers[0]).into_iter().next() {
                tokens.push(stem_token);
            }
        }
        if let Some(last) = layers.last() {
            tokens.extend(self.keywords(last).into_iter().take(2));
        }
        let alias = tokens.join("_").to_snake_case();
        alias.chars().take(MAX_SHORT_NAME_CHARS).collect()
    }
}

impl Default for HeuristicAbbreviator {
    fn default() -> Self {
        Self::new()
    }
}

impl Abbreviator for HeuristicAbbreviator {
    fn abbreviate(&self, batch: &[BatchEntry]) -> Result<HashMap<usize, String>> {
        let mut resolved = HashMap::with_capacity(batch.len());
        let mut taken: HashMap<String, usize> = HashMap::new();
        for entry in batch {
            let mut alias = self.condense(&entry.long_name);
            if alias.is_empty() {
                // Leave the entry unresolved; the driver substitutes the fallback.
                continue;
            }
            if taken.contains_key(&alias) {
                alias = format!("{alias}_{}", entry.index);
            }
            taken.insert(alias.clone(), entry.index);
            resolved.insert(entry.index, alias);
        }
        Ok(resolved)
    }
}
