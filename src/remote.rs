//! HTTP-backed abbreviation collaborator.
//!
//! Speaks a small JSON contract: the request carries each column's absolute
//! index and long name, the response maps absolute indices (as string keys)
//! to short names. Anything that is not a well-formed response is a
//! full-batch failure; the batching driver turns that into fallback names.

use std::{collections::HashMap, time::Duration};

use anyhow::{Context, Result, anyhow};
use log::debug;
use serde::Serialize;

use crate::abbrev::{Abbreviator, BatchEntry};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Serialize)]
struct AbbreviateRequest<'a> {
    columns: Vec<RequestColumn<'a>>,
}

#[derive(Serialize)]
struct RequestColumn<'a> {
    index: usize,
    #[serde(rename = "longName")]
    long_name: &'a str,
}

pub struct RemoteAbbreviator {
    client: reqwest::blocking::Client,
    url: String,
}

impl RemoteAbbreviator {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Building HTTP client for abbreviation service")?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl Abbreviator for RemoteAbbreviator {
    fn abbreviate(&self, batch: &[BatchEntry]) -> Result<HashMap<usize, String>> {
        let request = AbbreviateRequest {
            columns: batch
                .iter()
                .map(|entry| RequestColumn {
                    index: entry.index,
                    long_name: &entry.long_name,
                })
                .collect(),
        };
        debug!(
            "Requesting abbreviations for {} column(s) from {}",
            batch.len(),
            self.url
        );
        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .with_context(|| format!("Calling abbreviation service at {}", self.url))?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Abbreviation service returned {status}"));
        }
        let body = response
            .text()
            .context("Reading abbreviation service response")?;
        parse_response(&body)
    }
}

/// Translates the string-keyed wire response into integer-keyed results.
/// Non-JSON bodies and non-object payloads fail the whole batch; keys that
/// are not column indices are dropped and covered by per-index fallback.
fn parse_response(body: &str) -> Result<HashMap<usize, String>> {
    let raw: HashMap<String, String> =
        serde_json::from_str(body).context("Abbreviation service returned malformed JSON")?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| key.parse::<usize>().ok().map(|index| (index, value)))
        .collect())
}
