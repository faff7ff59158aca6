//! `tabload preview` command implementation
//!
//! Prints the canonical items that `run` would upload, as JSON.

use super::load_dataset;
use crate::config::Config;
use crate::error::Result;
use tabload_common::types::Dataset;

pub fn run(config: &Config, limit: Option<usize>) -> Result<()> {
    let dataset = load_dataset(config)?;
    println!("{}", render(&dataset, limit)?);
    Ok(())
}

/// Pretty JSON array of the first `limit` records (all when `None`)
pub fn render(dataset: &Dataset, limit: Option<usize>) -> Result<String> {
    let records = dataset.records();
    let shown = &records[..limit.unwrap_or(records.len()).min(records.len())];
    Ok(serde_json::to_string_pretty(shown)?)
}
