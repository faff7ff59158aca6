//! `tabload run` command implementation
//!
//! Normalize → authenticate → upload every batch → validate.

use super::{connect, load_dataset, with_deadline};
use crate::config::Config;
use crate::error::{CliError, Result, Stage, StageExt};
use crate::pipeline::upload::batch_count;
use crate::pipeline::{BatchUploader, PopulationValidator};
use crate::progress;
use colored::Colorize;
use tracing::info;

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub collection: String,
    pub records: usize,
    pub batches: usize,
}

/// Run the full pipeline against `collection`
pub async fn run(config: &Config, collection: &str) -> Result<RunReport> {
    let dataset = load_dataset(config)?;
    let batch_size = config.batch_size()?;

    let report = with_deadline(config.pipeline_timeout(), async {
        let (client, token) = connect(config, collection).await?;

        println!(
            "{} Uploading {} record(s) to '{}'...",
            "→".cyan(),
            dataset.len(),
            collection
        );

        let pb = progress::create_batch_progress(
            batch_count(dataset.len(), batch_size) as u64,
            "Uploading batches",
        );
        let summary = BatchUploader::new(&client, &token, batch_size)
            .with_progress(pb)
            .upload(collection, &dataset)
            .await
            .in_stage(Stage::Upload)?;

        println!(
            "{} Uploaded {} record(s) in {} batch(es)",
            "✓".green(),
            summary.records,
            summary.batches
        );

        let spinner = progress::create_spinner("Validating remote collection...");
        let validation = PopulationValidator::new(&client, &token)
            .validate(collection, &dataset)
            .await;
        spinner.finish_and_clear();
        validation.in_stage(Stage::Validate)?;

        Ok::<_, CliError>(RunReport {
            collection: collection.to_string(),
            records: summary.records,
            batches: summary.batches,
        })
    })
    .await?;

    info!(
        collection = %report.collection,
        records = report.records,
        batches = report.batches,
        "Run complete"
    );
    println!("{} Validation passed for '{}'", "✓".green().bold(), collection);

    Ok(report)
}
