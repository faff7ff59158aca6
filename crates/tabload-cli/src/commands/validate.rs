//! `tabload validate` command implementation
//!
//! Checks an already-populated collection against the local source without
//! uploading anything.

use super::{connect, load_dataset, with_deadline};
use crate::config::Config;
use crate::error::{Result, Stage, StageExt};
use crate::pipeline::PopulationValidator;
use colored::Colorize;

pub async fn run(config: &Config, collection: &str) -> Result<()> {
    let dataset = load_dataset(config)?;

    with_deadline(config.pipeline_timeout(), async {
        let (client, token) = connect(config, collection).await?;
        PopulationValidator::new(&client, &token)
            .validate(collection, &dataset)
            .await
            .in_stage(Stage::Validate)
    })
    .await?;

    println!(
        "{} '{}' matches the source ({} record(s))",
        "✓".green().bold(),
        collection,
        dataset.len()
    );
    Ok(())
}
