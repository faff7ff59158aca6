//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod preview;
pub mod run;
pub mod validate;

use crate::api::{AccessToken, ApiClient};
use crate::config::Config;
use crate::error::{CliError, Result, Stage, StageExt};
use crate::pipeline::normalize;
use crate::source;
use std::future::Future;
use std::time::Duration;
use tabload_common::types::Dataset;
use tracing::info;

/// Read the configured source and normalize it
pub fn load_dataset(config: &Config) -> Result<Dataset> {
    config.validate_local()?;
    let path = config.source_path()?;

    let table = source::csv::read_table(path)?;
    let dataset = normalize(
        &table,
        config.primary_key.as_deref(),
        &config.type_overrides(),
    )
    .in_stage(Stage::Normalize)?;

    info!(
        path = %path.display(),
        records = dataset.len(),
        fields = dataset.fields().len(),
        "Source normalized"
    );

    Ok(dataset)
}

/// Build a client for the collection store and authenticate
pub async fn connect(config: &Config, collection: &str) -> Result<(ApiClient, AccessToken)> {
    config.validate_remote(collection)?;
    let (username, password) = config.credentials()?;

    let client = ApiClient::new(
        config.endpoint_base.clone(),
        config.request_timeout(),
        config.retry_policy(),
    )
    .in_stage(Stage::Authenticate)?;

    let token = client
        .authenticate(username, password)
        .await
        .in_stage(Stage::Authenticate)?;

    Ok((client, token))
}

/// Run a future under an optional deadline
pub async fn with_deadline<F, T>(deadline: Option<Duration>, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match deadline {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| CliError::Timeout {
                seconds: limit.as_secs(),
            })?,
        None => fut.await,
    }
}
