//! Population validator
//!
//! Confirms that the remote collection matches the local dataset after an
//! upload. Checks run in a fixed order and the first failure is returned:
//!
//! 1. remote item count equals the local record count
//! 2. every local field exists remotely with the same type
//! 3. the first record (source order) matches its remote copy
//! 4. the last record (source order) matches its remote copy

use crate::api::{AccessToken, ApiClient};
use crate::pipeline::compare::compare_rows;
use tabload_common::error::FieldProblem;
use tabload_common::types::{Dataset, Field, Record, SYNTHETIC_INDEX_FIELD};
use tabload_common::{Result, ValidationError};
use tracing::{debug, info, instrument};

/// Validates one collection for one authenticated session
pub struct PopulationValidator<'a> {
    client: &'a ApiClient,
    token: &'a AccessToken,
}

impl<'a> PopulationValidator<'a> {
    pub fn new(client: &'a ApiClient, token: &'a AccessToken) -> Self {
        Self { client, token }
    }

    /// Run all checks against `collection`
    #[instrument(skip(self, dataset), fields(records = dataset.len()))]
    pub async fn validate(&self, collection: &str, dataset: &Dataset) -> Result<()> {
        self.check_metadata(collection, dataset).await?;

        for record in spot_check_targets(dataset) {
            self.check_record(collection, record).await?;
        }

        info!("Validation passed");
        Ok(())
    }

    async fn check_metadata(&self, collection: &str, dataset: &Dataset) -> Result<()> {
        let details = self.client.collection_details(self.token, collection).await?;
        debug!(
            remote_count = details.count,
            remote_fields = details.fields.len(),
            "Fetched collection details"
        );

        if details.count != dataset.len() {
            return Err(ValidationError::CountMismatch {
                expected: dataset.len(),
                actual: details.count,
            }
            .into());
        }

        check_fields(dataset, &details.fields)?;
        Ok(())
    }

    async fn check_record(&self, collection: &str, record: &Record) -> Result<()> {
        let response = self
            .client
            .get_item(self.token, collection, &record.key, record.attribute_names())
            .await?;

        if !response.item_found {
            return Err(ValidationError::ItemNotFound {
                key: record.key.clone(),
            }
            .into());
        }

        let remote = response.item.unwrap_or_default();
        compare_rows(&record.attributes, &remote.attributes).map_err(|mismatch| {
            ValidationError::RowMismatch {
                key: record.key.clone(),
                attribute: mismatch.attribute().to_string(),
                detail: mismatch.detail(),
            }
        })?;

        debug!(key = %record.key, "Spot-check passed");
        Ok(())
    }
}

/// Compare the dataset's fields against the remote field list
///
/// A field named like the synthetic index is skipped when the records are
/// keyed by the row index.
pub fn check_fields(dataset: &Dataset, remote: &[Field]) -> std::result::Result<(), ValidationError> {
    let skip_index = dataset.is_keyed_by_row_index();
    for field in dataset
        .fields()
        .iter()
        .filter(|f| !(skip_index && f.name == SYNTHETIC_INDEX_FIELD))
    {
        let problem = match remote.iter().find(|r| r.name == field.name) {
            None => Some(FieldProblem::Missing),
            Some(r) if r.declared_type != field.declared_type => Some(FieldProblem::TypeMismatch {
                expected: field.declared_type,
                actual: r.declared_type,
            }),
            Some(_) => None,
        };

        if let Some(problem) = problem {
            return Err(ValidationError::FieldMismatch {
                field: field.name.clone(),
                problem,
            });
        }
    }

    Ok(())
}

/// First and last record by source order; one record is checked once
fn spot_check_targets(dataset: &Dataset) -> Vec<&Record> {
    match (dataset.first(), dataset.last()) {
        (Some(first), Some(last)) if dataset.len() > 1 => vec![first, last],
        (Some(first), _) => vec![first],
        _ => Vec::new(),
    }
}
