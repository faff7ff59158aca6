//! Batch uploader
//!
//! Records are cut into contiguous, non-overlapping slices of exactly
//! `batch_size` records (the last slice may be shorter) and submitted one at a
//! time, in order. Concatenating the batches gives back the original record
//! sequence.

use crate::api::{AccessToken, ApiClient};
use indicatif::ProgressBar;
use std::num::NonZeroUsize;
use tabload_common::types::{Dataset, Record};
use tabload_common::TransportError;
use tracing::{debug, info, instrument};

/// Default number of records per `additems` call
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Split records into order-preserving batches of at most `batch_size`
pub fn partition(records: &[Record], batch_size: NonZeroUsize) -> std::slice::Chunks<'_, Record> {
    records.chunks(batch_size.get())
}

/// Number of batches `partition` yields for `len` records
pub fn batch_count(len: usize, batch_size: NonZeroUsize) -> usize {
    len.div_ceil(batch_size.get())
}

/// Outcome of a completed upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadSummary {
    pub records: usize,
    pub batches: usize,
}

/// Sequential batch uploader for one authenticated session
pub struct BatchUploader<'a> {
    client: &'a ApiClient,
    token: &'a AccessToken,
    batch_size: NonZeroUsize,
    progress: Option<ProgressBar>,
}

impl<'a> BatchUploader<'a> {
    pub fn new(client: &'a ApiClient, token: &'a AccessToken, batch_size: NonZeroUsize) -> Self {
        Self {
            client,
            token,
            batch_size,
            progress: None,
        }
    }

    /// Advance a progress bar by one per submitted batch
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Upload every record of the dataset to `collection`
    ///
    /// Stops at the first batch that fails; earlier batches stay applied.
    #[instrument(skip(self, dataset), fields(records = dataset.len(), batch_size = self.batch_size.get()))]
    pub async fn upload(
        &self,
        collection: &str,
        dataset: &Dataset,
    ) -> Result<UploadSummary, TransportError> {
        let total = batch_count(dataset.len(), self.batch_size);
        let mut batches = 0;

        for (index, batch) in partition(dataset.records(), self.batch_size).enumerate() {
            debug!(batch = index + 1, of = total, size = batch.len(), "Submitting batch");
            if let Err(e) = self.client.add_items(self.token, collection, batch).await {
                if let Some(ref pb) = self.progress {
                    pb.finish_and_clear();
                }
                return Err(e);
            }
            batches += 1;

            if let Some(ref pb) = self.progress {
                pb.inc(1);
            }
        }

        if let Some(ref pb) = self.progress {
            pb.finish_and_clear();
        }

        info!(batches, records = dataset.len(), "Upload complete");

        Ok(UploadSummary {
            records: dataset.len(),
            batches,
        })
    }
}
