//! Transform-upload-verify pipeline stages
//!
//! `normalize` builds the dataset, `upload` sends it in batches, `validate`
//! checks the remote collection against it. Stages run strictly in that order.

pub mod compare;
pub mod normalize;
pub mod upload;
pub mod validate;

pub use normalize::{normalize, TypeOverrides};
pub use upload::{BatchUploader, UploadSummary, DEFAULT_BATCH_SIZE};
pub use validate::PopulationValidator;
