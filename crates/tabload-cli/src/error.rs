//! Error types for the tabload CLI
//!
//! Pipeline failures are wrapped with the [`Stage`] they happened in so the
//! message printed on exit names the failing stage as well as the record or
//! field involved.

use tabload_common::{SchemaError, TabloadError, TransportError, ValidationError};
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Pipeline stage, used to label failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Normalize,
    Authenticate,
    Upload,
    Validate,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Normalize => "normalize",
            Stage::Authenticate => "authenticate",
            Stage::Upload => "upload",
            Stage::Validate => "validate",
        };
        f.write_str(name)
    }
}

/// Comprehensive error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your config file, TABLOAD_* environment variables, or flags.")]
    Config(String),

    /// Source file could not be read or parsed
    #[error("Could not read source '{path}': {message}")]
    Source { path: String, message: String },

    /// A pipeline stage failed
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: TabloadError,
    },

    /// The whole pipeline exceeded its deadline
    #[error("Pipeline did not finish within {seconds} seconds")]
    Timeout { seconds: u64 },

    /// JSON output failed
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a source read error
    pub fn unreadable(path: impl Into<String>, message: impl ToString) -> Self {
        Self::Source {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Wrap a pipeline error with the stage it happened in
    pub fn stage(stage: Stage, error: impl Into<TabloadError>) -> Self {
        Self::Stage {
            stage,
            source: error.into(),
        }
    }

    /// Process exit code for this error
    ///
    /// 1 configuration/output, 3 schema/source, 4 transport, 5 validation, 6 timeout.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Stage { source, .. } => match source {
                TabloadError::Schema(_) => 3,
                TabloadError::Transport(_) => 4,
                TabloadError::Validation(_) => 5,
            },
            CliError::Source { .. } => 3,
            CliError::Timeout { .. } => 6,
            CliError::Config(_) | CliError::Json(_) => 1,
        }
    }
}

/// Helpers to tag a stage result with its [`Stage`]
pub trait StageExt<T> {
    fn in_stage(self, stage: Stage) -> Result<T>;
}

macro_rules! impl_stage_ext {
    ($($err:ty),*) => {
        $(
            impl<T> StageExt<T> for std::result::Result<T, $err> {
                fn in_stage(self, stage: Stage) -> Result<T> {
                    self.map_err(|e| CliError::stage(stage, e))
                }
            }
        )*
    };
}

impl_stage_ext!(SchemaError, TransportError, ValidationError, TabloadError);

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_error_message_names_stage() {
        let err = CliError::stage(
            Stage::Validate,
            ValidationError::ItemNotFound {
                key: "42".to_string(),
            },
        );
        assert_eq!(
            err.to_string(),
            "validate stage failed: Validation failed: item '42' was not found in the collection"
        );
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_exit_codes() {
        let schema = CliError::stage(
            Stage::Normalize,
            SchemaError::UnknownKeyColumn("ID".to_string()),
        );
        assert_eq!(schema.exit_code(), 3);

        let transport = CliError::stage(
            Stage::Upload,
            TransportError::RetriesExhausted {
                endpoint: "additems".to_string(),
                attempts: 3,
            },
        );
        assert_eq!(transport.exit_code(), 4);

        assert_eq!(CliError::Timeout { seconds: 5 }.exit_code(), 6);
        assert_eq!(CliError::config("missing url").exit_code(), 1);
    }

    #[test]
    fn test_unreadable_source_is_source_error() {
        let err = crate::source::csv::read_table("/nonexistent/tabload/rows.csv").unwrap_err();
        assert!(matches!(err, CliError::Source { .. }));
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("/nonexistent/tabload/rows.csv"));
    }
}
