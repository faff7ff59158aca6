//! Error types for tabload
//!
//! Every failure aborts the run. The variants carry enough context (key,
//! field, expected vs actual) to diagnose a failure without re-running.

use thiserror::Error;

use crate::types::FieldType;

/// Result type alias for tabload operations
pub type Result<T> = std::result::Result<T, TabloadError>;

/// Umbrella error for the transform-upload-verify pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TabloadError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Malformed or ambiguous source data. Never retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Schema error: primary key column '{0}' is not present in the source schema")]
    UnknownKeyColumn(String),

    #[error("Schema error: row {row} has no value for primary key column '{column}'")]
    MissingKey { row: usize, column: String },

    #[error("Schema error: duplicate primary key '{key}' (rows {first_row} and {row})")]
    DuplicateKey {
        key: String,
        first_row: usize,
        row: usize,
    },

    #[error("Schema error: type override names unknown column '{0}'")]
    UnknownOverrideColumn(String),

    #[error("Schema error: column '{column}' row {row}: cannot coerce '{value}' to {expected}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
        expected: String,
    },
}

/// Network or HTTP failure, including retry-budget exhaustion
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("Transport error: request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },

    #[error("Transport error: {endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Transport error: {endpoint} kept denying access after {attempts} attempts")]
    RetriesExhausted { endpoint: String, attempts: u32 },

    #[error("Transport error: could not decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

/// Why a local field did not match the remote schema
#[derive(Debug, Clone, PartialEq)]
pub enum FieldProblem {
    Missing,
    TypeMismatch { expected: FieldType, actual: FieldType },
}

impl std::fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldProblem::Missing => write!(f, "not present in remote collection"),
            FieldProblem::TypeMismatch { expected, actual } => {
                write!(f, "expected type {}, remote has {}", expected, actual)
            },
        }
    }
}

/// Remote state does not match the local dataset
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Validation failed: collection holds {actual} items, expected {expected}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Validation failed: field '{field}' {problem}")]
    FieldMismatch { field: String, problem: FieldProblem },

    #[error("Validation failed: item '{key}' was not found in the collection")]
    ItemNotFound { key: String },

    #[error("Validation failed: item '{key}' attribute '{attribute}': {detail}")]
    RowMismatch {
        key: String,
        attribute: String,
        detail: String,
    },
}

impl TransportError {
    /// Create a request error for an endpoint
    pub fn request(endpoint: impl Into<String>, message: impl ToString) -> Self {
        Self::Request {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    /// Create a decode error for an endpoint
    pub fn decode(endpoint: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }
}
