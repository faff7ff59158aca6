//! Tabload Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging, and error handling for the tabload workspace.
//!
//! # Overview
//!
//! - **Types**: the canonical record model (`Field`, `Attribute`, `Record`, `Dataset`)
//! - **Error Handling**: the schema / transport / validation error taxonomy
//! - **Logging**: tracing subscriber bootstrap shared by every binary
//!
//! # Example
//!
//! ```
//! use tabload_common::types::{Attribute, AttributeValue, Dataset, Field, FieldType, Record};
//!
//! let dataset = Dataset::new(
//!     vec![Record::new(
//!         "1",
//!         vec![Attribute::new("Price", FieldType::Number, AttributeValue::Float(5.0))],
//!     )],
//!     vec![Field::new("Price", FieldType::Number)],
//! );
//!
//! assert_eq!(dataset.len(), 1);
//! assert_eq!(dataset.first().map(|r| r.key.as_str()), Some("1"));
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SchemaError, TabloadError, TransportError, ValidationError};
