//! Tabular source input
//!
//! A source is a flat table of raw text cells plus a typed column schema. The
//! normalizer turns it into a canonical [`tabload_common::types::Dataset`].

pub mod csv;

use serde::{Deserialize, Serialize};
use tabload_common::types::FieldType;

/// Column type as declared by the source
///
/// `Any` means undeclared; the normalizer infers a concrete type from the
/// column's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[serde(alias = "int")]
    Integer,
    #[serde(alias = "float", alias = "currency")]
    Number,
    #[serde(alias = "text")]
    String,
    #[serde(alias = "bool")]
    Boolean,
    Datetime,
    Date,
    Any,
}

impl SourceType {
    /// Declared field type for a resolved source type
    ///
    /// `datetime` is downgraded to `date` and `integer` maps to `number`.
    pub fn field_type(self) -> FieldType {
        match self {
            SourceType::Integer | SourceType::Number => FieldType::Number,
            SourceType::String => FieldType::String,
            SourceType::Boolean => FieldType::Boolean,
            SourceType::Datetime | SourceType::Date => FieldType::Date,
            SourceType::Any => FieldType::Other,
        }
    }
}

/// A named source column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceField {
    pub name: String,
    pub source_type: SourceType,
}

impl SourceField {
    pub fn new(name: impl Into<String>, source_type: SourceType) -> Self {
        Self {
            name: name.into(),
            source_type,
        }
    }
}

/// Column schema of a source table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceSchema {
    /// Primary-key column declared by the source, if any
    pub primary_key: Option<String>,
    pub fields: Vec<SourceField>,
}

impl SourceSchema {
    pub fn position(&self, column: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == column)
    }
}

/// One source row; cells are in schema order, `None` for missing
pub type SourceRow = Vec<Option<String>>;

/// A flat tabular source
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceTable {
    pub schema: SourceSchema,
    pub rows: Vec<SourceRow>,
}

impl SourceTable {
    pub fn new(schema: SourceSchema, rows: Vec<SourceRow>) -> Self {
        Self { schema, rows }
    }

    /// Cell at `row`/`column`, treating short rows as missing cells
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|c| c.as_deref())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_source_type_field_type() {
        assert_eq!(SourceType::Datetime.field_type(), FieldType::Date);
        assert_eq!(SourceType::Integer.field_type(), FieldType::Number);
        assert_eq!(SourceType::String.field_type(), FieldType::String);
    }

    #[test]
    fn test_source_type_aliases() {
        let parse = |name: &str| serde_json::from_str::<SourceType>(&format!("\"{}\"", name));
        assert_eq!(parse("currency").unwrap(), SourceType::Number);
        assert_eq!(parse("float").unwrap(), SourceType::Number);
        assert_eq!(parse("text").unwrap(), SourceType::String);
        assert_eq!(parse("int").unwrap(), SourceType::Integer);
        assert_eq!(parse("bool").unwrap(), SourceType::Boolean);
        assert!(parse("blob").is_err());
    }

    #[test]
    fn test_cell_short_row() {
        let table = SourceTable::new(
            SourceSchema {
                primary_key: None,
                fields: vec![
                    SourceField::new("a", SourceType::Any),
                    SourceField::new("b", SourceType::Any),
                ],
            },
            vec![vec![Some("1".to_string())]],
        );
        assert_eq!(table.cell(0, 0), Some("1"));
        assert_eq!(table.cell(0, 1), None);
        assert_eq!(table.cell(5, 0), None);
    }
}
