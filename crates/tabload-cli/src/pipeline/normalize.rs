//! Record normalizer
//!
//! Turns a [`SourceTable`] into a canonical [`Dataset`]:
//!
//! 1. column types are resolved (type overrides first, then the source's
//!    declared type, then inference for undeclared columns)
//! 2. cells are coerced to their resolved type; zero-currency placeholders
//!    become `0.0` on number columns
//! 3. missing cells become the empty string
//! 4. each row is split into its key and its attributes
//!
//! The result is deterministic: normalizing the same table twice yields equal
//! datasets.

use crate::source::{SourceTable, SourceType};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, HashMap};
use tabload_common::types::{Attribute, AttributeValue, Dataset, Field, Record};
use tabload_common::SchemaError;
use tracing::{debug, instrument};

/// Placeholder tokens that stand for a zero currency amount
pub const DEFAULT_ZERO_PLACEHOLDERS: &[&str] = &["$-", "-"];

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const DATETIME_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Column type overrides and placeholder handling applied before inference
#[derive(Debug, Clone, PartialEq)]
pub struct TypeOverrides {
    columns: BTreeMap<String, SourceType>,
    zero_placeholders: Vec<String>,
}

impl Default for TypeOverrides {
    fn default() -> Self {
        Self {
            columns: BTreeMap::new(),
            zero_placeholders: DEFAULT_ZERO_PLACEHOLDERS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl TypeOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a column to a type, bypassing inference
    pub fn column(mut self, name: impl Into<String>, source_type: SourceType) -> Self {
        self.columns.insert(name.into(), source_type);
        self
    }

    /// Replace the zero-currency placeholder tokens
    pub fn zero_placeholders<I, S>(mut self, placeholders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.zero_placeholders = placeholders.into_iter().map(Into::into).collect();
        self
    }

    fn get(&self, column: &str) -> Option<SourceType> {
        self.columns.get(column).copied()
    }

    fn is_zero_placeholder(&self, cell: &str) -> bool {
        let squashed = squash(cell);
        self.zero_placeholders.iter().any(|p| squash(p) == squashed)
    }
}

/// How each record's key is produced
enum KeySource {
    Column(usize),
    /// Synthetic 1-based row index
    RowIndex,
}

/// Normalize a source table into a dataset
///
/// `primary_key` wins over the key column declared by the source; with
/// neither, the synthetic row index is used as the key.
#[instrument(skip_all, fields(rows = table.rows.len(), columns = table.schema.fields.len()))]
pub fn normalize(
    table: &SourceTable,
    primary_key: Option<&str>,
    overrides: &TypeOverrides,
) -> Result<Dataset, SchemaError> {
    let schema = &table.schema;

    if let Some(unknown) = overrides
        .columns
        .keys()
        .find(|name| schema.position(name).is_none())
    {
        return Err(SchemaError::UnknownOverrideColumn(unknown.clone()));
    }

    let key_source = match primary_key.or(schema.primary_key.as_deref()) {
        Some(column) => KeySource::Column(
            schema
                .position(column)
                .ok_or_else(|| SchemaError::UnknownKeyColumn(column.to_string()))?,
        ),
        None => KeySource::RowIndex,
    };

    let types: Vec<SourceType> = schema
        .fields
        .iter()
        .enumerate()
        .map(|(col, field)| {
            let declared = overrides.get(&field.name).unwrap_or(field.source_type);
            match declared {
                SourceType::Any => infer_type((0..table.rows.len()).map(|row| table.cell(row, col))),
                other => other,
            }
        })
        .collect();

    let is_key = |col: usize| matches!(key_source, KeySource::Column(k) if k == col);

    let fields: Vec<Field> = schema
        .fields
        .iter()
        .zip(&types)
        .enumerate()
        .filter(|(col, _)| !is_key(*col))
        .map(|(_, (field, ty))| Field::new(field.name.clone(), ty.field_type()))
        .collect();

    let mut seen: HashMap<String, usize> = HashMap::with_capacity(table.rows.len());
    let mut records = Vec::with_capacity(table.rows.len());

    for row in 0..table.rows.len() {
        let row_number = row + 1;

        let key = match key_source {
            KeySource::Column(col) => {
                let column = &schema.fields[col].name;
                let value = coerce_cell(
                    table.cell(row, col),
                    types[col],
                    overrides,
                    column,
                    row_number,
                )?
                .to_string();
                if value.is_empty() {
                    return Err(SchemaError::MissingKey {
                        row: row_number,
                        column: column.clone(),
                    });
                }
                value
            },
            KeySource::RowIndex => row_number.to_string(),
        };

        if let Some(&first_row) = seen.get(&key) {
            return Err(SchemaError::DuplicateKey {
                key,
                first_row,
                row: row_number,
            });
        }
        seen.insert(key.clone(), row_number);

        let mut attributes = Vec::with_capacity(fields.len());
        for (col, field) in schema.fields.iter().enumerate() {
            if is_key(col) {
                continue;
            }
            let value = coerce_cell(
                table.cell(row, col),
                types[col],
                overrides,
                &field.name,
                row_number,
            )?;
            attributes.push(Attribute::new(
                field.name.clone(),
                types[col].field_type(),
                value,
            ));
        }

        records.push(Record::new(key, attributes));
    }

    debug!(records = records.len(), fields = fields.len(), "Normalized source table");

    let dataset = Dataset::new(records, fields);
    Ok(match key_source {
        KeySource::RowIndex => dataset.keyed_by_row_index(),
        KeySource::Column(_) => dataset,
    })
}

/// Infer a concrete type from a column's cells
///
/// Inference is strict: formatted currency text is not a number here. Use a
/// type override for such columns.
pub fn infer_type<'a, I>(cells: I) -> SourceType
where
    I: Iterator<Item = Option<&'a str>>,
{
    let values: Vec<&str> = cells
        .flatten()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();

    if values.is_empty() {
        return SourceType::String;
    }

    if values.iter().all(|v| v.parse::<i64>().is_ok()) {
        SourceType::Integer
    } else if values.iter().all(|v| parse_finite(v).is_some()) {
        SourceType::Number
    } else if values.iter().all(|v| parse_bool(v).is_some()) {
        SourceType::Boolean
    } else if values.iter().all(|v| parse_datetime(v).is_some()) {
        SourceType::Datetime
    } else {
        SourceType::String
    }
}

fn coerce_cell(
    raw: Option<&str>,
    source_type: SourceType,
    overrides: &TypeOverrides,
    column: &str,
    row: usize,
) -> Result<AttributeValue, SchemaError> {
    let raw = match raw {
        Some(cell) if !cell.trim().is_empty() => cell,
        _ => return Ok(AttributeValue::empty()),
    };

    let invalid = |expected: &str| SchemaError::InvalidValue {
        column: column.to_string(),
        row,
        value: raw.to_string(),
        expected: expected.to_string(),
    };

    let trimmed = raw.trim();
    match source_type {
        SourceType::String | SourceType::Any => Ok(AttributeValue::text(raw)),
        SourceType::Integer => trimmed
            .parse::<i64>()
            .map(AttributeValue::Integer)
            .map_err(|_| invalid("integer")),
        SourceType::Number => {
            if overrides.is_zero_placeholder(raw) {
                return Ok(AttributeValue::Float(0.0));
            }
            parse_currency(trimmed)
                .map(AttributeValue::Float)
                .ok_or_else(|| invalid("number"))
        },
        SourceType::Boolean => parse_bool(trimmed)
            .map(AttributeValue::Boolean)
            .ok_or_else(|| invalid("boolean")),
        SourceType::Date | SourceType::Datetime => parse_datetime(trimmed)
            .map(|dt| AttributeValue::Text(dt.format(DATE_FORMAT).to_string()))
            .ok_or_else(|| invalid("date")),
    }
}

/// Parse a number that may carry a `$` sign and thousands separators
fn parse_currency(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();
    parse_finite(&cleaned)
}

/// `NaN` and infinities are text, not numbers
fn parse_finite(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    DATETIME_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_INPUT_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn squash(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}
