//! CSV source reader
//!
//! Reads a headered CSV file. Every column is declared [`SourceType::Any`]
//! and no primary key is declared; both are resolved by the normalizer.

use super::{SourceField, SourceSchema, SourceTable, SourceType};
use crate::error::{CliError, Result};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Read a CSV file into a [`SourceTable`]
pub fn read_table(path: impl AsRef<Path>) -> Result<SourceTable> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| CliError::unreadable(path.display().to_string(), e))?;

    let table = read_from(file).map_err(|e| CliError::unreadable(path.display().to_string(), e))?;

    debug!(
        path = %path.display(),
        columns = table.schema.fields.len(),
        rows = table.rows.len(),
        "Read CSV source"
    );

    Ok(table)
}

/// Read CSV data from any reader
pub fn read_from<R: Read>(reader: R) -> std::result::Result<SourceTable, ::csv::Error> {
    let mut csv_reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(::csv::Trim::Headers)
        .from_reader(reader);

    let fields = csv_reader
        .headers()?
        .iter()
        .map(|name| SourceField::new(name, SourceType::Any))
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|cell| {
                    if cell.is_empty() {
                        None
                    } else {
                        Some(cell.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(SourceTable::new(
        SourceSchema {
            primary_key: None,
            fields,
        },
        rows,
    ))
}
