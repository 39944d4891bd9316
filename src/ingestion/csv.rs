//! CSV loading.

use std::collections::HashSet;
use std::path::Path;

use crate::config::CsvOptions;
use crate::error::{TableIoError, TableIoResult};
use crate::types::{Schema, Table, Value};

/// Load a delimited text file into an in-memory [`Table`].
///
/// Rules:
///
/// - The first line is the header; every column must have a distinct name.
/// - Every row must have as many fields as the header.
/// - Non-empty cells load verbatim as [`Value::Utf8`] (no trimming, no type inference); empty
///   cells load as [`Value::Null`]. Cleaning is the reshape engine's job.
pub fn read_csv_from_path(path: impl AsRef<Path>, options: &CsvOptions) -> TableIoResult<Table> {
    let mut rdr = reader_builder(options).from_path(path)?;
    read_csv_from_reader(&mut rdr)
}

/// Load delimited text held in memory (e.g. an uploaded file).
pub fn read_csv_from_str(input: &str, options: &CsvOptions) -> TableIoResult<Table> {
    let mut rdr = reader_builder(options).from_reader(input.as_bytes());
    read_csv_from_reader(&mut rdr)
}

/// Load a table from an existing CSV reader (which must be configured with `has_headers(true)`).
pub fn read_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> TableIoResult<Table> {
    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(TableIoError::SchemaMismatch {
            message: "missing header row".to_string(),
        });
    }

    let mut seen = HashSet::with_capacity(headers.len());
    for name in headers.iter() {
        if !seen.insert(name) {
            return Err(TableIoError::SchemaMismatch {
                message: format!(
                    "duplicate column '{name}'. headers={:?}",
                    headers.iter().collect::<Vec<_>>()
                ),
            });
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(
            record
                .iter()
                .map(|raw| {
                    if raw.is_empty() {
                        Value::Null
                    } else {
                        Value::Utf8(raw.to_owned())
                    }
                })
                .collect(),
        );
    }

    Ok(Table::new(Schema::utf8(headers.iter()), rows))
}

fn reader_builder(options: &CsvOptions) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(options.delimiter.as_byte());
    builder
}
