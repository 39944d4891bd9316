//! CSV saving.

use std::io;
use std::path::Path;

use crate::config::CsvOptions;
use crate::error::{TableIoError, TableIoResult};
use crate::types::{format_decimal, DataType, Table, Value, NULL};

/// Write `table` to a delimited text file, header first, columns in schema order.
///
/// Cells in an [`DataType::Int64`] column are written without a fractional part even if they are
/// stored as whole floats; other floats keep at least one decimal (`2.0`, `2.5`).
pub fn write_csv_to_path(
    table: &Table,
    path: impl AsRef<Path>,
    options: &CsvOptions,
) -> TableIoResult<()> {
    let mut wtr = writer_builder(options).from_path(path)?;
    write_csv_to_writer(table, &mut wtr)
}

/// Render `table` as delimited text in memory (e.g. for a download).
pub fn write_csv_to_string(table: &Table, options: &CsvOptions) -> TableIoResult<String> {
    let mut wtr = writer_builder(options).from_writer(Vec::new());
    write_csv_to_writer(table, &mut wtr)?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| TableIoError::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| TableIoError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Write `table` through an existing CSV writer and flush it.
pub fn write_csv_to_writer<W: io::Write>(
    table: &Table,
    wtr: &mut csv::Writer<W>,
) -> TableIoResult<()> {
    wtr.write_record(table.schema.field_names())?;

    let mut record: Vec<String> = Vec::with_capacity(table.column_count());
    for row in &table.rows {
        record.clear();
        for (idx, field) in table.schema.fields.iter().enumerate() {
            record.push(render_cell(row.get(idx).unwrap_or(&NULL), field.data_type));
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

fn render_cell(value: &Value, data_type: DataType) -> String {
    match (data_type, value) {
        (DataType::Int64, Value::Float64(v)) if v.is_finite() && v.fract() == 0.0 => {
            format!("{v:.0}")
        }
        (_, Value::Float64(v)) => format_decimal(*v),
        (_, other) => other.as_text(),
    }
}

fn writer_builder(options: &CsvOptions) -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder.delimiter(options.delimiter.as_byte());
    builder
}

#[cfg(test)]
mod tests {
    use super::write_csv_to_string;
    use crate::config::{CsvOptions, Delimiter};
    use crate::types::{DataType, Field, Schema, Table, Value};

    fn pivoted() -> Table {
        Table::new(
            Schema::new(vec![
                Field::new("designator", DataType::Utf8),
                Field::new("P1", DataType::Int64),
                Field::new("P2", DataType::Float64),
            ]),
            vec![
                vec![Value::text("OS-SM-1"), Value::Float64(14.0), Value::Float64(2.0)],
                vec![Value::text("PC-APC/UPC;657"), Value::Int64(0), Value::Float64(0.25)],
                vec![Value::text("x"), Value::Null],
            ],
        )
    }

    #[test]
    fn integer_columns_render_without_fraction() {
        let out = write_csv_to_string(&pivoted(), &CsvOptions::default()).unwrap();
        assert_eq!(
            out,
            "designator;P1;P2\nOS-SM-1;14;2.0\n\"PC-APC/UPC;657\";0;0.25\nx;;\n"
        );
    }

    #[test]
    fn uses_configured_delimiter() {
        let out =
            write_csv_to_string(&pivoted(), &CsvOptions::with_delimiter(Delimiter::PIPE)).unwrap();
        assert!(out.starts_with("designator|P1|P2\nOS-SM-1|14|2.0\n"));
        // No quoting needed once ';' is not the separator.
        assert!(out.contains("\nPC-APC/UPC;657|0|0.25\n"));
    }

    #[test]
    fn empty_table_writes_header_only() {
        let t = Table::new(Schema::utf8(["designator", "project", "volume"]), vec![]);
        let out = write_csv_to_string(&t, &CsvOptions::default()).unwrap();
        assert_eq!(out, "designator;project;volume\n");
    }
}
