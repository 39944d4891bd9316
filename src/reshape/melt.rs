//! Column format -> row format.

use crate::config::{DEFAULT_CATEGORY_COLUMN, DEFAULT_VALUE_COLUMN};
use crate::error::{ReshapeError, ReshapeResult};
use crate::types::{DataType, Field, Schema, Table, Value, NULL};

use super::clean::{clean_key, coerce_number, numeric_kind, to_value, Number, ReshapeWarning};
use super::{column_index, Reshaped};

/// Melt a column-format table into row format, naming the generated columns `project` and
/// `volume`.
///
/// See [`melt_to_rows_as`].
pub fn melt_to_rows(table: &Table, entity_column: &str) -> ReshapeResult<Reshaped> {
    melt_to_rows_as(table, entity_column, DEFAULT_CATEGORY_COLUMN, DEFAULT_VALUE_COLUMN)
}

/// Melt a column-format table (one row per entity, one column per category) into row format
/// with the columns `[entity_column, category_name, value_name]`.
///
/// Every column other than `entity_column` is a category column. For each input row and each
/// category column one `(entity, category, value)` row is produced, then:
///
/// - entity values and category (column) names are trimmed;
/// - values are coerced to numbers, unparseable cells become `0` with a
///   [`ReshapeWarning::NonNumericValue`];
/// - rows whose value is exactly `0` are dropped;
/// - rows with a blank entity are skipped ([`ReshapeWarning::BlankKey`]);
/// - the result is sorted by `(category, entity)` using byte-wise string order. Ties keep input
///   order.
///
/// The value column is tagged [`DataType::Int64`] when every remaining value is whole,
/// [`DataType::Float64`] otherwise.
///
/// # Errors
///
/// - [`ReshapeError::MissingColumn`] if `entity_column` does not exist.
/// - [`ReshapeError::NoCategoryColumns`] if `entity_column` is the only (named) column.
/// - [`ReshapeError::ColumnNameConflict`] if the three output names are not distinct.
///
/// ```rust
/// use csv_pivot::reshape::melt_to_rows;
/// use csv_pivot::types::{Schema, Table, Value};
///
/// let wide = Table::new(
///     Schema::utf8(["designator", "X", "Y"]),
///     vec![
///         vec![Value::text("A"), Value::text("5"), Value::text("0")],
///         vec![Value::text("B"), Value::text("3"), Value::text("0")],
///     ],
/// );
///
/// let out = melt_to_rows(&wide, "designator").unwrap();
/// assert_eq!(out.table.column_names(), vec!["designator", "project", "volume"]);
/// assert_eq!(
///     out.table.rows,
///     vec![
///         vec![Value::text("A"), Value::text("X"), Value::Int64(5)],
///         vec![Value::text("B"), Value::text("X"), Value::Int64(3)],
///     ]
/// );
/// ```
pub fn melt_to_rows_as(
    table: &Table,
    entity_column: &str,
    category_name: &str,
    value_name: &str,
) -> ReshapeResult<Reshaped> {
    let entity_idx = column_index(table, entity_column)?;
    if table.column_count() < 2 {
        return Err(ReshapeError::NoCategoryColumns);
    }
    if category_name == entity_column || category_name == value_name {
        return Err(ReshapeError::ColumnNameConflict(category_name.to_string()));
    }
    if value_name == entity_column {
        return Err(ReshapeError::ColumnNameConflict(value_name.to_string()));
    }

    let mut warnings = Vec::new();

    let mut categories: Vec<(usize, &str, String)> = Vec::with_capacity(table.column_count() - 1);
    for (idx, field) in table.schema.fields.iter().enumerate() {
        if idx == entity_idx {
            continue;
        }
        let name = field.name.trim();
        if name.is_empty() {
            // A nameless column cannot be a category; the header is line 1.
            warnings.push(ReshapeWarning::BlankKey {
                row: 1,
                column: field.name.clone(),
            });
            continue;
        }
        categories.push((idx, field.name.as_str(), name.to_string()));
    }
    if categories.is_empty() {
        return Err(ReshapeError::NoCategoryColumns);
    }

    let mut melted: Vec<(String, String, Number)> = Vec::new();
    for (row_idx0, row) in table.rows.iter().enumerate() {
        let user_row = row_idx0 + 2;
        let cell = move |idx: usize| row.get(idx).unwrap_or(&NULL);

        let entity = clean_key(cell(entity_idx));
        if entity.is_empty() {
            warnings.push(ReshapeWarning::BlankKey {
                row: user_row,
                column: entity_column.to_string(),
            });
            continue;
        }

        for (idx, raw_name, category) in &categories {
            let value = coerce_number(cell(*idx), user_row, raw_name, &mut warnings);
            if value.is_zero() {
                continue;
            }
            melted.push((entity.clone(), category.clone(), value));
        }
    }

    melted.sort_by(|a, b| (&a.1, &a.0).cmp(&(&b.1, &b.0)));

    let kind = numeric_kind(melted.iter().map(|(_, _, n)| n));
    let schema = Schema::new(vec![
        Field::new(entity_column, DataType::Utf8),
        Field::new(category_name, DataType::Utf8),
        Field::new(value_name, kind),
    ]);
    let rows = melted
        .into_iter()
        .map(|(entity, category, n)| {
            vec![Value::Utf8(entity), Value::Utf8(category), to_value(n, kind)]
        })
        .collect();

    Ok(Reshaped {
        table: Table::new(schema, rows),
        warnings,
    })
}
