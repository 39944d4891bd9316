//! Row format -> column format.

use std::collections::HashMap;

use crate::error::{ReshapeError, ReshapeResult};
use crate::types::{DataType, Field, Schema, Table, Value, NULL};

use super::clean::{clean_key, coerce_number, numeric_kind, to_value, Number, ReshapeWarning};
use super::{column_index, Reshaped};

/// Distinct strings in first-seen order.
#[derive(Default)]
struct Interner {
    ids: HashMap<String, usize>,
    order: Vec<String>,
}

impl Interner {
    fn intern(&mut self, key: String) -> usize {
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = self.order.len();
        self.ids.insert(key.clone(), id);
        self.order.push(key);
        id
    }
}

/// Pivot a row-format table (one `(entity, category, value)` observation per row) into column
/// format (one row per entity, one column per category).
///
/// - Entity and category cells are trimmed; case is preserved.
/// - Value cells are coerced to numbers; unparseable cells become `0` and are reported as
///   [`ReshapeWarning::NonNumericValue`].
/// - Rows with a blank entity or category are skipped ([`ReshapeWarning::BlankKey`]).
/// - When several rows share an `(entity, category)` pair, the last one wins
///   ([`ReshapeWarning::DuplicateKey`] is recorded for each overwrite).
/// - Entities (rows) and categories (columns) keep their first-seen order; the entity column is
///   first. Pairs never observed are `0`.
/// - Each category column is tagged [`DataType::Int64`] when all its values are whole numbers,
///   [`DataType::Float64`] otherwise.
///
/// # Errors
///
/// - [`ReshapeError::MissingColumn`] if any of the three columns does not exist.
/// - [`ReshapeError::EmptyCategorySet`] if no usable rows remain.
/// - [`ReshapeError::ColumnNameConflict`] if a category value equals `entity_column`.
///
/// ```rust
/// use csv_pivot::reshape::pivot_to_columns;
/// use csv_pivot::types::{Schema, Table, Value};
///
/// let rows = Table::new(
///     Schema::utf8(["designator", "project", "volume"]),
///     vec![
///         vec![Value::text("A"), Value::text("X"), Value::text("2")],
///         vec![Value::text("A"), Value::text("Y"), Value::text("14")],
///         vec![Value::text("B"), Value::text("X"), Value::text("1")],
///     ],
/// );
///
/// let out = pivot_to_columns(&rows, "designator", "project", "volume").unwrap();
/// assert_eq!(out.table.shape(), (2, 3));
/// assert_eq!(out.table.get(1, "Y"), Some(&Value::Int64(0)));
/// assert!(out.warnings.is_empty());
/// ```
pub fn pivot_to_columns(
    table: &Table,
    entity_column: &str,
    category_column: &str,
    value_column: &str,
) -> ReshapeResult<Reshaped> {
    let entity_idx = column_index(table, entity_column)?;
    let category_idx = column_index(table, category_column)?;
    let value_idx = column_index(table, value_column)?;

    let mut warnings = Vec::new();
    let mut entities = Interner::default();
    let mut categories = Interner::default();
    let mut observations: Vec<(usize, usize, Number, usize)> =
        Vec::with_capacity(table.row_count());

    for (row_idx0, row) in table.rows.iter().enumerate() {
        // 1-based, header is line 1.
        let user_row = row_idx0 + 2;
        let cell = move |idx: usize| row.get(idx).unwrap_or(&NULL);

        let entity = clean_key(cell(entity_idx));
        let category = clean_key(cell(category_idx));
        if entity.is_empty() || category.is_empty() {
            let column = if entity.is_empty() { entity_column } else { category_column };
            warnings.push(ReshapeWarning::BlankKey {
                row: user_row,
                column: column.to_string(),
            });
            continue;
        }
        let value = coerce_number(cell(value_idx), user_row, value_column, &mut warnings);

        let e = entities.intern(entity);
        let c = categories.intern(category);
        observations.push((e, c, value, user_row));
    }

    if categories.order.is_empty() {
        return Err(ReshapeError::EmptyCategorySet);
    }
    if let Some(name) = categories.order.iter().find(|c| c.as_str() == entity_column) {
        return Err(ReshapeError::ColumnNameConflict(name.clone()));
    }

    // Dense entity x category grid; later observations overwrite earlier ones.
    let n_categories = categories.order.len();
    let mut grid: Vec<Option<Number>> = vec![None; entities.order.len() * n_categories];
    for (e, c, value, user_row) in observations {
        let slot = &mut grid[e * n_categories + c];
        if slot.is_some() {
            warnings.push(ReshapeWarning::DuplicateKey {
                row: user_row,
                entity: entities.order[e].clone(),
                category: categories.order[c].clone(),
            });
        }
        *slot = Some(value);
    }
    warnings.sort_by_key(ReshapeWarning::row);
    let grid: Vec<Number> = grid.into_iter().map(|v| v.unwrap_or(Number::ZERO)).collect();

    let kinds: Vec<DataType> = (0..n_categories)
        .map(|c| numeric_kind(grid.iter().skip(c).step_by(n_categories)))
        .collect();

    let mut fields = Vec::with_capacity(n_categories + 1);
    fields.push(Field::new(entity_column, DataType::Utf8));
    fields.extend(
        categories
            .order
            .iter()
            .zip(&kinds)
            .map(|(name, kind)| Field::new(name.clone(), *kind)),
    );

    let rows = entities
        .order
        .into_iter()
        .zip(grid.chunks(n_categories))
        .map(|(entity, cells)| {
            let mut out = Vec::with_capacity(n_categories + 1);
            out.push(Value::Utf8(entity));
            out.extend(cells.iter().zip(&kinds).map(|(n, kind)| to_value(*n, *kind)));
            out
        })
        .collect();

    Ok(Reshaped {
        table: Table::new(Schema::new(fields), rows),
        warnings,
    })
}
