//! Core data model types.
//!
//! Every stage of the crate (loading, reshaping, saving) passes around an in-memory [`Table`]:
//! a [`Schema`] (ordered, named, typed [`Field`]s) plus row-major [`Value`] storage.

use std::fmt;

/// Logical data type for a schema field.
///
/// On numeric columns produced by the reshape engine, the type doubles as the column's numeric
/// kind: [`DataType::Int64`] marks a column whose values are all whole numbers, and
/// [`DataType::Float64`] marks a column holding at least one fractional value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// 64-bit signed integer (the *Integer* numeric kind).
    Int64,
    /// 64-bit floating point number (the *Decimal* numeric kind).
    Float64,
    /// UTF-8 string.
    Utf8,
}

impl DataType {
    /// Returns `true` for [`DataType::Int64`] and [`DataType::Float64`].
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// An ordered list of fields describing the columns of a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Create a schema where every column is [`DataType::Utf8`].
    pub fn utf8<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            names
                .into_iter()
                .map(|name| Field::new(name, DataType::Utf8))
                .collect(),
        )
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A single scalar cell in a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
}

/// Shared fallback for cells past the end of a short row.
pub(crate) static NULL: Value = Value::Null;

impl Value {
    /// Convenience constructor for [`Value::Utf8`].
    pub fn text(s: impl Into<String>) -> Self {
        Self::Utf8(s.into())
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Render the cell as text.
    ///
    /// `Null` renders empty, integers render without a fractional part and floats use
    /// [`format_decimal`].
    pub fn as_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Int64(v) => v.to_string(),
            Self::Float64(v) => format_decimal(*v),
            Self::Utf8(s) => s.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utf8(s) => f.write_str(s),
            other => f.write_str(&other.as_text()),
        }
    }
}

/// Shortest round-trippable decimal rendering that always keeps a fractional part
/// (`2.0`, `2.5`, `-0.125`).
pub fn format_decimal(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}

/// In-memory tabular data.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the table.
    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    /// `(row count, column count)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.schema.field_names().collect()
    }

    /// Iterate the cells of one column, top to bottom. Returns `None` for an unknown column.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value>> {
        let idx = self.schema.index_of(name)?;
        Some(self.rows.iter().map(move |row| row.get(idx).unwrap_or(&NULL)))
    }

    /// Cell at (`row`, `column`), if both exist.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.schema.index_of(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// A copy of the first `k` rows (bounded preview).
    pub fn head(&self, k: usize) -> Self {
        Self {
            schema: self.schema.clone(),
            rows: self.rows.iter().take(k).cloned().collect(),
        }
    }
}
