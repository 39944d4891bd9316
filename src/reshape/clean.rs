//! Cleaning rules shared by pivot and melt: key trimming, numeric coercion, and per-column
//! Integer/Decimal normalization.

use std::fmt;

use crate::types::{DataType, Value};

/// A non-fatal condition recorded while reshaping.
///
/// `row` is 1-based and counts the header line as line 1, so the first data row is row 2.
#[derive(Debug, Clone, PartialEq)]
pub enum ReshapeWarning {
    /// A value cell could not be parsed as a number and was treated as `0`.
    NonNumericValue {
        row: usize,
        column: String,
        raw: String,
    },
    /// The entity or category of a row is empty after trimming; the row was skipped.
    BlankKey { row: usize, column: String },
    /// A later row overwrote the value of an earlier row for the same (entity, category).
    DuplicateKey {
        row: usize,
        entity: String,
        category: String,
    },
}

impl ReshapeWarning {
    /// The row (header = 1) the warning refers to.
    pub fn row(&self) -> usize {
        match self {
            Self::NonNumericValue { row, .. }
            | Self::BlankKey { row, .. }
            | Self::DuplicateKey { row, .. } => *row,
        }
    }
}

impl fmt::Display for ReshapeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonNumericValue { row, column, raw } => write!(
                f,
                "row {row}, column '{column}': non-numeric value '{raw}' treated as 0"
            ),
            Self::BlankKey { row, column } => {
                write!(f, "row {row}: blank '{column}', row skipped")
            }
            Self::DuplicateKey {
                row,
                entity,
                category,
            } => write!(
                f,
                "row {row}: duplicate ('{entity}', '{category}'), later value kept"
            ),
        }
    }
}

/// A coerced numeric cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub(crate) const ZERO: Self = Self::Int(0);

    pub(crate) fn is_zero(self) -> bool {
        match self {
            Self::Int(v) => v == 0,
            Self::Float(v) => v == 0.0,
        }
    }

    /// `true` for integers and finite floats without a fractional part, whatever their size.
    fn is_whole(self) -> bool {
        match self {
            Self::Int(_) => true,
            Self::Float(v) => v.is_finite() && v.fract() == 0.0,
        }
    }

    /// Value as `i64`, if it is whole and fits.
    fn as_i64(self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(v),
            Self::Float(v) if self.is_whole() && v >= i64::MIN as f64 && v < i64::MAX as f64 => {
                Some(v as i64)
            }
            Self::Float(_) => None,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }
}

/// Cell rendered as a trimmed key (entity or category).
pub(crate) fn clean_key(value: &Value) -> String {
    match value {
        Value::Utf8(s) => s.trim().to_string(),
        other => other.as_text().trim().to_string(),
    }
}

/// Coerce a cell to a number.
///
/// Missing cells are `0` with no warning. Text that is not a plain signed integer or decimal
/// literal, and non-finite floats, are `0` plus a [`ReshapeWarning::NonNumericValue`].
pub(crate) fn coerce_number(
    value: &Value,
    row: usize,
    column: &str,
    warnings: &mut Vec<ReshapeWarning>,
) -> Number {
    let parsed = match value {
        Value::Null => return Number::ZERO,
        Value::Int64(v) => Some(Number::Int(*v)),
        Value::Float64(v) if v.is_finite() => Some(Number::Float(*v)),
        Value::Float64(_) => None,
        Value::Utf8(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Number::ZERO;
            }
            parse_number(trimmed)
        }
    };

    parsed.unwrap_or_else(|| {
        warnings.push(ReshapeWarning::NonNumericValue {
            row,
            column: column.to_string(),
            raw: value.as_text(),
        });
        Number::ZERO
    })
}

/// Parse `[+-]?digits[.digits]` (either side of the point may be empty, not both).
///
/// No exponents, no `inf`/`nan`, no thousands separators or alternate decimal marks.
pub(crate) fn parse_number(s: &str) -> Option<Number> {
    let (sign, body) = match s.as_bytes().first()? {
        b'+' => ("", &s[1..]),
        b'-' => ("-", &s[1..]),
        _ => ("", s),
    };

    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (body, None),
    };
    let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !frac_part.is_none_or(all_digits) {
        return None;
    }

    match frac_part {
        None if int_part.is_empty() => None,
        None => match format!("{sign}{int_part}").parse::<i64>() {
            Ok(v) => Some(Number::Int(v)),
            Err(_) => format!("{sign}{int_part}")
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Number::Float),
        },
        Some(f) if int_part.is_empty() && f.is_empty() => None,
        Some(f) => {
            let int_part = if int_part.is_empty() { "0" } else { int_part };
            let f = if f.is_empty() { "0" } else { f };
            format!("{sign}{int_part}.{f}")
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Number::Float)
        }
    }
}

/// Pick the column's numeric kind: [`DataType::Int64`] if every value is whole, otherwise
/// [`DataType::Float64`]. An empty column is `Int64`.
pub(crate) fn numeric_kind<'a, I>(numbers: I) -> DataType
where
    I: IntoIterator<Item = &'a Number>,
{
    if numbers.into_iter().all(|n| n.is_whole()) {
        DataType::Int64
    } else {
        DataType::Float64
    }
}

/// Materialize a number as a cell of the given numeric kind.
///
/// Whole values beyond the `i64` range stay `Float64` even in an `Int64` column; the saver still
/// writes them without a fractional part.
pub(crate) fn to_value(n: Number, kind: DataType) -> Value {
    match (kind, n.as_i64()) {
        (DataType::Int64, Some(v)) => Value::Int64(v),
        _ => Value::Float64(n.as_f64()),
    }
}
