//! The reshape engine: row format <-> column format.
//!
//! - [`pivot_to_columns()`]: row (long) format -> column (wide) format
//! - [`melt_to_rows()`] / [`melt_to_rows_as()`]: column format -> row format
//! - [`reshape()`]: either direction, driven by [`ReshapeOptions`], with observer reporting
//!
//! Both operations are pure: they borrow the input [`Table`], never modify it, and return a new
//! table plus any [`ReshapeWarning`]s recorded along the way. A warning never aborts the
//! transformation; only a [`crate::error::ReshapeError`] does.
//!
//! ## Cleaning rules
//!
//! - Entity and category strings are trimmed (Unicode whitespace, both ends). Case and inner
//!   whitespace are kept.
//! - Values must be plain integer or decimal literals with an optional sign. Anything else
//!   becomes `0` and is reported. Missing cells become `0` silently.
//! - Numeric output columns are tagged [`crate::types::DataType::Int64`] when every value is
//!   whole and [`crate::types::DataType::Float64`] otherwise, so the saver can render them.
//!
//! ## Example: pivot, then melt back
//!
//! ```rust
//! use csv_pivot::reshape::{melt_to_rows, pivot_to_columns};
//! use csv_pivot::types::{Schema, Table, Value};
//!
//! let rows = Table::new(
//!     Schema::utf8(["project", "designator", "volume"]),
//!     vec![
//!         vec![Value::text("P1"), Value::text("SC-OF-SM-24"), Value::text("2")],
//!         vec![Value::text("P1"), Value::text("OS-SM-1"), Value::text("14")],
//!         vec![Value::text("P2"), Value::text("SC-OF-SM-24"), Value::text("1")],
//!     ],
//! );
//!
//! let wide = pivot_to_columns(&rows, "designator", "project", "volume").unwrap();
//! assert_eq!(wide.table.shape(), (2, 3));
//!
//! // The (OS-SM-1, P2) zero is dropped on the way back.
//! let long = melt_to_rows(&wide.table, "designator").unwrap();
//! assert_eq!(long.table.row_count(), 3);
//! ```

mod clean;
pub mod melt;
pub mod observability;
pub mod pivot;
pub mod unified;

use crate::error::{ReshapeError, ReshapeResult};
use crate::types::Table;

pub use clean::ReshapeWarning;
pub use melt::{melt_to_rows, melt_to_rows_as};
pub use observability::{
    CompositeObserver, FileObserver, ReshapeContext, ReshapeObserver, ReshapeSeverity,
    ReshapeStats, StdErrObserver,
};
pub use pivot::pivot_to_columns;
pub use unified::{reshape, ReshapeDirection, ReshapeOptions, ReshapeRequest};

/// A successful reshape: the new table plus the warnings recorded while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct Reshaped {
    /// The transformed table. Owned; it shares no storage with the input.
    pub table: Table,
    /// Non-fatal conditions, ordered by row.
    pub warnings: Vec<ReshapeWarning>,
}

impl Reshaped {
    /// `true` if nothing was coerced, skipped or overwritten.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

fn column_index(table: &Table, name: &str) -> ReshapeResult<usize> {
    table
        .schema
        .index_of(name)
        .ok_or_else(|| ReshapeError::MissingColumn(name.to_string()))
}
