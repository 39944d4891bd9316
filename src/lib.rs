//! `csv-pivot` reshapes tabular CSV data between two equivalent layouts:
//!
//! - **row format** (long/tidy): one `(entity, category, value)` observation per row, e.g.
//!   `project;designator;volume`
//! - **column format** (wide): one row per entity and one numeric column per category, e.g.
//!   `designator;P1;P2;P3`
//!
//! The core is the reshape engine in [`reshape`]: [`reshape::pivot_to_columns`] (row -> column)
//! and [`reshape::melt_to_rows`] (column -> row), plus the cleaning rules they share (whitespace
//! trimming, numeric coercion with warnings, zero handling, last-write-wins on duplicate keys,
//! per-column integer/decimal tagging).
//!
//! Around it sit a thin CSV loader ([`ingestion`]), a saver that honours the integer tagging
//! ([`export`]), caller configuration ([`config`]) and a parallel batch runner ([`execution`]).
//!
//! ## Quick example: file to file
//!
//! ```no_run
//! use csv_pivot::reshape::{ReshapeDirection, ReshapeRequest};
//!
//! # fn main() -> Result<(), csv_pivot::Error> {
//! let out = ReshapeRequest::new("pivot_row.csv", ReshapeDirection::RowsToColumns)
//!     .with_output("output_column_format.csv")
//!     .run()?;
//! let (rows, cols) = out.table.shape();
//! println!("{rows} designators x {} projects", cols - 1);
//! for w in &out.warnings {
//!     eprintln!("warning: {w}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Quick example: in memory
//!
//! ```rust
//! use csv_pivot::config::CsvOptions;
//! use csv_pivot::export::write_csv_to_string;
//! use csv_pivot::ingestion::read_csv_from_str;
//! use csv_pivot::reshape::pivot_to_columns;
//!
//! let input = "project;designator;volume\nP1;OS-SM-1;14\nP2;OS-SM-1;13\nP1;SC-OF-SM-24;2\n";
//! let table = read_csv_from_str(input, &CsvOptions::default()).unwrap();
//!
//! let wide = pivot_to_columns(&table, "designator", "project", "volume").unwrap();
//! let csv = write_csv_to_string(&wide.table, &CsvOptions::default()).unwrap();
//! assert_eq!(csv, "designator;P1;P2\nOS-SM-1;14;13\nSC-OF-SM-24;2;0\n");
//! ```
//!
//! ## Modules
//!
//! - [`types`]: the in-memory [`types::Table`]
//! - [`reshape`]: pivot, melt, cleaning rules, observers
//! - [`ingestion`]: CSV loading
//! - [`export`]: CSV saving
//! - [`config`]: column roles and delimiter options
//! - [`execution`]: parallel batch reshaping
//! - [`error`]: error types

pub mod config;
pub mod error;
pub mod execution;
pub mod export;
pub mod ingestion;
pub mod reshape;
pub mod types;

pub use error::{Error, ReshapeError, ReshapeResult, Result, TableIoError, TableIoResult};
