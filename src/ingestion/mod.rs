//! Loading delimited text into a [`crate::types::Table`].
//!
//! The loader does no cleaning: cells arrive as raw text so the reshape engine can apply its own
//! trimming and numeric coercion rules and report what it changed.

pub mod csv;

pub use self::csv::{read_csv_from_path, read_csv_from_reader, read_csv_from_str};
