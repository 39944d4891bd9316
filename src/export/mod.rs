//! Writing a [`crate::types::Table`] back to delimited text.

pub mod csv;

pub use self::csv::{write_csv_to_path, write_csv_to_string, write_csv_to_writer};
