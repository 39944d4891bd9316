//! Caller-supplied configuration: which columns play which role, and how delimited text is split.
//!
//! Both types deserialize from JSON with defaults for omitted fields:
//!
//! ```rust
//! use csv_pivot::config::{ColumnRoles, CsvOptions};
//!
//! let roles = ColumnRoles::from_json(r#"{ "value_column": "qty" }"#).unwrap();
//! assert_eq!(roles.entity_column, "designator");
//! assert_eq!(roles.value_column, "qty");
//!
//! let csv = CsvOptions::from_json(r#"{ "delimiter": "tab" }"#).unwrap();
//! assert_eq!(csv.delimiter.as_byte(), b'\t');
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TableIoError;

/// Default entity column name.
pub const DEFAULT_ENTITY_COLUMN: &str = "designator";
/// Default category column name.
pub const DEFAULT_CATEGORY_COLUMN: &str = "project";
/// Default value column name.
pub const DEFAULT_VALUE_COLUMN: &str = "volume";

/// Column-role selection passed into the reshape engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnRoles {
    /// Identifies a row in column format (e.g. a designator).
    pub entity_column: String,
    /// Values become output columns when pivoting; generated column name when melting.
    pub category_column: String,
    /// Numeric quantity; generated column name when melting.
    pub value_column: String,
}

impl Default for ColumnRoles {
    fn default() -> Self {
        Self {
            entity_column: DEFAULT_ENTITY_COLUMN.to_string(),
            category_column: DEFAULT_CATEGORY_COLUMN.to_string(),
            value_column: DEFAULT_VALUE_COLUMN.to_string(),
        }
    }
}

impl ColumnRoles {
    /// Parse roles from a JSON object; omitted keys keep their defaults.
    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

/// Field separator for delimited text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Delimiter(u8);

impl Delimiter {
    /// `;`
    pub const SEMICOLON: Self = Self(b';');
    /// `,`
    pub const COMMA: Self = Self(b',');
    /// Tab.
    pub const TAB: Self = Self(b'\t');
    /// `|`
    pub const PIPE: Self = Self(b'|');

    /// The separator byte handed to the `csv` crate.
    pub fn as_byte(self) -> u8 {
        self.0
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Self::SEMICOLON
    }
}

impl FromStr for Delimiter {
    type Err = TableIoError;

    /// Accepts one ASCII character, an escaped `\t`, or the word `tab`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("tab") || s == "\\t" {
            return Ok(Self::TAB);
        }
        match s.as_bytes() {
            [b] if b.is_ascii() && *b != b'\n' && *b != b'\r' && *b != b'"' => Ok(Self(*b)),
            _ => Err(TableIoError::InvalidDelimiter(s.to_string())),
        }
    }
}

impl TryFrom<String> for Delimiter {
    type Error = TableIoError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Delimiter> for String {
    fn from(d: Delimiter) -> Self {
        d.to_string()
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            b'\t' => f.write_str("tab"),
            b => write!(f, "{}", b as char),
        }
    }
}

/// Options for the CSV loader and saver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Field separator (default `;`).
    pub delimiter: Delimiter,
}

impl CsvOptions {
    /// Options with the given delimiter.
    pub fn with_delimiter(delimiter: Delimiter) -> Self {
        Self { delimiter }
    }

    /// Parse options from a JSON object; omitted keys keep their defaults.
    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::{ColumnRoles, CsvOptions, Delimiter};

    #[test]
    fn roles_default_to_designator_project_volume() {
        let roles = ColumnRoles::default();
        assert_eq!(roles.entity_column, "designator");
        assert_eq!(roles.category_column, "project");
        assert_eq!(roles.value_column, "volume");
    }

    #[test]
    fn roles_from_json_fills_missing_keys() {
        let roles = ColumnRoles::from_json(r#"{"entity_column":"item"}"#).unwrap();
        assert_eq!(roles.entity_column, "item");
        assert_eq!(roles.category_column, "project");
        assert!(ColumnRoles::from_json("not json").is_err());
    }

    #[test]
    fn delimiter_parsing() {
        assert_eq!(";".parse::<Delimiter>().unwrap(), Delimiter::SEMICOLON);
        assert_eq!("|".parse::<Delimiter>().unwrap(), Delimiter::PIPE);
        assert_eq!("TAB".parse::<Delimiter>().unwrap(), Delimiter::TAB);
        assert_eq!("\\t".parse::<Delimiter>().unwrap(), Delimiter::TAB);
        assert_eq!("\t".parse::<Delimiter>().unwrap(), Delimiter::TAB);
        assert!(";;".parse::<Delimiter>().is_err());
        assert!("".parse::<Delimiter>().is_err());
        assert!("é".parse::<Delimiter>().is_err());
    }

    #[test]
    fn csv_options_json_round_trip() {
        let opts = CsvOptions::with_delimiter(Delimiter::TAB);
        let json = serde_json::to_string(&opts).unwrap();
        assert_eq!(json, r#"{"delimiter":"tab"}"#);
        assert_eq!(CsvOptions::from_json(&json).unwrap(), opts);
        assert_eq!(CsvOptions::from_json("{}").unwrap().delimiter, Delimiter::SEMICOLON);
        assert!(CsvOptions::from_json(r#"{"delimiter":"ab"}"#).is_err());
    }
}
