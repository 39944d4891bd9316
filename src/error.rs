use thiserror::Error;

/// Convenience result type for reshape operations.
pub type ReshapeResult<T> = std::result::Result<T, ReshapeError>;

/// Convenience result type for loading and saving tables.
pub type TableIoResult<T> = std::result::Result<T, TableIoError>;

/// Convenience result type for the load -> reshape -> save pipeline.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type returned by [`crate::reshape::pivot_to_columns`] and
/// [`crate::reshape::melt_to_rows`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReshapeError {
    /// A required column role does not exist in the input table's header.
    #[error("missing column '{0}'")]
    MissingColumn(String),

    /// Pivot found no usable rows, so there are no category values to turn into columns.
    #[error("nothing to pivot: no category values found")]
    EmptyCategorySet,

    /// Melt found no columns besides the entity column.
    #[error("nothing to melt: no category columns besides the entity column")]
    NoCategoryColumns,

    /// A generated column name would collide with another output column.
    #[error("output column '{0}' would appear twice")]
    ColumnNameConflict(String),
}

impl ReshapeError {
    /// `true` for structurally valid input with nothing to transform.
    ///
    /// Callers should present these as a no-op rather than a failure.
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::EmptyCategorySet | Self::NoCategoryColumns)
    }
}

/// Error type returned by the CSV loader and saver.
#[derive(Debug, Error)]
pub enum TableIoError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV format error (e.g. a row with the wrong number of fields).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The header row is unusable (empty or duplicated column names).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A delimiter that is not a single ASCII character or tab.
    #[error("invalid delimiter '{0}': expected a single ASCII character or 'tab'")]
    InvalidDelimiter(String),
}

/// Top-level error for [`crate::reshape::ReshapeRequest::run`].
#[derive(Debug, Error)]
pub enum Error {
    /// Loading or saving failed.
    #[error(transparent)]
    TableIo(#[from] TableIoError),

    /// The reshape itself failed.
    #[error(transparent)]
    Reshape(#[from] ReshapeError),
}
