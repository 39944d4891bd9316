//! Unified reshape entrypoint.
//!
//! [`reshape`] dispatches to [`super::pivot_to_columns`] or [`super::melt_to_rows_as`] using the
//! column roles in [`ReshapeOptions`], and reports the outcome to an optional
//! [`ReshapeObserver`]. [`ReshapeRequest`] wraps the whole load -> reshape -> save sequence.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::{ColumnRoles, CsvOptions};
use crate::error::{Error, ReshapeResult, Result, TableIoError};
use crate::types::Table;
use crate::{export, ingestion};

use super::observability::{
    unix_ts, ReshapeContext, ReshapeObserver, ReshapeSeverity, ReshapeStats,
};
use super::{melt_to_rows_as, pivot_to_columns, Reshaped};

/// Which way to reshape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReshapeDirection {
    /// Row format -> column format (pivot).
    RowsToColumns,
    /// Column format -> row format (melt).
    ColumnsToRows,
}

impl ReshapeDirection {
    /// Short verb used in default output file names (`pivot` / `melt`).
    pub fn verb(self) -> &'static str {
        match self {
            Self::RowsToColumns => "pivot",
            Self::ColumnsToRows => "melt",
        }
    }
}

/// Options controlling [`reshape`].
///
/// Use [`Default`] for the `designator` / `project` / `volume` column roles.
#[derive(Clone)]
pub struct ReshapeOptions {
    /// Which input columns play the entity/category/value roles. When melting, the category and
    /// value names are used for the two generated columns.
    pub roles: ColumnRoles,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn ReshapeObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ReshapeSeverity,
}

impl fmt::Debug for ReshapeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReshapeOptions")
            .field("roles", &self.roles)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ReshapeOptions {
    fn default() -> Self {
        Self {
            roles: ColumnRoles::default(),
            observer: None,
            alert_at_or_above: ReshapeSeverity::Critical,
        }
    }
}

/// Reshape an in-memory table.
///
/// When an observer is configured, this function reports:
///
/// - `on_warning` for each recorded warning, then `on_success` with row/column stats
/// - `on_failure` on failure, with a computed severity (no-op outcomes are `Warning`)
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// ```rust
/// use csv_pivot::reshape::{reshape, ReshapeDirection, ReshapeOptions};
/// use csv_pivot::types::{Schema, Table, Value};
///
/// let rows = Table::new(
///     Schema::utf8(["project", "designator", "volume"]),
///     vec![vec![Value::text("P1"), Value::text("OS-SM-1"), Value::text("14")]],
/// );
/// let opts = ReshapeOptions::default();
///
/// let wide = reshape(&rows, ReshapeDirection::RowsToColumns, &opts).unwrap();
/// assert_eq!(wide.table.column_names(), vec!["designator", "P1"]);
///
/// let back = reshape(&wide.table, ReshapeDirection::ColumnsToRows, &opts).unwrap();
/// assert_eq!(back.table.column_names(), vec!["designator", "project", "volume"]);
/// ```
pub fn reshape(
    table: &Table,
    direction: ReshapeDirection,
    options: &ReshapeOptions,
) -> ReshapeResult<Reshaped> {
    let ctx = ReshapeContext {
        direction,
        source: None,
    };
    let result = run_reshape(table, direction, &options.roles);
    match &result {
        Ok(out) => report_success(options, &ctx, table, out),
        Err(e) => report_failure(options, &ctx, &Error::Reshape(e.clone())),
    }
    result
}

fn run_reshape(
    table: &Table,
    direction: ReshapeDirection,
    roles: &ColumnRoles,
) -> ReshapeResult<Reshaped> {
    match direction {
        ReshapeDirection::RowsToColumns => pivot_to_columns(
            table,
            &roles.entity_column,
            &roles.category_column,
            &roles.value_column,
        ),
        ReshapeDirection::ColumnsToRows => melt_to_rows_as(
            table,
            &roles.entity_column,
            &roles.category_column,
            &roles.value_column,
        ),
    }
}

fn report_success(options: &ReshapeOptions, ctx: &ReshapeContext, input: &Table, out: &Reshaped) {
    let Some(obs) = options.observer.as_ref() else {
        return;
    };
    for w in &out.warnings {
        obs.on_warning(ctx, w);
    }
    obs.on_success(
        ctx,
        ReshapeStats {
            input_rows: input.row_count(),
            output_rows: out.table.row_count(),
            output_columns: out.table.column_count(),
            warnings: out.warnings.len(),
        },
    );
}

fn report_failure(options: &ReshapeOptions, ctx: &ReshapeContext, error: &Error) {
    if let Some(obs) = options.observer.as_ref() {
        let sev = severity_for_error(error);
        obs.on_failure(ctx, sev, error);
        if sev >= options.alert_at_or_above {
            obs.on_alert(ctx, sev, error);
        }
    }
}

fn severity_for_error(e: &Error) -> ReshapeSeverity {
    match e {
        Error::Reshape(err) if err.is_noop() => ReshapeSeverity::Warning,
        Error::Reshape(_) => ReshapeSeverity::Error,
        Error::TableIo(TableIoError::Io(_)) => ReshapeSeverity::Critical,
        Error::TableIo(TableIoError::Csv(err)) => match err.kind() {
            ::csv::ErrorKind::Io(_) => ReshapeSeverity::Critical,
            _ => ReshapeSeverity::Error,
        },
        Error::TableIo(TableIoError::SchemaMismatch { .. })
        | Error::TableIo(TableIoError::InvalidDelimiter(_)) => ReshapeSeverity::Error,
    }
}

/// An owned load -> reshape -> save job.
///
/// This mirrors the interactive workflow (load a file, convert it, save the result) as a single
/// value that can be queued or handed to [`crate::execution::ExecutionEngine`].
#[derive(Clone)]
pub struct ReshapeRequest {
    /// File to load.
    pub input: PathBuf,
    /// Where to save the result. `None` keeps the result in memory only.
    pub output: Option<PathBuf>,
    /// Which way to reshape.
    pub direction: ReshapeDirection,
    /// Delimiter used for both loading and saving.
    pub csv: CsvOptions,
    /// Column roles and observer.
    pub options: ReshapeOptions,
}

impl fmt::Debug for ReshapeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReshapeRequest")
            .field("input", &self.input)
            .field("output", &self.output)
            .field("direction", &self.direction)
            .field("csv", &self.csv)
            .field("options", &self.options)
            .finish()
    }
}

impl ReshapeRequest {
    /// A request with default roles and delimiter that keeps the result in memory.
    pub fn new(input: impl AsRef<Path>, direction: ReshapeDirection) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: None,
            direction,
            csv: CsvOptions::default(),
            options: ReshapeOptions::default(),
        }
    }

    /// Save the result to `output` as well.
    pub fn with_output(mut self, output: impl AsRef<Path>) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }

    /// File name for saving the result next to the input:
    /// `{input stem}_{pivot|melt}_{unix seconds}.csv`.
    pub fn default_output_name(&self) -> String {
        output_name(&self.input, self.direction, unix_ts())
    }

    /// Save the result next to the input under [`Self::default_output_name`].
    pub fn with_default_output(mut self) -> Self {
        let name = self.default_output_name();
        self.output = Some(self.input.with_file_name(name));
        self
    }

    /// Execute the request.
    ///
    /// Nothing is written when loading or reshaping fails. The observer (if any) sees the
    /// outcome with `source` set to the input path.
    pub fn run(&self) -> Result<Reshaped> {
        let ctx = ReshapeContext {
            direction: self.direction,
            source: Some(self.input.clone()),
        };

        let result = self.run_inner();
        match &result {
            Ok((input, out)) => report_success(&self.options, &ctx, input, out),
            Err(e) => report_failure(&self.options, &ctx, e),
        }
        result.map(|(_, out)| out)
    }

    fn run_inner(&self) -> Result<(Table, Reshaped)> {
        let input = ingestion::read_csv_from_path(&self.input, &self.csv)?;
        let out = run_reshape(&input, self.direction, &self.options.roles)?;
        if let Some(path) = &self.output {
            export::write_csv_to_path(&out.table, path, &self.csv)?;
        }
        Ok((input, out))
    }
}

fn output_name(input: &Path, direction: ReshapeDirection, ts: u64) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "table".to_string());
    format!("{stem}_{}_{ts}.csv", direction.verb())
}
