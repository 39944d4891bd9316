use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Error;

use super::clean::ReshapeWarning;
use super::unified::ReshapeDirection;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReshapeSeverity {
    /// Informational event.
    Info,
    /// Non-fatal event: a coercion warning, or a reshape with nothing to transform.
    Warning,
    /// The reshape failed (missing column, malformed CSV, ...).
    Error,
    /// Infrastructure failure, typically I/O.
    Critical,
}

/// Context about a reshape attempt.
#[derive(Debug, Clone)]
pub struct ReshapeContext {
    /// Which way the table is being reshaped.
    pub direction: ReshapeDirection,
    /// Input file, when the table was loaded from one.
    pub source: Option<PathBuf>,
}

impl ReshapeContext {
    fn source_display(&self) -> String {
        self.source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<memory>".to_string())
    }
}

/// Stats reported on a successful reshape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReshapeStats {
    /// Rows in the input table.
    pub input_rows: usize,
    /// Rows in the output table.
    pub output_rows: usize,
    /// Columns in the output table.
    pub output_columns: usize,
    /// Number of recorded warnings.
    pub warnings: usize,
}

/// Observer interface for reshape outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait ReshapeObserver: Send + Sync {
    /// Called when a reshape succeeds (possibly with warnings).
    fn on_success(&self, _ctx: &ReshapeContext, _stats: ReshapeStats) {}

    /// Called once per recorded warning, before `on_success`.
    fn on_warning(&self, _ctx: &ReshapeContext, _warning: &ReshapeWarning) {}

    /// Called when a reshape fails.
    fn on_failure(&self, _ctx: &ReshapeContext, _severity: ReshapeSeverity, _error: &Error) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ReshapeContext, severity: ReshapeSeverity, error: &Error) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ReshapeObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ReshapeObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ReshapeObserver for CompositeObserver {
    fn on_success(&self, ctx: &ReshapeContext, stats: ReshapeStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_warning(&self, ctx: &ReshapeContext, warning: &ReshapeWarning) {
        for o in &self.observers {
            o.on_warning(ctx, warning);
        }
    }

    fn on_failure(&self, ctx: &ReshapeContext, severity: ReshapeSeverity, error: &Error) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &ReshapeContext, severity: ReshapeSeverity, error: &Error) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs reshape events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ReshapeObserver for StdErrObserver {
    fn on_success(&self, ctx: &ReshapeContext, stats: ReshapeStats) {
        eprintln!(
            "[reshape][ok] direction={:?} source={} rows={}->{} columns={} warnings={}",
            ctx.direction,
            ctx.source_display(),
            stats.input_rows,
            stats.output_rows,
            stats.output_columns,
            stats.warnings
        );
    }

    fn on_warning(&self, ctx: &ReshapeContext, warning: &ReshapeWarning) {
        eprintln!(
            "[reshape][Warning] direction={:?} source={} {}",
            ctx.direction,
            ctx.source_display(),
            warning
        );
    }

    fn on_failure(&self, ctx: &ReshapeContext, severity: ReshapeSeverity, error: &Error) {
        eprintln!(
            "[reshape][{:?}] direction={:?} source={} err={}",
            severity,
            ctx.direction,
            ctx.source_display(),
            error
        );
    }

    fn on_alert(&self, ctx: &ReshapeContext, severity: ReshapeSeverity, error: &Error) {
        eprintln!(
            "[ALERT][reshape][{:?}] direction={:?} source={} err={}",
            severity,
            ctx.direction,
            ctx.source_display(),
            error
        );
    }
}

/// Appends reshape events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl ReshapeObserver for FileObserver {
    fn on_success(&self, ctx: &ReshapeContext, stats: ReshapeStats) {
        self.append_line(&format!(
            "{} ok direction={:?} source={} rows={}->{} columns={} warnings={}",
            unix_ts(),
            ctx.direction,
            ctx.source_display(),
            stats.input_rows,
            stats.output_rows,
            stats.output_columns,
            stats.warnings
        ));
    }

    fn on_warning(&self, ctx: &ReshapeContext, warning: &ReshapeWarning) {
        self.append_line(&format!(
            "{} warn direction={:?} source={} {}",
            unix_ts(),
            ctx.direction,
            ctx.source_display(),
            warning
        ));
    }

    fn on_failure(&self, ctx: &ReshapeContext, severity: ReshapeSeverity, error: &Error) {
        self.append_line(&format!(
            "{} fail severity={:?} direction={:?} source={} err={}",
            unix_ts(),
            severity,
            ctx.direction,
            ctx.source_display(),
            error
        ));
    }

    fn on_alert(&self, ctx: &ReshapeContext, severity: ReshapeSeverity, error: &Error) {
        self.append_line(&format!(
            "{} ALERT severity={:?} direction={:?} source={} err={}",
            unix_ts(),
            severity,
            ctx.direction,
            ctx.source_display(),
            error
        ));
    }
}

pub(crate) fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
