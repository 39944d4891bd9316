use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use csv_pivot::reshape::{
    reshape, CompositeObserver, FileObserver, ReshapeContext, ReshapeDirection, ReshapeObserver,
    ReshapeOptions, ReshapeRequest, ReshapeSeverity, ReshapeStats, ReshapeWarning,
};
use csv_pivot::types::{Schema, Table, Value};

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<ReshapeStats>>,
    warnings: Mutex<Vec<ReshapeWarning>>,
    failures: Mutex<Vec<ReshapeSeverity>>,
    alerts: Mutex<Vec<ReshapeSeverity>>,
}

impl ReshapeObserver for RecordingObserver {
    fn on_success(&self, _ctx: &ReshapeContext, stats: ReshapeStats) {
        self.successes.lock().unwrap().push(stats);
    }

    fn on_warning(&self, _ctx: &ReshapeContext, warning: &ReshapeWarning) {
        self.warnings.lock().unwrap().push(warning.clone());
    }

    fn on_failure(
        &self,
        _ctx: &ReshapeContext,
        severity: ReshapeSeverity,
        _error: &csv_pivot::Error,
    ) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &ReshapeContext, severity: ReshapeSeverity, _error: &csv_pivot::Error) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn options_with(obs: Arc<RecordingObserver>, alert_at_or_above: ReshapeSeverity) -> ReshapeOptions {
    ReshapeOptions {
        observer: Some(obs),
        alert_at_or_above,
        ..Default::default()
    }
}

fn rows_table() -> Table {
    Table::new(
        Schema::utf8(["project", "designator", "volume"]),
        vec![
            vec![Value::text("P1"), Value::text("A"), Value::text("2")],
            vec![Value::text("P2"), Value::text("A"), Value::text("n/a")],
        ],
    )
}

#[test]
fn observer_sees_warnings_then_success() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), ReshapeSeverity::Critical);

    let out = reshape(&rows_table(), ReshapeDirection::RowsToColumns, &opts).unwrap();

    assert_eq!(*obs.warnings.lock().unwrap(), out.warnings);
    assert_eq!(
        *obs.successes.lock().unwrap(),
        vec![ReshapeStats {
            input_rows: 2,
            output_rows: 1,
            output_columns: 3,
            warnings: 1,
        }]
    );
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());
    let mut req = ReshapeRequest::new(
        "tests/fixtures/does_not_exist.csv",
        ReshapeDirection::ColumnsToRows,
    );
    req.options = options_with(obs.clone(), ReshapeSeverity::Critical);

    let _ = req.run().unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![ReshapeSeverity::Critical]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![ReshapeSeverity::Critical]);
}

#[test]
fn missing_column_is_error_severity_without_alert() {
    let obs = Arc::new(RecordingObserver::default());
    let mut opts = options_with(obs.clone(), ReshapeSeverity::Critical);
    opts.roles.value_column = "nonexistent".to_string();

    let _ = reshape(&rows_table(), ReshapeDirection::RowsToColumns, &opts).unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![ReshapeSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn nothing_to_pivot_is_reported_as_warning() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), ReshapeSeverity::Warning);
    let empty = Table::new(Schema::utf8(["project", "designator", "volume"]), vec![]);

    let err = reshape(&empty, ReshapeDirection::RowsToColumns, &opts).unwrap_err();

    assert!(err.is_noop());
    assert_eq!(*obs.failures.lock().unwrap(), vec![ReshapeSeverity::Warning]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![ReshapeSeverity::Warning]);
}

#[test]
fn file_and_composite_observers_fan_out() {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let log_path = std::env::temp_dir().join(format!("csv-pivot-observer-{nanos}.log"));

    let recorder = Arc::new(RecordingObserver::default());
    let recorder_trait: Arc<dyn ReshapeObserver> = recorder.clone();
    let file_trait: Arc<dyn ReshapeObserver> = Arc::new(FileObserver::new(&log_path));
    let composite = CompositeObserver::new(vec![recorder_trait, file_trait]);
    let opts = ReshapeOptions {
        observer: Some(Arc::new(composite)),
        ..Default::default()
    };

    reshape(&rows_table(), ReshapeDirection::RowsToColumns, &opts).unwrap();
    let _ = reshape(&rows_table(), ReshapeDirection::ColumnsToRows, &opts);

    let log = std::fs::read_to_string(&log_path).unwrap();
    let _ = std::fs::remove_file(&log_path);

    assert_eq!(recorder.successes.lock().unwrap().len(), 2);
    assert!(log.contains("ok direction=RowsToColumns source=<memory> rows=2->1 columns=3 warnings=1"));
    assert!(log.contains("warn direction=RowsToColumns"));
    assert!(log.contains("non-numeric value 'n/a'"));
    assert!(log.contains("ok direction=ColumnsToRows"));
}
