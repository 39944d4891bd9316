use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Real-time metrics for an execution run.
///
/// The engine updates these counters while jobs run; callers can snapshot them at any time.
pub struct ExecutionMetrics {
    run_id: AtomicU64,
    elapsed_ns: AtomicU64,

    jobs_started: AtomicU64,
    jobs_succeeded: AtomicU64,
    jobs_failed: AtomicU64,
    warnings: AtomicU64,
}

impl ExecutionMetrics {
    pub fn new() -> Self {
        Self {
            run_id: AtomicU64::new(0),
            elapsed_ns: AtomicU64::new(0),
            jobs_started: AtomicU64::new(0),
            jobs_succeeded: AtomicU64::new(0),
            jobs_failed: AtomicU64::new(0),
            warnings: AtomicU64::new(0),
        }
    }

    /// Start a new run: bump `run_id` and zero the counters. Callers serialize runs.
    pub fn begin_run(&self) {
        let _ = self.run_id.fetch_add(1, Ordering::SeqCst);

        self.elapsed_ns.store(0, Ordering::SeqCst);
        self.jobs_started.store(0, Ordering::SeqCst);
        self.jobs_succeeded.store(0, Ordering::SeqCst);
        self.jobs_failed.store(0, Ordering::SeqCst);
        self.warnings.store(0, Ordering::SeqCst);
    }

    pub fn end_run(&self, elapsed: Duration) {
        // Never store 0 so a finished run always reports an elapsed time.
        let ns = elapsed.as_nanos().clamp(1, u64::MAX as u128) as u64;
        self.elapsed_ns.store(ns, Ordering::SeqCst);
    }

    pub fn on_job_start(&self) {
        let _ = self.jobs_started.fetch_add(1, Ordering::SeqCst);
    }

    pub fn on_job_success(&self, warnings: usize) {
        let _ = self.jobs_succeeded.fetch_add(1, Ordering::SeqCst);
        let _ = self.warnings.fetch_add(warnings as u64, Ordering::SeqCst);
    }

    pub fn on_job_failure(&self) {
        let _ = self.jobs_failed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> ExecutionMetricsSnapshot {
        let elapsed_ns = self.elapsed_ns.load(Ordering::SeqCst);
        let elapsed = if elapsed_ns > 0 {
            Some(Duration::from_nanos(elapsed_ns))
        } else {
            None
        };

        ExecutionMetricsSnapshot {
            run_id: self.run_id.load(Ordering::SeqCst),
            elapsed,
            jobs_started: self.jobs_started.load(Ordering::SeqCst),
            jobs_succeeded: self.jobs_succeeded.load(Ordering::SeqCst),
            jobs_failed: self.jobs_failed.load(Ordering::SeqCst),
            warnings: self.warnings.load(Ordering::SeqCst),
        }
    }
}

impl Default for ExecutionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable snapshot of [`ExecutionMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionMetricsSnapshot {
    pub run_id: u64,
    pub elapsed: Option<Duration>,
    pub jobs_started: u64,
    pub jobs_succeeded: u64,
    pub jobs_failed: u64,
    pub warnings: u64,
}

impl fmt::Display for ExecutionMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run_id={}, jobs={} (ok={}, failed={}), warnings={}, elapsed={:?}",
            self.run_id,
            self.jobs_started,
            self.jobs_succeeded,
            self.jobs_failed,
            self.warnings,
            self.elapsed
        )
    }
}
