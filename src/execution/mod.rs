//! Running independent reshape jobs in parallel.
//!
//! The reshape engine is pure, so separate tables can be reshaped concurrently without any
//! coordination. [`ExecutionEngine`] does that on a dedicated `rayon` pool and keeps
//! [`ExecutionMetrics`] that callers can snapshot at any time.
//!
//! An engine runs one batch at a time: concurrent calls on the same engine queue up, so the
//! metrics always describe a single run.

mod metrics;

use std::sync::{Arc, Mutex};
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{ReshapeResult, Result};
use crate::reshape::{reshape, ReshapeDirection, ReshapeOptions, ReshapeRequest, Reshaped};
use crate::types::Table;

pub use metrics::{ExecutionMetrics, ExecutionMetricsSnapshot};

/// Configuration for the [`ExecutionEngine`].
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Number of worker threads used by the engine.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        let n = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            num_threads: Some(n),
        }
    }
}

/// An in-memory reshape job.
#[derive(Debug, Clone)]
pub struct ReshapeJob {
    /// Table to reshape.
    pub table: Table,
    /// Which way to reshape it.
    pub direction: ReshapeDirection,
}

/// Runs reshape jobs on a thread pool.
pub struct ExecutionEngine {
    pool: ThreadPool,
    metrics: Arc<ExecutionMetrics>,
    run_lock: Mutex<()>,
}

impl ExecutionEngine {
    /// Create a new engine with the given options.
    ///
    /// # Errors
    ///
    /// Returns the pool builder's error if the thread pool cannot be created.
    pub fn new(opts: ExecutionOptions) -> std::result::Result<Self, rayon::ThreadPoolBuildError> {
        let n_threads = opts
            .num_threads
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
            .max(1);

        let pool = ThreadPoolBuilder::new().num_threads(n_threads).build()?;

        Ok(Self {
            pool,
            metrics: Arc::new(ExecutionMetrics::new()),
            run_lock: Mutex::new(()),
        })
    }

    /// Get a handle to real-time execution metrics.
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Reshape every job in parallel. Results come back in job order.
    pub fn reshape_all(
        &self,
        jobs: &[ReshapeJob],
        options: &ReshapeOptions,
    ) -> Vec<ReshapeResult<Reshaped>> {
        self.run(jobs, |job| reshape(&job.table, job.direction, options))
    }

    /// Run every file request (load -> reshape -> save) in parallel. Results come back in
    /// request order.
    pub fn run_requests(&self, requests: &[ReshapeRequest]) -> Vec<Result<Reshaped>> {
        self.run(requests, ReshapeRequest::run)
    }

    fn run<J, E, F>(&self, jobs: &[J], f: F) -> Vec<std::result::Result<Reshaped, E>>
    where
        J: Sync,
        E: Send,
        F: Fn(&J) -> std::result::Result<Reshaped, E> + Send + Sync,
    {
        let _run = self.run_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let start = Instant::now();
        self.metrics.begin_run();

        let out: Vec<_> = self.pool.install(|| {
            jobs.par_iter()
                .map(|job| {
                    self.metrics.on_job_start();
                    let result = f(job);
                    match &result {
                        Ok(r) => self.metrics.on_job_success(r.warnings.len()),
                        Err(_) => self.metrics.on_job_failure(),
                    }
                    result
                })
                .collect()
        });

        self.metrics.end_run(start.elapsed());
        out
    }
}
