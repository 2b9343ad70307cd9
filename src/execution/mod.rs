//! Concurrent report generation.
//!
//! A [`Catalog`] is immutable once built, so several reports can be computed at the same time
//! against one shared catalog. [`ReportEngine`] runs a batch of [`ReportRequest`]s on a rayon
//! thread pool and returns the results in request order, with observer hooks and counters for
//! monitoring.

mod observer;

use std::sync::Arc;
use std::time::Instant;

use rayon::ThreadPool;
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::error::CatalogResult;
use crate::report::{BookReport, CountReport, ReportKind};

pub use observer::{
    ExecutionEvent, ExecutionObserver, ReportMetrics, ReportMetricsSnapshot, StdErrExecutionObserver,
};

/// Configuration for the [`ReportEngine`].
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    /// Number of worker threads.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
}

/// One report to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportRequest {
    /// [`Catalog::book_report`] with a title filter.
    Book(String),
    /// [`Catalog::count_report`] for a kind and filter.
    Count(ReportKind, String),
}

impl ReportRequest {
    pub fn department(filter: impl Into<String>) -> Self {
        ReportRequest::Count(ReportKind::Department, filter.into())
    }

    pub fn publisher(filter: impl Into<String>) -> Self {
        ReportRequest::Count(ReportKind::Publisher, filter.into())
    }

    pub fn label(&self) -> &str {
        match self {
            ReportRequest::Book(_) => "book",
            ReportRequest::Count(kind, _) => kind.label(),
        }
    }

    /// Run this request against `catalog` on the current thread.
    pub fn run(&self, catalog: &Catalog) -> CatalogResult<ReportOutput> {
        match self {
            ReportRequest::Book(filter) => catalog.book_report(filter).map(ReportOutput::Book),
            ReportRequest::Count(kind, filter) => {
                catalog.count_report(kind, filter).map(ReportOutput::Count)
            }
        }
    }
}

/// Result of one [`ReportRequest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum ReportOutput {
    Book(BookReport),
    Count(CountReport),
}

impl ReportOutput {
    pub fn is_empty(&self) -> bool {
        match self {
            ReportOutput::Book(r) => r.is_empty(),
            ReportOutput::Count(r) => r.is_empty(),
        }
    }
}

/// Runs report batches concurrently over a shared catalog.
pub struct ReportEngine {
    pool: ThreadPool,
    observer: Option<Arc<dyn ExecutionObserver>>,
    metrics: Arc<ReportMetrics>,
}

impl ReportEngine {
    /// Create a new engine with the given options.
    ///
    /// `num_threads == Some(0)` is treated as one thread. Fails if the pool cannot be built.
    pub fn new(opts: ExecutionOptions) -> CatalogResult<Self> {
        let n_threads = opts
            .num_threads
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
            .max(1);

        let pool = ThreadPoolBuilder::new().num_threads(n_threads).build()?;

        Ok(Self {
            pool,
            observer: None,
            metrics: Arc::new(ReportMetrics::new()),
        })
    }

    /// Attach an observer for execution events.
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to the engine's counters.
    pub fn metrics(&self) -> Arc<ReportMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Number of worker threads.
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Generate every request against `catalog`; results are in request order.
    ///
    /// A failing request (e.g. an invalid filter pattern) only fails its own slot.
    pub fn run(
        &self,
        catalog: &Catalog,
        requests: &[ReportRequest],
    ) -> Vec<CatalogResult<ReportOutput>> {
        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(ExecutionEvent::RunStarted {
            requests: requests.len(),
        });

        let out: Vec<_> = self.pool.install(|| {
            requests
                .par_iter()
                .enumerate()
                .map(|(index, request)| {
                    self.emit(ExecutionEvent::ReportStarted {
                        index,
                        label: request.label().to_string(),
                    });
                    let result = request.run(catalog);
                    self.metrics.on_report(result.is_ok());
                    self.emit(ExecutionEvent::ReportFinished {
                        index,
                        ok: result.is_ok(),
                    });
                    result
                })
                .collect()
        });

        self.metrics.end_run(start.elapsed());
        self.emit(ExecutionEvent::RunFinished {
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });
        out
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}
