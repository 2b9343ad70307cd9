use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Execution events emitted by the [`super::ReportEngine`].
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    RunStarted { requests: usize },
    ReportStarted { index: usize, label: String },
    ReportFinished { index: usize, ok: bool },
    RunFinished {
        elapsed: Duration,
        metrics: ReportMetricsSnapshot,
    },
}

/// Observer hook for execution events.
pub trait ExecutionObserver: Send + Sync {
    fn on_event(&self, event: &ExecutionEvent);
}

/// A simple stderr logger for execution events.
#[derive(Default)]
pub struct StdErrExecutionObserver;

impl ExecutionObserver for StdErrExecutionObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        eprintln!("[reports] {event:?}");
    }
}

/// Counters for report runs.
///
/// The engine updates these during execution; callers can snapshot them at any time.
pub struct ReportMetrics {
    runs: AtomicU64,
    reports_ok: AtomicU64,
    reports_failed: AtomicU64,
    last_elapsed_ns: AtomicU64,
}

impl ReportMetrics {
    pub fn new() -> Self {
        Self {
            runs: AtomicU64::new(0),
            reports_ok: AtomicU64::new(0),
            reports_failed: AtomicU64::new(0),
            last_elapsed_ns: AtomicU64::new(0),
        }
    }

    pub fn begin_run(&self) {
        let _ = self.runs.fetch_add(1, Ordering::SeqCst);
    }

    pub fn end_run(&self, elapsed: Duration) {
        self.last_elapsed_ns
            .store(elapsed.as_nanos().min(u64::MAX as u128) as u64, Ordering::SeqCst);
    }

    pub fn on_report(&self, ok: bool) {
        let counter = if ok { &self.reports_ok } else { &self.reports_failed };
        let _ = counter.fetch_add(1, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> ReportMetricsSnapshot {
        let elapsed_ns = self.last_elapsed_ns.load(Ordering::SeqCst);
        ReportMetricsSnapshot {
            runs: self.runs.load(Ordering::SeqCst),
            reports_ok: self.reports_ok.load(Ordering::SeqCst),
            reports_failed: self.reports_failed.load(Ordering::SeqCst),
            last_elapsed: (elapsed_ns > 0).then(|| Duration::from_nanos(elapsed_ns)),
        }
    }
}

impl Default for ReportMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable snapshot of [`ReportMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportMetricsSnapshot {
    pub runs: u64,
    pub reports_ok: u64,
    pub reports_failed: u64,
    pub last_elapsed: Option<Duration>,
}

impl fmt::Display for ReportMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "runs={}, reports_ok={}, reports_failed={}, last_elapsed={:?}",
            self.runs, self.reports_ok, self.reports_failed, self.last_elapsed
        )
    }
}
