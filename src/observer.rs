//! Diagnostics hooks for catalog construction and reporting.
//!
//! The engine never prints on its own. Anything worth telling a human (a row that could not get a
//! course id, a report that matched nothing) is sent as a [`CatalogEvent`] to the configured
//! [`CatalogObserver`], if any.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::CatalogResult;

/// Severity classification for catalog events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CatalogSeverity {
    /// Informational event.
    Info,
    /// Non-fatal problem; the affected record or call still completed.
    Warning,
}

impl CatalogSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            CatalogSeverity::Info => "info",
            CatalogSeverity::Warning => "warning",
        }
    }
}

/// Events emitted by the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    /// Construction finished.
    CatalogBuilt { records: usize, degraded: usize },
    /// A row was wrapped without a course id because source fields were absent.
    RecordDegraded { row: usize, missing: Vec<String> },
    /// A report matched no records.
    EmptyResult { report: &'static str, filter: String },
}

impl CatalogEvent {
    /// Short machine-readable tag, used as the event name in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogEvent::CatalogBuilt { .. } => "built",
            CatalogEvent::RecordDegraded { .. } => "record_degraded",
            CatalogEvent::EmptyResult { .. } => "empty_result",
        }
    }

    pub fn severity(&self) -> CatalogSeverity {
        match self {
            CatalogEvent::RecordDegraded { .. } => CatalogSeverity::Warning,
            CatalogEvent::CatalogBuilt { .. } | CatalogEvent::EmptyResult { .. } => {
                CatalogSeverity::Info
            }
        }
    }
}

impl fmt::Display for CatalogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogEvent::CatalogBuilt { records, degraded } => {
                write!(f, "catalog built records={records} degraded={degraded}")
            }
            CatalogEvent::RecordDegraded { row, missing } => {
                write!(f, "row {row} has no course id, missing fields {missing:?}")
            }
            CatalogEvent::EmptyResult { report, filter } => {
                write!(f, "{report} report found nothing for '{filter}'")
            }
        }
    }
}

/// Observer hook for catalog events.
pub trait CatalogObserver: Send + Sync {
    fn on_event(&self, event: &CatalogEvent);
}

/// Sends every event to each of its observers, in the order they were added.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn CatalogObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn CatalogObserver>>) -> Self {
        Self { observers }
    }

    /// Adds `observer` after the ones already registered.
    pub fn with(mut self, observer: Arc<dyn CatalogObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl FromIterator<Arc<dyn CatalogObserver>> for CompositeObserver {
    fn from_iter<I: IntoIterator<Item = Arc<dyn CatalogObserver>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompositeObserver({} observers)", self.observers.len())
    }
}

impl CatalogObserver for CompositeObserver {
    fn on_event(&self, event: &CatalogEvent) {
        self.observers.iter().for_each(|o| o.on_event(event));
    }
}

/// Logs catalog events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver {
    /// Events below this severity are dropped.
    pub min_severity: Option<CatalogSeverity>,
}

impl CatalogObserver for StdErrObserver {
    fn on_event(&self, event: &CatalogEvent) {
        let severity = event.severity();
        if self.min_severity.is_some_and(|min| severity < min) {
            return;
        }
        eprintln!("[catalog][{severity:?}] {event}");
    }
}

/// Appends one line per catalog event to a log file:
///
/// ```text
/// 1700000000 catalog.empty_result severity=info publisher report found nothing for 'Taylor'
/// ```
///
/// The file is opened once, in append mode. Write failures are ignored.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    min_severity: Option<CatalogSeverity>,
    file: Mutex<File>,
}

impl FileObserver {
    /// Opens (creating if needed) the log file at `path`.
    pub fn open(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            min_severity: None,
            file: Mutex::new(file),
        })
    }

    /// Drops events below `min`.
    pub fn with_min_severity(mut self, min: CatalogSeverity) -> Self {
        self.min_severity = Some(min);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogObserver for FileObserver {
    fn on_event(&self, event: &CatalogEvent) {
        let severity = event.severity();
        if self.min_severity.is_some_and(|min| severity < min) {
            return;
        }
        let line = format!(
            "{} catalog.{} severity={} {event}\n",
            unix_ts(),
            event.kind(),
            severity.as_str()
        );
        if let Ok(mut file) = self.file.lock() {
            let _ = file.write_all(line.as_bytes());
        }
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}
