//! Grouped count reports.
//!
//! [`count_by_column`] is the generic aggregator: it groups records by the exact value of one
//! field and ranks the groups by size. The department and publisher reports are thin
//! specializations of it ([`Catalog::count_report`]); the book report groups by title and also
//! collects the course ids and sessions of every record in a group.
//!
//! Reports that match nothing are not errors. They come back empty and the catalog observer is
//! told via [`CatalogEvent::EmptyResult`].

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Serialize;

use crate::catalog::{Catalog, sort_by_field};
use crate::error::{CatalogError, CatalogResult};
use crate::observer::CatalogEvent;
use crate::options::FieldNames;
use crate::record::{COURSE_ID, Record};
use crate::search::MATCH_ALL;
use crate::types::Value;

/// One group of a count report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountEntry {
    /// Exact (non-normalized) field value shared by the group.
    pub value: Value,
    pub count: usize,
}

/// One title of a [`BookReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookEntry {
    pub title: Value,
    pub count: usize,
    /// Course id of every record with this title, in scan order (`None` where unset).
    pub courses: Vec<Option<String>>,
    /// Session of every record with this title, in scan order.
    pub sessions: Vec<Value>,
}

/// Which field a count report groups by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportKind {
    /// Groups by course code.
    Department,
    /// Groups by publisher.
    Publisher,
    /// Groups by an arbitrary column.
    Column(String),
}

impl ReportKind {
    pub fn field<'a>(&'a self, fields: &'a FieldNames) -> &'a str {
        match self {
            ReportKind::Department => &fields.course_code,
            ReportKind::Publisher => &fields.publisher,
            ReportKind::Column(name) => name,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ReportKind::Department => "department",
            ReportKind::Publisher => "publisher",
            ReportKind::Column(name) => name,
        }
    }
}

/// Ranked group counts for one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountReport {
    pub label: String,
    pub field: String,
    pub filter: String,
    /// Size of the whole catalog, the denominator of [`CountReport::share`].
    pub total_records: usize,
    /// Groups, largest first; ties in first-seen order.
    pub entries: Vec<CountEntry>,
}

impl CountReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of records counted into some group.
    pub fn matched_records(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Fraction of the whole catalog that `entry` accounts for.
    pub fn share(&self, entry: &CountEntry) -> f64 {
        if self.total_records == 0 {
            return 0.0;
        }
        entry.count as f64 / self.total_records as f64
    }
}

/// Per-title counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookReport {
    pub filter: String,
    /// Titles in lexicographic order.
    pub entries: Vec<BookEntry>,
}

impl BookReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Group `records` by the exact value of `field` and rank the groups by size.
///
/// Records without `field`, or with a missing/empty value, are skipped. The result is sorted by
/// descending count; equal counts keep the order in which their values were first seen.
pub fn count_by_column<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    field: &str,
) -> Vec<CountEntry> {
    let mut groups: HashMap<GroupKey<'a>, usize> = HashMap::new();
    let mut entries: Vec<CountEntry> = Vec::new();

    for record in records {
        let Some(value) = record.get(field) else {
            continue;
        };
        let Some(key) = GroupKey::of(value) else {
            continue;
        };
        match groups.entry(key) {
            Entry::Occupied(slot) => entries[*slot.get()].count += 1,
            Entry::Vacant(slot) => {
                slot.insert(entries.len());
                entries.push(CountEntry {
                    value: value.clone(),
                    count: 1,
                });
            }
        }
    }

    // Stable: ties stay in first-seen order.
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

/// Hashable identity of a non-empty value. Values of different variants never group together.
#[derive(Debug, PartialEq, Eq, Hash)]
enum GroupKey<'a> {
    Int(i64),
    Float(u64),
    Text(&'a str),
    /// Missing or empty value; only the book report groups these.
    Blank,
}

impl<'a> GroupKey<'a> {
    fn of(value: &'a Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Utf8(s) if s.is_empty() => None,
            Value::Utf8(s) => Some(GroupKey::Text(s)),
            Value::Int64(v) => Some(GroupKey::Int(*v)),
            Value::Float64(v) => Some(GroupKey::Float(v.to_bits())),
        }
    }
}

impl Catalog {
    /// Ranked counts of `kind`'s field over the records selected by `filter`.
    ///
    /// `filter` is a [`Catalog::search`] pattern on the same field, or `"*"` for the whole
    /// catalog. The department report, and any report over the whole catalog, sorts the
    /// selection by the field before grouping, so equal counts come out in value order. A
    /// filtered publisher or column report keeps equal counts in first-seen order.
    ///
    /// Fails with [`CatalogError::MissingField`] if the table has no such column.
    pub fn count_report(&self, kind: &ReportKind, filter: &str) -> CatalogResult<CountReport> {
        let field = kind.field(self.fields());
        if field != COURSE_ID && self.table().index_of(field).is_none() {
            return Err(CatalogError::missing_field(field));
        }

        let mut selection = self.select(field, filter)?;
        if *kind == ReportKind::Department || filter == MATCH_ALL {
            selection = sort_by_field(selection, field);
        }
        let entries = count_by_column(selection, field);

        if entries.is_empty() {
            self.emit(CatalogEvent::EmptyResult {
                report: report_name(kind),
                filter: filter.to_string(),
            });
        }

        Ok(CountReport {
            label: kind.label().to_string(),
            field: field.to_string(),
            filter: filter.to_string(),
            total_records: self.len(),
            entries,
        })
    }

    /// Records per course code.
    pub fn department_report(&self, filter: &str) -> CatalogResult<CountReport> {
        self.count_report(&ReportKind::Department, filter)
    }

    /// Records per publisher.
    pub fn publisher_report(&self, filter: &str) -> CatalogResult<CountReport> {
        self.count_report(&ReportKind::Publisher, filter)
    }

    /// Per-title counts, with the course ids and sessions of each title's records.
    ///
    /// `title_filter` is a [`Catalog::search`] pattern on the title, or `"*"`. Records with a
    /// missing or empty title share one group, so entry counts add up to the selection size.
    pub fn book_report(&self, title_filter: &str) -> CatalogResult<BookReport> {
        let title_field = &self.fields().title;
        let selection = sort_by_field(self.select(title_field, title_filter)?, title_field);

        let mut groups: HashMap<GroupKey<'_>, usize> = HashMap::new();
        let mut entries: Vec<BookEntry> = Vec::new();
        for record in selection {
            let Some(title) = record.title() else {
                continue;
            };
            let key = GroupKey::of(title).unwrap_or(GroupKey::Blank);
            let idx = *groups.entry(key).or_insert_with(|| {
                entries.push(BookEntry {
                    title: title.clone(),
                    count: 0,
                    courses: Vec::new(),
                    sessions: Vec::new(),
                });
                entries.len() - 1
            });
            let entry = &mut entries[idx];
            entry.count += 1;
            entry.courses.push(record.course_id().map(str::to_string));
            entry
                .sessions
                .push(record.session().cloned().unwrap_or(Value::Null));
        }

        if entries.is_empty() {
            self.emit(CatalogEvent::EmptyResult {
                report: "book",
                filter: title_filter.to_string(),
            });
        }

        Ok(BookReport {
            filter: title_filter.to_string(),
            entries,
        })
    }

    fn select(&self, field: &str, filter: &str) -> CatalogResult<Vec<&Record>> {
        if filter == MATCH_ALL {
            return Ok(self.records().iter().collect());
        }
        self.search(field, filter)
    }
}

fn report_name(kind: &ReportKind) -> &'static str {
    match kind {
        ReportKind::Department => "department",
        ReportKind::Publisher => "publisher",
        ReportKind::Column(_) => "column",
    }
}
