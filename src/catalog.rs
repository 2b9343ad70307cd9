//! The record store.
//!
//! A [`Catalog`] wraps every row of a [`Table`] as a [`Record`], in row order, and is read-only
//! afterwards. Search lives in [`crate::search`] and reporting in [`crate::report`]; both are
//! implemented as methods on `Catalog`.

use std::fmt;
use std::sync::Arc;

use crate::error::CatalogResult;
use crate::observer::{CatalogEvent, CatalogObserver};
use crate::options::{CatalogOptions, FieldNames};
use crate::record::{FieldSelector, Record, RecordLayout};
use crate::types::Table;

/// Ordered collection of course-reserve records built from a table.
pub struct Catalog {
    table: Table,
    records: Vec<Record>,
    fields: FieldNames,
    observer: Option<Arc<dyn CatalogObserver>>,
}

impl Catalog {
    /// Build a catalog with default [`CatalogOptions`].
    pub fn new(table: Table) -> Self {
        Self::with_options(table, CatalogOptions::default())
    }

    /// Build a catalog, one record per table row.
    ///
    /// Rows are never dropped. A row whose table lacks the course code or course number column
    /// still becomes a record, without a course id, and is reported as
    /// [`CatalogEvent::RecordDegraded`].
    pub fn with_options(table: Table, options: CatalogOptions) -> Self {
        let CatalogOptions { fields, observer } = options;
        let layout = RecordLayout::new(table.columns.clone(), fields.clone());

        let mut degraded = 0usize;
        let mut records = Vec::with_capacity(table.row_count());
        for (row, values) in table.rows.iter().enumerate() {
            let record = Record::from_layout(Arc::clone(&layout), values.clone());
            if record.course_id().is_none() {
                degraded += 1;
                emit(
                    &observer,
                    CatalogEvent::RecordDegraded {
                        row,
                        missing: record.missing_course_id_fields(),
                    },
                );
            }
            records.push(record);
        }

        emit(
            &observer,
            CatalogEvent::CatalogBuilt {
                records: records.len(),
                degraded,
            },
        );

        Self {
            table,
            records,
            fields,
            observer,
        }
    }

    /// All records, in table row order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The backing table.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Field names, in column order.
    pub fn keys(&self) -> &[String] {
        &self.table.columns
    }

    /// Names of the specially treated fields.
    pub fn fields(&self) -> &FieldNames {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Dump every record with the given selector.
    ///
    /// Failures (e.g. a brief citation over a table without an `Author` column) are returned per
    /// record.
    pub fn dump_all(&self, selector: impl Into<FieldSelector>) -> Vec<CatalogResult<String>> {
        let selector = selector.into();
        self.records
            .iter()
            .map(|r| r.dump(selector.clone()))
            .collect()
    }

    /// Records stable-sorted by the string form of `field`; records without it sort first.
    pub fn sorted_by(&self, field: &str) -> Vec<&Record> {
        sort_by_field(self.records.iter().collect(), field)
    }

    pub(crate) fn emit(&self, event: CatalogEvent) {
        emit(&self.observer, event);
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("keys", &self.table.columns)
            .field("records_len", &self.records.len())
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

fn emit(observer: &Option<Arc<dyn CatalogObserver>>, event: CatalogEvent) {
    if let Some(obs) = observer {
        obs.on_event(&event);
    }
}

pub(crate) fn sort_by_field<'a>(mut records: Vec<&'a Record>, field: &str) -> Vec<&'a Record> {
    records.sort_by_cached_key(|r| r.get(field).map(|v| v.to_string()).unwrap_or_default());
    records
}
