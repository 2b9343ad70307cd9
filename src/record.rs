//! Field-addressable wrapper around one table row.
//!
//! A [`Record`] keeps the row's values in column order alongside the (shared) list of column
//! names, plus one derived field: the course id, `"<course code> <course number>"`.

use std::sync::Arc;

use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{CatalogError, CatalogResult};
use crate::options::FieldNames;
use crate::types::{Table, Value};

/// Name under which the derived course id is addressable.
pub const COURSE_ID: &str = "course_id";

/// How much of a record [`Record::dump`] and [`Record::lookup`] should produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSelector {
    /// Every field.
    All,
    /// The field names.
    Keys,
    /// Short citation: title, author, call number and course id.
    Brief,
    /// One named field.
    Named(String),
}

impl From<&str> for FieldSelector {
    fn from(s: &str) -> Self {
        match s {
            "all" => FieldSelector::All,
            "keys" => FieldSelector::Keys,
            "brief" => FieldSelector::Brief,
            other => FieldSelector::Named(other.to_string()),
        }
    }
}

/// Column names shared by every record built from the same table.
#[derive(Debug, PartialEq)]
pub(crate) struct RecordLayout {
    pub(crate) keys: Vec<String>,
    pub(crate) fields: FieldNames,
}

impl RecordLayout {
    pub(crate) fn new(keys: Vec<String>, fields: FieldNames) -> Arc<Self> {
        Arc::new(Self { keys, fields })
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == name)
    }
}

/// One course-reserve entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    layout: Arc<RecordLayout>,
    values: Vec<Value>,
    course_id: Option<Value>,
}

impl Record {
    /// Build a record from column names and row values, using the default [`FieldNames`].
    ///
    /// Missing trailing values are filled with [`Value::Null`]; extra values are dropped.
    pub fn new<S: Into<String>>(keys: impl IntoIterator<Item = S>, values: Vec<Value>) -> Self {
        Self::with_fields(keys, values, FieldNames::default())
    }

    /// Build a record with custom special-field names.
    pub fn with_fields<S: Into<String>>(
        keys: impl IntoIterator<Item = S>,
        values: Vec<Value>,
        fields: FieldNames,
    ) -> Self {
        let keys = keys.into_iter().map(Into::into).collect();
        Self::from_layout(RecordLayout::new(keys, fields), values)
    }

    pub(crate) fn from_layout(layout: Arc<RecordLayout>, mut values: Vec<Value>) -> Self {
        values.resize(layout.keys.len(), Value::Null);
        let mut record = Self {
            layout,
            values,
            course_id: None,
        };
        record.course_id = record.derive_course_id();
        record
    }

    /// Build a record from one table row, keeping only `headers` that the table has.
    pub(crate) fn project(table: &Table, row: usize, headers: &[String], fields: &FieldNames) -> Self {
        let (keys, values): (Vec<String>, Vec<Value>) = headers
            .iter()
            .filter_map(|h| {
                let col = table.index_of(h)?;
                Some((h.clone(), table.cell(row, col).clone()))
            })
            .unzip();
        Self::from_layout(RecordLayout::new(keys, fields.clone()), values)
    }

    fn derive_course_id(&self) -> Option<Value> {
        let names = &self.layout.fields;
        let code = self.value_of(&names.course_code)?;
        let number = self.value_of(&names.course_number)?;
        Some(Value::Utf8(format!("{code} {number}")))
    }

    /// Course-id source fields absent from this record's keys.
    pub fn missing_course_id_fields(&self) -> Vec<String> {
        let names = &self.layout.fields;
        [&names.course_code, &names.course_number]
            .into_iter()
            .filter(|name| self.layout.index_of(name).is_none())
            .cloned()
            .collect()
    }

    /// Reset every field from row `row` of `table`, then recompute the course id.
    ///
    /// The record takes the table's columns as its keys.
    pub fn read(&mut self, table: &Table, row: usize) -> CatalogResult<()> {
        if row >= table.row_count() {
            return Err(CatalogError::RowOutOfRange {
                row,
                rows: table.row_count(),
            });
        }
        if self.layout.keys != table.columns {
            self.layout = RecordLayout::new(table.columns.clone(), self.layout.fields.clone());
        }
        self.values = (0..table.columns.len())
            .map(|col| table.cell(row, col).clone())
            .collect();
        self.course_id = self.derive_course_id();
        Ok(())
    }

    /// Field names in source column order.
    pub fn keys(&self) -> &[String] {
        &self.layout.keys
    }

    /// Raw values in source column order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    fn value_of(&self, name: &str) -> Option<&Value> {
        self.layout.index_of(name).map(|i| &self.values[i])
    }

    /// Value of a named field, including the derived [`COURSE_ID`].
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self.value_of(name) {
            Some(v) => Some(v),
            None if name == COURSE_ID => self.course_id.as_ref(),
            None => None,
        }
    }

    /// Returns `true` if the record has a field called `name`.
    pub fn has_field(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Every field as `(name, value)`, source columns first, then the course id when set.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.layout
            .keys
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
            .chain(self.course_id.iter().map(|v| (COURSE_ID, v)))
    }

    /// String form of one field, or of every field value (newline-joined) when the field is
    /// unknown or [`FieldSelector::All`] is asked for.
    pub fn lookup(&self, selector: impl Into<FieldSelector>) -> String {
        if let FieldSelector::Named(name) = selector.into() {
            if let Some(v) = self.get(&name) {
                return v.to_string();
            }
        }
        self.fields()
            .map(|(_, v)| v.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Returns `true` if `pattern` matches anywhere in the string form of any field.
    pub fn has_str(&self, pattern: &Regex) -> bool {
        self.fields().any(|(_, v)| value_matches(pattern, v))
    }

    /// Compiles `pattern` as given (case-sensitive) and calls [`Record::has_str`].
    pub fn has_pattern(&self, pattern: &str) -> CatalogResult<bool> {
        Ok(self.has_str(&Regex::new(pattern)?))
    }

    /// Printable form of the record.
    ///
    /// Only [`FieldSelector::Brief`] can fail, when the title, author or call number column is
    /// absent.
    pub fn dump(&self, selector: impl Into<FieldSelector>) -> CatalogResult<String> {
        match selector.into() {
            FieldSelector::Brief => self.brief(),
            FieldSelector::Keys => Ok(self.layout.keys.join(", ")),
            FieldSelector::Named(name) => match self.get(&name) {
                Some(v) => Ok(format!("{name}: {v}")),
                None => Ok(self.dump_all()),
            },
            FieldSelector::All => Ok(self.dump_all()),
        }
    }

    fn dump_all(&self) -> String {
        self.fields()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn brief(&self) -> CatalogResult<String> {
        let names = &self.layout.fields;
        let title = self.require(&names.title)?;
        let author = self.require(&names.author)?;
        let call_number = self.require(&names.call_number)?;
        let course_id = self.course_id().unwrap_or_default();
        Ok(format!("\"{title},\" {author}, {call_number} {course_id}"))
    }

    fn require(&self, name: &str) -> CatalogResult<&Value> {
        self.value_of(name)
            .ok_or_else(|| CatalogError::missing_field(name))
    }

    /// Comma-joined string form of the source values.
    pub fn citation_line(&self) -> String {
        self.values
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn course_id(&self) -> Option<&str> {
        self.course_id.as_ref().and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&Value> {
        self.value_of(&self.layout.fields.title)
    }

    pub fn author(&self) -> Option<&Value> {
        self.value_of(&self.layout.fields.author)
    }

    pub fn call_number(&self) -> Option<&Value> {
        self.value_of(&self.layout.fields.call_number)
    }

    pub fn course_code(&self) -> Option<&Value> {
        self.value_of(&self.layout.fields.course_code)
    }

    pub fn course_number(&self) -> Option<&Value> {
        self.value_of(&self.layout.fields.course_number)
    }

    pub fn publisher(&self) -> Option<&Value> {
        self.value_of(&self.layout.fields.publisher)
    }

    pub fn session(&self) -> Option<&Value> {
        self.value_of(&self.layout.fields.session)
    }
}

/// Serializes as a map of every field, course id included.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields: Vec<_> = self.fields().collect();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for (k, v) in fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

pub(crate) fn value_matches(pattern: &Regex, value: &Value) -> bool {
    match value {
        Value::Utf8(s) => pattern.is_match(s),
        other => pattern.is_match(&other.to_string()),
    }
}
