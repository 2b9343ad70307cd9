//! Core data model types: cell values and the rectangular input table.
//!
//! A [`Table`] is what a loader hands to [`crate::catalog::Catalog::new`]. Columns are kept in
//! source order and every cell is a [`Value`].

use std::fmt;

use serde::Serialize;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`] and for empty strings.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Utf8(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Returns the string payload, if this is a [`Value::Utf8`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s),
            _ => None,
        }
    }
}

/// String form used for matching, grouping order and rendering. `Null` renders as `""`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Utf8(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Utf8(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Utf8(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

/// In-memory rectangular table.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as `columns`. A row shorter than the
/// column list reads as [`Value::Null`] for the missing trailing cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Ordered column names.
    pub columns: Vec<String>,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from column names and rows.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows,
        }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the index of a column by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns the cell at (`row`, `col`), or [`Value::Null`] past the end of a short row.
    pub fn cell(&self, row: usize, col: usize) -> &Value {
        static NULL: Value = Value::Null;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&NULL)
    }
}
