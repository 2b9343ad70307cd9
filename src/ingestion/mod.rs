//! Table loading.
//!
//! The catalog itself only needs a materialized [`crate::types::Table`]. This module provides the
//! CSV reader used to produce one; callers with other sources can build a `Table` directly.

pub mod csv;

pub use self::csv::{read_table_from_path, read_table_from_reader};
