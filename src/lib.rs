//! `course-reserves` is an in-memory catalog of library course-reserve entries.
//!
//! A loader hands the engine a rectangular [`types::Table`]; [`catalog::Catalog::new`] wraps every
//! row as a field-addressable [`record::Record`] and derives each record's course id
//! (`"<course code> <course number>"`). The catalog then answers searches and grouped count
//! reports. It is read-only after construction.
//!
//! ## Loading and searching
//!
//! ```no_run
//! use course_reserves::catalog::Catalog;
//! use course_reserves::ingestion::read_table_from_path;
//!
//! # fn main() -> Result<(), course_reserves::CatalogError> {
//! let catalog = Catalog::new(read_table_from_path("course_reserve_dataset.csv")?);
//!
//! // Case-insensitive regex on one field; `|` is alternation.
//! for record in catalog.search("Title", "history|physics|intro")? {
//!     println!("{}", record.dump("brief")?);
//! }
//!
//! // Exact course ids (or bare course codes), `|`-separated.
//! let engl = catalog.search_by_course_id("ENGL 505A|ENGL 535A");
//! println!("{} ENGL reserves", engl.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Reports
//!
//! ```rust
//! use course_reserves::catalog::Catalog;
//! use course_reserves::render::render_count_report;
//! use course_reserves::types::{Table, Value};
//!
//! let table = Table::new(
//!     ["Title", "Course code", "Coursenumber", "Publisher"],
//!     vec![
//!         vec!["Dune".into(), "ENGL".into(), "505A".into(), "Ace".into()],
//!         vec!["Emma".into(), "ENGL".into(), "535A".into(), Value::Null],
//!         vec!["Dune".into(), "HIST".into(), Value::Int64(101), "Ace".into()],
//!     ],
//! );
//! let catalog = Catalog::new(table);
//!
//! let departments = catalog.department_report("*").unwrap();
//! assert_eq!(departments.entries[0].value, Value::from("ENGL"));
//! assert_eq!(departments.entries[0].count, 2);
//! println!("{}", render_count_report(&departments));
//!
//! let books = catalog.book_report("dune").unwrap();
//! assert_eq!(books.entries[0].courses, vec![Some("ENGL 505A".to_string()), Some("HIST 101".to_string())]);
//! ```
//!
//! ## Modules
//!
//! - [`types`]: cell values and the input table
//! - [`record`]: one row as a record, field access and citations
//! - [`catalog`]: the record store
//! - [`search`]: search modes (methods on `Catalog`)
//! - [`report`]: grouped counts, book/department/publisher reports
//! - [`render`]: text/JSON presentation and citation sinks
//! - [`observer`]: diagnostics hooks
//! - [`execution`]: concurrent report batches
//! - [`ingestion`]: CSV table reader
//! - [`options`]: configuration
//! - [`error`]: error type

pub mod catalog;
pub mod error;
pub mod execution;
pub mod ingestion;
pub mod observer;
pub mod options;
pub mod record;
pub mod render;
pub mod report;
pub mod search;
pub mod types;

pub use catalog::Catalog;
pub use error::{CatalogError, CatalogResult};
pub use options::{CatalogOptions, FieldNames};
pub use record::{FieldSelector, Record};
pub use types::{Table, Value};
