//! Catalog configuration.

use std::fmt;
use std::sync::Arc;

use crate::observer::CatalogObserver;

/// Column names of the fields the engine treats specially.
///
/// Every other column is still a record field; these are just the ones with typed accessors and
/// fixed roles (course-id derivation, brief citations, reports).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    pub title: String,
    pub author: String,
    pub call_number: String,
    /// Department/course code, e.g. `ENGL`.
    pub course_code: String,
    /// Course number within the department, e.g. `505A`.
    pub course_number: String,
    pub publisher: String,
    pub session: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            title: "Title".to_string(),
            author: "Author".to_string(),
            call_number: "Call number".to_string(),
            course_code: "Course code".to_string(),
            course_number: "Coursenumber".to_string(),
            publisher: "Publisher".to_string(),
            session: "Session".to_string(),
        }
    }
}

impl FieldNames {
    /// Header set projected into citation records by the column and course-number searches.
    pub fn citation_headers(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.author.clone(),
            self.course_code.clone(),
            self.course_number.clone(),
            self.call_number.clone(),
        ]
    }
}

/// Options controlling catalog construction and diagnostics.
///
/// Use [`Default`] for the standard course-reserve export layout.
#[derive(Clone, Default)]
pub struct CatalogOptions {
    /// Names of the specially treated columns.
    pub fields: FieldNames,
    /// Optional observer for diagnostics (degraded records, empty results).
    pub observer: Option<Arc<dyn CatalogObserver>>,
}

impl fmt::Debug for CatalogOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogOptions")
            .field("fields", &self.fields)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}
