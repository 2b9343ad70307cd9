use thiserror::Error;

/// Convenience result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Error type returned by catalog construction, search and reporting.
///
/// Every variant is local to a single call (or a single record); none of them invalidate the
/// catalog itself. Empty search/report results are not errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A field required by the operation is absent from the record or table.
    #[error("missing required field '{field}'")]
    MissingField { field: String },

    /// A search term could not be interpreted (e.g. a course number without exactly two tokens).
    #[error("malformed search term '{term}': {message}")]
    MalformedInput { term: String, message: String },

    /// Report serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The report thread pool could not be started.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A search pattern is not a valid regular expression.
    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A row index past the end of the table.
    #[error("row {row} is out of range (table has {rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },
}

impl CatalogError {
    pub(crate) fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}
