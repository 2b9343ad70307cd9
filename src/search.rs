//! Search over a [`Catalog`].
//!
//! Every search returns its matches in catalog (row) order and takes regular-expression
//! fragments, not literal strings: escape metacharacters with [`regex::escape`] for a literal
//! match. Missing values are matched as the empty string.
//!
//! | method | matches on | case | returns |
//! |---|---|---|---|
//! | [`Catalog::search`] | one field, or all fields if the record lacks it | insensitive | catalog records |
//! | [`Catalog::search_by_course_id`] | exact course id or course code | exact | catalog records |
//! | [`Catalog::search_by_column`] | one table column | sensitive | citation records |
//! | [`Catalog::search_by_course_number`] | exact code + number pair | exact | citation records |
//! | [`Catalog::search_by_keyword`] | any table column, lower-cased | sensitive | full-row records |
//!
//! The `_into` variants additionally emit each citation to a [`CitationSink`] as it is found.

use regex::{Regex, RegexBuilder};

use crate::catalog::Catalog;
use crate::error::{CatalogError, CatalogResult};
use crate::record::{FieldSelector, Record, value_matches};
use crate::render::CitationSink;

/// Filter value that selects the entire catalog in [`Catalog::search`] and the reports.
pub const MATCH_ALL: &str = "*";

/// Separator between alternatives in id lists.
pub const ID_SEPARATOR: char = '|';

impl Catalog {
    /// Case-insensitive regex search of `value` in `field`.
    ///
    /// Records that have no `field` are matched against all of their fields instead, so rows of
    /// an unexpected shape are not silently dropped. `"*"` returns the whole catalog.
    pub fn search(&self, field: &str, value: &str) -> CatalogResult<Vec<&Record>> {
        if value == MATCH_ALL {
            return Ok(self.records().iter().collect());
        }
        let pattern = case_insensitive(value)?;
        Ok(self
            .records()
            .iter()
            .filter(|record| match record.get(field) {
                Some(v) => value_matches(&pattern, v),
                None => record.has_str(&pattern),
            })
            .collect())
    }

    /// Records whose course id, or raw course code, equals one of the `|`-separated `ids`.
    ///
    /// Each record is returned at most once. Blank alternatives (as in `"ENGL 505A|"`) are
    /// ignored, so records with a blank course code are never matched by them.
    pub fn search_by_course_id(&self, ids: &str) -> Vec<&Record> {
        let ids: Vec<&str> = ids
            .split(ID_SEPARATOR)
            .filter(|id| !id.trim().is_empty())
            .collect();
        if ids.is_empty() {
            return Vec::new();
        }
        self.records()
            .iter()
            .filter(|record| {
                let course_id = record.course_id();
                let code = record
                    .course_code()
                    .filter(|v| !v.is_empty())
                    .map(|v| v.to_string());
                ids.iter().any(|id| {
                    course_id == Some(*id) || code.as_deref() == Some(*id)
                })
            })
            .collect()
    }

    /// Case-sensitive regex scan of one column of the backing table.
    ///
    /// Each matching row becomes a citation record holding title, author, course code, course
    /// number and call number, plus `column` itself. Fails with [`CatalogError::MissingField`]
    /// if the table has no such column.
    pub fn search_by_column(&self, column: &str, pattern: &str) -> CatalogResult<Vec<Record>> {
        self.scan_column(column, pattern, None)
    }

    /// [`Catalog::search_by_column`], also emitting each brief citation to `sink`.
    pub fn search_by_column_into(
        &self,
        column: &str,
        pattern: &str,
        sink: &mut dyn CitationSink,
    ) -> CatalogResult<Vec<Record>> {
        self.scan_column(column, pattern, Some(sink))
    }

    fn scan_column(
        &self,
        column: &str,
        pattern: &str,
        mut sink: Option<&mut dyn CitationSink>,
    ) -> CatalogResult<Vec<Record>> {
        let table = self.table();
        let col = table
            .index_of(column)
            .ok_or_else(|| CatalogError::missing_field(column))?;
        let pattern = Regex::new(pattern)?;

        let mut headers = self.fields().citation_headers();
        if !headers.iter().any(|h| h == column) {
            headers.push(column.to_string());
        }

        let mut results = Vec::new();
        for row in 0..table.row_count() {
            if !value_matches(&pattern, table.cell(row, col)) {
                continue;
            }
            let citation = Record::project(table, row, &headers, self.fields());
            if let Some(sink) = sink.as_deref_mut() {
                emit_brief(sink, &citation);
            }
            results.push(citation);
        }
        Ok(results)
    }

    /// Rows whose course code and course number both equal one of the `|`-separated terms.
    ///
    /// Each term must be exactly `"<code> <number>"`; a malformed term fails the whole call with
    /// [`CatalogError::MalformedInput`] before anything is scanned. Matches are citation records
    /// with the fixed citation header set.
    pub fn search_by_course_number(&self, ids: &str) -> CatalogResult<Vec<Record>> {
        self.scan_course_numbers(ids, None)
    }

    /// [`Catalog::search_by_course_number`], also emitting each comma-joined citation to `sink`.
    pub fn search_by_course_number_into(
        &self,
        ids: &str,
        sink: &mut dyn CitationSink,
    ) -> CatalogResult<Vec<Record>> {
        self.scan_course_numbers(ids, Some(sink))
    }

    fn scan_course_numbers(
        &self,
        ids: &str,
        mut sink: Option<&mut dyn CitationSink>,
    ) -> CatalogResult<Vec<Record>> {
        let terms = parse_course_numbers(ids)?;
        let table = self.table();
        let fields = self.fields();
        let code_col = table
            .index_of(&fields.course_code)
            .ok_or_else(|| CatalogError::missing_field(&fields.course_code))?;
        let number_col = table
            .index_of(&fields.course_number)
            .ok_or_else(|| CatalogError::missing_field(&fields.course_number))?;

        let headers = fields.citation_headers();
        let mut results = Vec::new();
        for row in 0..table.row_count() {
            let code = table.cell(row, code_col).to_string();
            let number = table.cell(row, number_col).to_string();
            if !terms.iter().any(|(c, n)| *c == code && *n == number) {
                continue;
            }
            let citation = Record::project(table, row, &headers, fields);
            if let Some(sink) = sink.as_deref_mut() {
                sink.emit(&citation.citation_line());
            }
            results.push(citation);
        }
        Ok(results)
    }

    /// Rows where any cell's lower-cased string form matches `pattern`.
    ///
    /// The pattern itself is not lower-cased, so it should be written in lower case.
    pub fn search_by_keyword(&self, pattern: &str) -> CatalogResult<Vec<Record>> {
        self.scan_keyword(pattern, None)
    }

    /// [`Catalog::search_by_keyword`], also emitting each brief citation to `sink`.
    pub fn search_by_keyword_into(
        &self,
        pattern: &str,
        sink: &mut dyn CitationSink,
    ) -> CatalogResult<Vec<Record>> {
        self.scan_keyword(pattern, Some(sink))
    }

    fn scan_keyword(
        &self,
        pattern: &str,
        mut sink: Option<&mut dyn CitationSink>,
    ) -> CatalogResult<Vec<Record>> {
        let pattern = Regex::new(pattern)?;
        let table = self.table();
        let mut results = Vec::new();
        for row in 0..table.row_count() {
            let found = (0..table.columns.len())
                .any(|col| pattern.is_match(&table.cell(row, col).to_string().to_lowercase()));
            if !found {
                continue;
            }
            let record = Record::project(table, row, &table.columns, self.fields());
            if let Some(sink) = sink.as_deref_mut() {
                emit_brief(sink, &record);
            }
            results.push(record);
        }
        Ok(results)
    }
}

fn case_insensitive(pattern: &str) -> CatalogResult<Regex> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}

fn parse_course_numbers(ids: &str) -> CatalogResult<Vec<(&str, &str)>> {
    ids.split(ID_SEPARATOR)
        .map(|term| match term.split(' ').collect::<Vec<_>>().as_slice() {
            [code, number] => Ok((*code, *number)),
            tokens => Err(CatalogError::MalformedInput {
                term: term.to_string(),
                message: format!(
                    "expected '<course code> <course number>', found {} token(s)",
                    tokens.len()
                ),
            }),
        })
        .collect()
}

// A citation missing title/author/call number degrades to its plain value list.
fn emit_brief(sink: &mut dyn CitationSink, record: &Record) {
    match record.dump(FieldSelector::Brief) {
        Ok(brief) => sink.emit(&brief),
        Err(_) => sink.emit(&record.citation_line()),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_course_numbers;
    use crate::catalog::Catalog;
    use crate::error::CatalogError;
    use crate::types::{Table, Value};

    fn catalog() -> Catalog {
        Catalog::new(Table::new(
            ["Title", "Author", "Call number", "Course code", "Coursenumber", "Publisher"],
            vec![
                vec!["Intro to Physics".into(), "Ames".into(), "QC21".into(), "PHYS".into(), "101".into(), "Wiley".into()],
                vec!["Moby Dick".into(), "Melville".into(), "PS2384".into(), "ENGL".into(), "505A".into(), Value::Null],
                vec!["History 101".into(), "Bloch".into(), "D16".into(), "HIST".into(), Value::Int64(101), "Taylor & Francis".into()],
                vec!["Beloved".into(), "Morrison".into(), "PS3563".into(), "ENGL".into(), "535A".into(), "Knopf".into()],
            ],
        ))
    }

    fn titles<'a>(records: impl IntoIterator<Item = &'a crate::record::Record>) -> Vec<String> {
        records.into_iter().map(|r| r.lookup("Title")).collect()
    }

    #[test]
    fn star_returns_every_record_by_identity() {
        let c = catalog();
        let all = c.search("Title", "*").unwrap();
        assert_eq!(all.len(), c.len());
        for (a, b) in all.iter().zip(c.records()) {
            assert!(std::ptr::eq(*a, b));
        }
    }

    #[test]
    fn search_is_case_insensitive_alternation() {
        let c = catalog();
        let hits = c.search("Title", "HISTORY|physics").unwrap();
        assert_eq!(titles(hits), vec!["Intro to Physics", "History 101"]);
    }

    #[test]
    fn search_missing_values_match_as_empty() {
        let c = catalog();
        let hits = c.search("Publisher", "^$").unwrap();
        assert_eq!(titles(hits), vec!["Moby Dick"]);
    }

    #[test]
    fn search_unknown_field_falls_back_to_all_fields() {
        let c = catalog();
        let hits = c.search("Subject", "melville|knopf").unwrap();
        assert_eq!(titles(hits), vec!["Moby Dick", "Beloved"]);
    }

    #[test]
    fn search_derived_course_id() {
        let c = catalog();
        let hits = c.search("course_id", "^hist 101$").unwrap();
        assert_eq!(titles(hits), vec!["History 101"]);
    }

    #[test]
    fn search_rejects_invalid_pattern() {
        let c = catalog();
        assert!(matches!(c.search("Title", "(("), Err(CatalogError::InvalidPattern(_))));
    }

    #[test]
    fn course_id_or_code_match_without_duplicates() {
        let c = catalog();
        let hits = c.search_by_course_id("ENGL 505A|ENGL");
        assert_eq!(titles(hits), vec!["Moby Dick", "Beloved"]);
        assert!(c.search_by_course_id("ENGL 505").is_empty());
    }

    #[test]
    fn course_id_blank_alternatives_match_nothing() {
        let c = Catalog::new(Table::new(
            ["Title", "Course code", "Coursenumber"],
            vec![
                vec!["Dune".into(), "ENGL".into(), "505A".into()],
                vec!["Blank".into(), Value::Null, "101".into()],
                vec!["Empty".into(), "".into(), "102".into()],
            ],
        ));
        assert_eq!(titles(c.search_by_course_id("ENGL 505A|")), vec!["Dune"]);
        assert_eq!(titles(c.search_by_course_id("|ENGL 505A||")), vec!["Dune"]);
        assert!(c.search_by_course_id("|").is_empty());
        assert!(c.search_by_course_id("").is_empty());
    }

    #[test]
    fn column_scan_projects_citation_headers() {
        let c = catalog();
        let hits = c.search_by_column("Call number", "PS").unwrap();
        assert_eq!(titles(&hits), vec!["Moby Dick", "Beloved"]);
        assert_eq!(
            hits[0].keys(),
            ["Title", "Author", "Course code", "Coursenumber", "Call number"]
        );
        assert_eq!(hits[0].course_id(), Some("ENGL 505A"));

        let hits = c.search_by_column("Publisher", "Taylor").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].keys().last().map(String::as_str), Some("Publisher"));
    }

    #[test]
    fn column_scan_is_case_sensitive() {
        let c = catalog();
        assert!(c.search_by_column("Call number", "ps").unwrap().is_empty());
    }

    #[test]
    fn column_scan_unknown_column_is_missing_field() {
        let c = catalog();
        let err = c.search_by_column("ISBN", "9").unwrap_err();
        assert!(matches!(err, CatalogError::MissingField { ref field } if field == "ISBN"));
    }

    #[test]
    fn column_scan_into_sink() {
        let c = catalog();
        let mut out: Vec<String> = Vec::new();
        let hits = c.search_by_column_into("Call number", "QC", &mut out).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(out, vec!["\"Intro to Physics,\" Ames, QC21 PHYS 101".to_string()]);
    }

    #[test]
    fn course_number_exact_pairs() {
        let c = catalog();
        let mut out: Vec<String> = Vec::new();
        let hits = c
            .search_by_course_number_into("HIST 101|ENGL 535A", &mut out)
            .unwrap();
        assert_eq!(titles(&hits), vec!["History 101", "Beloved"]);
        assert_eq!(out[0], "History 101, Bloch, HIST, 101, D16");
        assert!(c.search_by_course_number("ENGL 505").unwrap().is_empty());
    }

    #[test]
    fn course_number_malformed_term_aborts_call() {
        let c = catalog();
        let mut out: Vec<String> = Vec::new();
        let err = c
            .search_by_course_number_into("HIST 101|ENGL", &mut out)
            .unwrap_err();
        assert!(matches!(err, CatalogError::MalformedInput { ref term, .. } if term == "ENGL"));
        assert!(out.is_empty());
    }

    #[test]
    fn parse_course_numbers_counts_tokens() {
        assert_eq!(
            parse_course_numbers("ENGL 505A|HIST 101").unwrap(),
            vec![("ENGL", "505A"), ("HIST", "101")]
        );
        assert!(parse_course_numbers("ENGL  505A").is_err());
        assert!(parse_course_numbers("ENGL 505A extra").is_err());
    }

    #[test]
    fn keyword_scan_lowercases_cells() {
        let c = catalog();
        let hits = c.search_by_keyword("taylor|morrison").unwrap();
        assert_eq!(titles(&hits), vec!["History 101", "Beloved"]);
        assert_eq!(hits[0].keys().len(), c.keys().len());
        assert!(c.search_by_keyword("Taylor").unwrap().is_empty());
    }
}
