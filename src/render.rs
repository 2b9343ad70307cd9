//! Presentation of records and reports.
//!
//! Nothing in the search or report code writes to the console. Callers that want the classic
//! printed output render the structured results here, or pass a [`CitationSink`] to the `_into`
//! search variants.

use std::fmt::Write as _;

use serde::Serialize;

use crate::error::CatalogResult;
use crate::report::{BookReport, CountReport};

/// Receives citations as a search finds them.
pub trait CitationSink {
    fn emit(&mut self, citation: &str);
}

/// Collects citations in order.
impl CitationSink for Vec<String> {
    fn emit(&mut self, citation: &str) {
        self.push(citation.to_string());
    }
}

/// Prints each citation on its own stdout line.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl CitationSink for StdoutSink {
    fn emit(&mut self, citation: &str) {
        println!("{citation}");
    }
}

/// Banner printed above a report, e.g. `BOOK REPORT` between two rules.
pub fn banner(title: &str) -> String {
    let rule = "=".repeat(25);
    format!("{rule}\n{}\n{rule}\n", title.to_uppercase())
}

/// Text layout of a book report: one block per title.
pub fn render_book_report(report: &BookReport) -> String {
    let mut out = banner("book report");
    if report.is_empty() {
        let _ = writeln!(out, "No texts titled {} found.", report.filter);
        return out;
    }
    for entry in &report.entries {
        let courses: Vec<&str> = entry
            .courses
            .iter()
            .map(|c| c.as_deref().unwrap_or(""))
            .collect();
        let sessions: Vec<String> = entry.sessions.iter().map(ToString::to_string).collect();
        let _ = write!(
            out,
            "\nTitle: {}\n Count: {}\n Courses: {:?}\n Sessions: {:?}\n",
            entry.title, entry.count, courses, sessions
        );
    }
    out
}

/// Text layout of a count report with each group's share of the catalog.
pub fn render_count_report(report: &CountReport) -> String {
    let mut out = banner(&format!("{} report", report.label));
    if report.is_empty() {
        let _ = writeln!(out, "No {} titled {} found.", report.label, report.filter);
        return out;
    }
    let _ = writeln!(out, "Groups: {}", report.entries.len());
    let _ = writeln!(out, "Number of records: {}", report.total_records);
    for entry in &report.entries {
        let _ = writeln!(
            out,
            "{} Count: {} Presence: {:.1}%",
            entry.value,
            entry.count,
            report.share(entry) * 100.0
        );
    }
    out
}

/// Horizontal bar chart of a count report, the largest group spanning `width` cells.
pub fn render_bar_chart(report: &CountReport, width: usize) -> String {
    let Some(max) = report.entries.iter().map(|e| e.count).max() else {
        return String::new();
    };
    let labels: Vec<String> = report.entries.iter().map(|e| e.value.to_string()).collect();
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for (label, entry) in labels.iter().zip(&report.entries) {
        let bar = (entry.count * width).div_ceil(max);
        let _ = writeln!(
            out,
            "{label:>label_width$} | {} {}",
            "#".repeat(bar),
            entry.count
        );
    }
    out
}

/// Pretty-printed JSON of any report or record list.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> CatalogResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
