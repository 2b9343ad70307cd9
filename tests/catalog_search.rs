use std::sync::{Arc, Mutex};

use course_reserves::ingestion::read_table_from_path;
use course_reserves::observer::{CatalogEvent, CatalogObserver};
use course_reserves::record::Record;
use course_reserves::types::{Table, Value};
use course_reserves::{Catalog, CatalogError, CatalogOptions};

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<CatalogEvent>>,
}

impl CatalogObserver for RecordingObserver {
    fn on_event(&self, event: &CatalogEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

fn reserves() -> Catalog {
    Catalog::new(read_table_from_path("tests/fixtures/reserves.csv").unwrap())
}

fn titles<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<String> {
    records.into_iter().map(|r| r.lookup("Title")).collect()
}

#[test]
fn record_count_and_order_follow_the_table() {
    let table = read_table_from_path("tests/fixtures/reserves.csv").unwrap();
    let catalog = Catalog::new(table.clone());
    assert_eq!(catalog.len(), table.row_count());
    for (record, row) in catalog.records().iter().zip(&table.rows) {
        assert_eq!(record.values(), row.as_slice());
    }
}

#[test]
fn title_search_matches_either_alternative_in_order() {
    let catalog = Catalog::new(Table::new(
        ["Title", "Course code", "Coursenumber"],
        vec![
            vec!["Intro to Physics".into(), "PHYS".into(), Value::Int64(101)],
            vec!["History 101".into(), "HIST".into(), Value::Int64(101)],
        ],
    ));
    let hits = catalog.search("Title", "history|physics").unwrap();
    assert_eq!(hits.len(), 2);
    assert!(std::ptr::eq(hits[0], &catalog.records()[0]));
    assert!(std::ptr::eq(hits[1], &catalog.records()[1]));
}

#[test]
fn star_search_is_the_whole_catalog() {
    let catalog = reserves();
    let all = catalog.search("Publisher", "*").unwrap();
    assert_eq!(all.len(), catalog.len());
    assert!(all.iter().zip(catalog.records()).all(|(a, b)| std::ptr::eq(*a, b)));
}

#[test]
fn search_is_idempotent() {
    let catalog = reserves();
    let first = catalog.search("Title", "history|intro").unwrap();
    let second = catalog.search("Title", "history|intro").unwrap();
    assert_eq!(first, second);
    assert_eq!(
        titles(first),
        vec!["Intro to Physics", "A History of the World", "The Routledge History of Literature"]
    );
}

#[test]
fn course_id_list_returns_each_record_once() {
    let catalog = Catalog::new(Table::new(
        ["Title", "Course code", "Coursenumber"],
        vec![
            vec!["Beloved".into(), "ENGL".into(), "505A".into()],
            vec!["Dune".into(), "ENGL".into(), "535A".into()],
            vec!["Emma".into(), "HIST".into(), "200".into()],
        ],
    ));
    let hits = catalog.search_by_course_id("ENGL 505A|ENGL 535A");
    assert_eq!(titles(hits), vec!["Beloved", "Dune"]);

    // Overlapping ids still yield each record once.
    let hits = catalog.search_by_course_id("ENGL 505A|ENGL|ENGL 505A");
    assert_eq!(titles(hits), vec!["Beloved", "Dune"]);
}

#[test]
fn course_id_list_over_fixture() {
    let catalog = reserves();
    let hits = catalog.search_by_course_id("ENGL 505A|ENGL 535A");
    assert_eq!(
        titles(hits),
        vec!["Beloved", "Moby Dick", "Beloved", "The Routledge History of Literature"]
    );
}

#[test]
fn call_number_scan_yields_brief_citations() {
    let catalog = reserves();
    let mut printed: Vec<String> = Vec::new();
    let hits = catalog
        .search_by_column_into("Call number", "PR878|PS374|PS648|PN3433", &mut printed)
        .unwrap();

    assert_eq!(titles(&hits), vec!["The Routledge History of Literature", "Fairy Tales"]);
    assert_eq!(
        printed,
        vec![
            "\"The Routledge History of Literature,\" Smith, Ann, PR878 S65 ENGL 505A",
            "\"Fairy Tales,\" Grimm, Jacob, PN3433 G75 GERM 310",
        ]
    );
    assert_eq!(hits, catalog.search_by_column("Call number", "PR878|PS374|PS648|PN3433").unwrap());
}

#[test]
fn course_number_search_matches_numeric_cells() {
    let catalog = reserves();
    let hits = catalog.search_by_course_number("PHYS 101|ENGL 505A").unwrap();
    assert_eq!(
        titles(&hits),
        vec!["Intro to Physics", "Beloved", "The Routledge History of Literature"]
    );
    assert_eq!(hits[0].course_id(), Some("PHYS 101"));
}

#[test]
fn malformed_course_number_is_local_to_the_call() {
    let catalog = reserves();
    let err = catalog.search_by_course_number("ENGL505A").unwrap_err();
    assert!(err.to_string().contains("malformed search term 'ENGL505A'"));
    // The catalog is still usable.
    assert_eq!(catalog.search_by_course_number("GERM 310").unwrap().len(), 1);
}

#[test]
fn keyword_search_scans_every_column() {
    let catalog = reserves();
    let hits = catalog.search_by_keyword("routledge").unwrap();
    assert_eq!(titles(&hits), vec!["The Routledge History of Literature", "Fairy Tales"]);
}

#[test]
fn degraded_rows_are_kept_and_reported() {
    let obs = Arc::new(RecordingObserver::default());
    let table = read_table_from_path("tests/fixtures/no_course_number.csv").unwrap();
    let catalog = Catalog::with_options(
        table,
        CatalogOptions {
            observer: Some(obs.clone()),
            ..Default::default()
        },
    );

    assert_eq!(catalog.len(), 2);
    assert!(catalog.records().iter().all(|r| r.course_id().is_none()));
    assert_eq!(
        catalog.records()[0].dump("brief").unwrap(),
        "\"Dune,\" Herbert, Frank, PS3558.E63 "
    );
    // Course-code matching still works without a course id.
    assert_eq!(catalog.search_by_course_id("ENGL").len(), 2);
    assert!(matches!(
        catalog.search_by_course_number("ENGL 101"),
        Err(CatalogError::MissingField { .. })
    ));

    let events = obs.events.lock().unwrap().clone();
    assert_eq!(events.len(), 3);
    assert_eq!(
        events[2],
        CatalogEvent::CatalogBuilt {
            records: 2,
            degraded: 2
        }
    );
}
