use criterion::{Criterion, black_box, criterion_group, criterion_main};

use course_reserves::Catalog;
use course_reserves::report::count_by_column;
use course_reserves::types::{Table, Value};

const DEPARTMENTS: [&str; 6] = ["ENGL", "HIST", "PHYS", "GERM", "MATH", "ARTH"];
const PUBLISHERS: [&str; 4] = ["Knopf", "Routledge", "Taylor & Francis", "Wiley"];

fn synthetic_catalog(rows: usize) -> Catalog {
    let rows = (0..rows)
        .map(|i| {
            vec![
                Value::Utf8(format!("Title {}", i % 500)),
                Value::Utf8(format!("Author {}", i % 300)),
                Value::Utf8(format!("PS{}", 3000 + i % 900)),
                Value::from(DEPARTMENTS[i % DEPARTMENTS.len()]),
                Value::Int64(100 + (i % 400) as i64),
                Value::from(PUBLISHERS[i % PUBLISHERS.len()]),
                Value::from(if i % 2 == 0 { "Fall 2023" } else { "Spring 2024" }),
            ]
        })
        .collect();
    Catalog::new(Table::new(
        ["Title", "Author", "Call number", "Course code", "Coursenumber", "Publisher", "Session"],
        rows,
    ))
}

fn bench_catalog(c: &mut Criterion) {
    let catalog = synthetic_catalog(20_000);

    c.bench_function("search_title_alternation", |b| {
        b.iter(|| black_box(catalog.search("Title", black_box("title 1|title 42")).unwrap().len()))
    });

    c.bench_function("search_by_course_id", |b| {
        b.iter(|| black_box(catalog.search_by_course_id(black_box("ENGL 101|HIST 205")).len()))
    });

    c.bench_function("count_by_publisher", |b| {
        b.iter(|| black_box(count_by_column(catalog.records(), "Publisher").len()))
    });

    c.bench_function("book_report_all", |b| {
        b.iter(|| black_box(catalog.book_report("*").unwrap().entries.len()))
    });
}

criterion_group!(benches, bench_catalog);
criterion_main!(benches);
