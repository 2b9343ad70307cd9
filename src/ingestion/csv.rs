//! CSV table reader.

use std::fs::File;
use std::path::Path;

use crate::error::CatalogResult;
use crate::types::{Table, Value};

/// Read a CSV file with a header row into a [`Table`].
///
/// Rules:
///
/// - CSV must have headers; every column is kept, in file order.
/// - Empty cells become [`Value::Null`].
/// - Cells that parse as integers become [`Value::Int64`], then floats [`Value::Float64`];
///   everything else is kept as trimmed text.
///
/// A file that cannot be opened is [`CatalogError::Io`](crate::error::CatalogError::Io).
pub fn read_table_from_path(path: impl AsRef<Path>) -> CatalogResult<Table> {
    let file = File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);
    read_table_from_reader(&mut rdr)
}

/// Read CSV data from an existing CSV reader.
pub fn read_table_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> CatalogResult<Table> {
    let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_owned()).collect();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row = (0..columns.len())
            .map(|i| infer_value(record.get(i).unwrap_or("")))
            .collect();
        rows.push(row);
    }

    Ok(Table { columns, rows })
}

fn infer_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(v) = trimmed.parse::<i64>() {
        return Value::Int64(v);
    }
    match trimmed.parse::<f64>() {
        // "nan"/"inf" parse as floats but are text in a reserve list.
        Ok(v) if v.is_finite() => Value::Float64(v),
        _ => Value::Utf8(trimmed.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::infer_value;
    use crate::types::Value;

    #[test]
    fn infers_cell_types() {
        assert_eq!(infer_value(""), Value::Null);
        assert_eq!(infer_value("   "), Value::Null);
        assert_eq!(infer_value("101"), Value::Int64(101));
        assert_eq!(infer_value("2.5"), Value::Float64(2.5));
        assert_eq!(infer_value(" 505A "), Value::Utf8("505A".to_string()));
        assert_eq!(infer_value("NaN"), Value::Utf8("NaN".to_string()));
    }
}
