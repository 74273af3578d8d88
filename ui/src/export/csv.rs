//! CSV serialisation for downloads.

use tracing::debug;

use super::download::{download_bytes, timestamp_slug};
use super::ExportOutcome;
use crate::core::error::ExportError;
use crate::data::row::Row;

/// Byte-order mark so spreadsheet apps detect UTF-8.
pub const BOM: &str = "\u{feff}";

pub fn escape_csv(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    let needs_quotes = value.contains([',', '"', '\n', '\r']);
    if needs_quotes {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

/// Serialises `rows` with the first row's keys as the header. `None` when
/// there's nothing to write.
pub fn to_csv_string(rows: &[Row]) -> Option<String> {
    let columns: Vec<&String> = rows.first()?.keys().collect();

    let mut csv = String::from(BOM);
    let header = columns
        .iter()
        .map(|column| escape_csv(column))
        .collect::<Vec<_>>()
        .join(",");
    csv.push_str(&header);
    csv.push('\n');

    for row in rows {
        let line = columns
            .iter()
            .map(|column| {
                row.get(column.as_str())
                    .map(|cell| escape_csv(&cell.to_string()))
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join(",");
        csv.push_str(&line);
        csv.push('\n');
    }

    Some(csv)
}

/// `{stem}-{timestamp}.csv`
pub fn csv_filename(stem: &str) -> String {
    format!("{stem}-{}.csv", timestamp_slug())
}

/// Downloads `rows` as CSV; empty input is a no-op.
pub async fn export_csv(rows: &[Row], stem: &str) -> Result<ExportOutcome, ExportError> {
    let Some(csv) = to_csv_string(rows) else {
        debug!(stem, "skipping CSV export of empty rows");
        return Ok(ExportOutcome::Skipped);
    };
    download_bytes(&csv_filename(stem), "text/csv;charset=utf-8", csv.into_bytes()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::row::{row, Cell};

    #[test]
    fn quotes_only_when_needed() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv("line\r\nbreak"), "\"line\r\nbreak\"");
    }

    #[test]
    fn header_comes_from_first_row_and_starts_with_bom() {
        let rows = vec![
            row([("Year", Cell::Number(2024.0)), ("Value", Cell::Number(12.5))]),
            row([("Year", Cell::Number(2023.0)), ("Value", Cell::Null)]),
        ];
        let csv = to_csv_string(&rows).unwrap();
        assert_eq!(csv, "\u{feff}Year,Value\n2024,12.5\n2023,\n");
    }

    #[test]
    fn awkward_text_survives_a_reparse() {
        let values = ["a,b", "say \"hi\"", "line\nbreak", "cr\r\nlf", " padded "];
        let rows: Vec<Row> = values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                row([
                    ("Port, Name", Cell::Text((*value).to_string())),
                    ("Value", Cell::Number(i as f64 + 0.5)),
                ])
            })
            .collect();

        let csv = to_csv_string(&rows).unwrap();
        let body = csv.strip_prefix(BOM).expect("BOM first");
        let mut reader = ::csv::ReaderBuilder::new()
            .trim(::csv::Trim::None)
            .from_reader(body.as_bytes());

        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), ["Port, Name", "Value"]);

        let records: Vec<::csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(records.len(), values.len());
        for (i, (record, value)) in records.iter().zip(values).enumerate() {
            assert_eq!(&record[0], value);
            assert_eq!(record[1].parse::<f64>().unwrap(), i as f64 + 0.5);
        }
    }

    #[test]
    fn empty_rows_produce_nothing() {
        assert_eq!(to_csv_string(&[]), None);
        let outcome = futures::executor::block_on(export_csv(&[], "empty")).unwrap();
        assert_eq!(outcome, ExportOutcome::Skipped);
    }

    #[test]
    fn filename_has_stem_and_extension() {
        let name = csv_filename("us-mexico-trade-modes");
        assert!(name.starts_with("us-mexico-trade-modes-"));
        assert!(name.ends_with(".csv"));
    }
}
