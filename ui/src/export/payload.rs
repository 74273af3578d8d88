//! Export payloads and visible-range scoping.

use crate::charts::zoom::VisibleRange;
use crate::data::row::{number, Row};

/// Rows offered by a chart card's download menu.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DownloadPayload {
    /// The aggregated series the chart draws.
    pub summary_rows: Vec<Row>,
    /// The filtered source rows behind it.
    pub detail_rows: Vec<Row>,
    /// File stem, without extension or timestamp.
    pub filename: String,
}

impl DownloadPayload {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }

    pub fn summary(mut self, rows: Vec<Row>) -> Self {
        self.summary_rows = rows;
        self
    }

    pub fn detail(mut self, rows: Vec<Row>) -> Self {
        self.detail_rows = rows;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.summary_rows.is_empty() && self.detail_rows.is_empty()
    }

    /// A copy with both arrays restricted to `range`; unchanged when `range`
    /// is `None`.
    pub fn scoped(&self, range: Option<&VisibleRange>) -> Self {
        match range {
            None => self.clone(),
            Some(range) => Self {
                summary_rows: scope_rows(&self.summary_rows, range),
                detail_rows: scope_rows(&self.detail_rows, range),
                filename: self.filename.clone(),
            },
        }
    }
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The column carrying the range's axis: the exact key, else its
/// capitalised form, else nothing.
fn axis_column(rows: &[Row], key: &str) -> Option<String> {
    let first = rows.first()?;
    if first.contains_key(key) {
        return Some(key.to_string());
    }
    let capitalized = capitalize(key);
    first.contains_key(&capitalized).then_some(capitalized)
}

/// Rows whose axis value lies in `[range.min, range.max]`. Arrays without
/// the axis column are returned unfiltered.
pub fn scope_rows(rows: &[Row], range: &VisibleRange) -> Vec<Row> {
    let Some(column) = axis_column(rows, &range.axis_key) else {
        return rows.to_vec();
    };
    rows.iter()
        .filter(|row| number(row, &column).is_some_and(|value| range.contains(value)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::row::{row, Cell};

    fn range(key: &str, min: f64, max: f64) -> VisibleRange {
        VisibleRange {
            axis_key: key.into(),
            min,
            max,
        }
    }

    fn yearly(header: &str) -> Vec<Row> {
        (2019..=2024)
            .map(|year| {
                row([
                    (header, Cell::Number(year as f64)),
                    ("Value", Cell::Number(1.0)),
                ])
            })
            .collect()
    }

    #[test]
    fn filters_inclusively() {
        let rows = scope_rows(&yearly("year"), &range("year", 2020.0, 2022.0));
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn retries_with_capitalised_key() {
        let rows = scope_rows(&yearly("Year"), &range("year", 2023.0, 2024.0));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn missing_axis_leaves_rows_alone() {
        let rows = yearly("Period");
        assert_eq!(scope_rows(&rows, &range("year", 2023.0, 2024.0)), rows);
    }

    #[test]
    fn no_range_is_identity() {
        let payload = DownloadPayload::new("trade")
            .summary(yearly("Year"))
            .detail(yearly("year"));
        assert_eq!(payload.scoped(None), payload);

        let scoped = payload.scoped(Some(&range("year", 2024.0, 2024.0)));
        assert_eq!(scoped.summary_rows.len(), 1);
        assert_eq!(scoped.detail_rows.len(), 1);
        assert_eq!(scoped.filename, "trade");
    }
}
