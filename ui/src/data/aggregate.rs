//! Chart-ready aggregations over filtered rows.

use indexmap::IndexMap;
use serde::Serialize;

use super::columns;
use super::row::{number, text, Cell, Row};

/// Label used for rows whose grouping column is empty.
pub const UNKNOWN_LABEL: &str = "Unknown";
/// Label for the bucket collecting everything past the top N.
pub const OTHER_LABEL: &str = "Other";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryValue {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub x: f64,
    pub y: f64,
    pub series: String,
}

/// Category × stack-key matrix for stacked bars. `cells[c][k]` is the value of
/// key `k` within category `c`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PivotTable {
    pub categories: Vec<String>,
    pub keys: Vec<String>,
    pub cells: Vec<Vec<f64>>,
}

impl PivotTable {
    pub fn category_total(&self, index: usize) -> f64 {
        self.cells.get(index).map(|row| row.iter().sum()).unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.cells.iter().flatten().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() || self.keys.is_empty()
    }
}

fn group_label(row: &Row, column: &str) -> String {
    text(row, column).unwrap_or_else(|| UNKNOWN_LABEL.to_string())
}

fn value_of(row: &Row, column: &str) -> f64 {
    number(row, column).unwrap_or(0.0)
}

fn sort_desc(values: &mut [(String, f64)]) {
    values.sort_by(|a, b| b.1.total_cmp(&a.1));
}

/// Sum of `value_col` over all rows.
pub fn total(rows: &[Row], value_col: &str) -> f64 {
    rows.iter().map(|row| value_of(row, value_col)).sum()
}

/// Headline figures for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TradeTotals {
    pub exports: f64,
    pub imports: f64,
}

impl TradeTotals {
    pub fn total(&self) -> f64 {
        self.exports + self.imports
    }

    /// Exports minus imports.
    pub fn balance(&self) -> f64 {
        self.exports - self.imports
    }
}

/// Splits `value_col` by trade direction. Rows whose trade type is neither
/// export nor import are left out of both.
pub fn trade_totals(rows: &[Row], value_col: &str) -> TradeTotals {
    let mut totals = TradeTotals::default();
    for row in rows {
        let Some(kind) = text(row, columns::TRADE_TYPE) else {
            continue;
        };
        let value = value_of(row, value_col);
        if kind.eq_ignore_ascii_case("export") || kind.eq_ignore_ascii_case("exports") {
            totals.exports += value;
        } else if kind.eq_ignore_ascii_case("import") || kind.eq_ignore_ascii_case("imports") {
            totals.imports += value;
        }
    }
    totals
}

/// Sums `value_col` per distinct `key_col`, largest first.
pub fn group_sum(rows: &[Row], key_col: &str, value_col: &str) -> Vec<CategoryValue> {
    let mut sums: IndexMap<String, f64> = IndexMap::new();
    for row in rows {
        *sums.entry(group_label(row, key_col)).or_insert(0.0) += value_of(row, value_col);
    }

    let mut ordered: Vec<(String, f64)> = sums.into_iter().collect();
    sort_desc(&mut ordered);
    ordered
        .into_iter()
        .map(|(label, value)| CategoryValue { label, value })
        .collect()
}

/// Sums `value_col` per `(series, x)`. Rows without a numeric x are skipped.
/// Output is ordered by series name, then x.
pub fn time_series(
    rows: &[Row],
    x_col: &str,
    value_col: &str,
    series_col: Option<&str>,
) -> Vec<SeriesPoint> {
    let mut sums: IndexMap<(String, i64), (f64, f64)> = IndexMap::new();
    for row in rows {
        let Some(x) = number(row, x_col) else {
            continue;
        };
        let series = match series_col {
            Some(column) => group_label(row, column),
            None => "Total".to_string(),
        };
        // keyed on the bit pattern so fractional x values stay distinct
        let entry = sums.entry((series, x.to_bits() as i64)).or_insert((x, 0.0));
        entry.1 += value_of(row, value_col);
    }

    let mut points: Vec<SeriesPoint> = sums
        .into_iter()
        .map(|((series, _), (x, y))| SeriesPoint { x, y, series })
        .collect();
    points.sort_by(|a, b| a.series.cmp(&b.series).then(a.x.total_cmp(&b.x)));
    points
}

/// Pivots rows into a category × key table, both axes ordered by total.
pub fn pivot(rows: &[Row], category_col: &str, stack_col: &str, value_col: &str) -> PivotTable {
    let mut category_totals: IndexMap<String, f64> = IndexMap::new();
    let mut key_totals: IndexMap<String, f64> = IndexMap::new();
    let mut sums: IndexMap<(String, String), f64> = IndexMap::new();

    for row in rows {
        let category = group_label(row, category_col);
        let key = group_label(row, stack_col);
        let value = value_of(row, value_col);
        *category_totals.entry(category.clone()).or_insert(0.0) += value;
        *key_totals.entry(key.clone()).or_insert(0.0) += value;
        *sums.entry((category, key)).or_insert(0.0) += value;
    }

    let mut categories: Vec<(String, f64)> = category_totals.into_iter().collect();
    let mut keys: Vec<(String, f64)> = key_totals.into_iter().collect();
    sort_desc(&mut categories);
    sort_desc(&mut keys);

    let cells = categories
        .iter()
        .map(|(category, _)| {
            keys.iter()
                .map(|(key, _)| {
                    sums.get(&(category.clone(), key.clone()))
                        .copied()
                        .unwrap_or(0.0)
                })
                .collect()
        })
        .collect();

    PivotTable {
        categories: categories.into_iter().map(|(label, _)| label).collect(),
        keys: keys.into_iter().map(|(label, _)| label).collect(),
        cells,
    }
}

/// Keeps the first `n` categories and folds the rest into [`OTHER_LABEL`].
pub fn top_n_with_other(mut values: Vec<CategoryValue>, n: usize) -> Vec<CategoryValue> {
    if values.len() <= n {
        return values;
    }
    let rest: f64 = values.drain(n..).map(|entry| entry.value).sum();
    values.push(CategoryValue {
        label: OTHER_LABEL.to_string(),
        value: rest,
    });
    values
}

/// Keeps the first `n` categories of a pivot, folding the rest into one row.
pub fn pivot_top_n(mut table: PivotTable, n: usize) -> PivotTable {
    if table.categories.len() <= n {
        return table;
    }
    let folded: Vec<f64> = table.cells.drain(n..).fold(
        vec![0.0; table.keys.len()],
        |mut acc, row| {
            for (slot, value) in acc.iter_mut().zip(row) {
                *slot += value;
            }
            acc
        },
    );
    table.categories.truncate(n);
    table.categories.push(OTHER_LABEL.to_string());
    table.cells.push(folded);
    table
}

pub fn distinct_x(points: &[SeriesPoint]) -> usize {
    let mut xs: Vec<f64> = points.iter().map(|point| point.x).collect();
    xs.sort_by(f64::total_cmp);
    xs.dedup();
    xs.len()
}

/// Export rows for a category series: `{label_header, value_header}`.
pub fn category_rows(values: &[CategoryValue], label_header: &str, value_header: &str) -> Vec<Row> {
    values
        .iter()
        .map(|entry| {
            let mut row = Row::with_capacity(2);
            row.insert(label_header.to_string(), Cell::Text(entry.label.clone()));
            row.insert(value_header.to_string(), Cell::Number(entry.value));
            row
        })
        .collect()
}

/// Export rows for a time series: `{x_header, series_header?, value_header}`.
pub fn series_rows(
    points: &[SeriesPoint],
    x_header: &str,
    series_header: Option<&str>,
    value_header: &str,
) -> Vec<Row> {
    points
        .iter()
        .map(|point| {
            let mut row = Row::with_capacity(3);
            row.insert(x_header.to_string(), Cell::Number(point.x));
            if let Some(header) = series_header {
                row.insert(header.to_string(), Cell::Text(point.series.clone()));
            }
            row.insert(value_header.to_string(), Cell::Number(point.y));
            row
        })
        .collect()
}

/// Export rows for a pivot: one row per category, one column per key.
pub fn pivot_rows(table: &PivotTable, category_header: &str) -> Vec<Row> {
    table
        .categories
        .iter()
        .zip(&table.cells)
        .map(|(category, cells)| {
            let mut row = Row::with_capacity(table.keys.len() + 1);
            row.insert(category_header.to_string(), Cell::Text(category.clone()));
            for (key, value) in table.keys.iter().zip(cells) {
                row.insert(key.clone(), Cell::Number(*value));
            }
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::row::row;

    fn rows() -> Vec<Row> {
        vec![
            row([
                ("year", Cell::Number(2022.0)),
                ("mode", Cell::from("Truck")),
                ("trade_type", Cell::from("Export")),
                ("value", Cell::Number(10.0)),
            ]),
            row([
                ("year", Cell::Number(2022.0)),
                ("mode", Cell::from("Rail")),
                ("trade_type", Cell::from("Import")),
                ("value", Cell::Number(4.0)),
            ]),
            row([
                ("year", Cell::Number(2023.0)),
                ("mode", Cell::from("Truck")),
                ("trade_type", Cell::from("Export")),
                ("value", Cell::Number(7.5)),
            ]),
            row([
                ("year", Cell::Number(2024.0)),
                ("mode", Cell::Null),
                ("trade_type", Cell::from("Import")),
                ("value", Cell::Null),
            ]),
        ]
    }

    #[test]
    fn group_sum_preserves_total_and_orders_desc() {
        let rows = rows();
        let grouped = group_sum(&rows, "mode", "value");
        let labels: Vec<&str> = grouped.iter().map(|entry| entry.label.as_str()).collect();
        assert_eq!(labels, ["Truck", "Rail", UNKNOWN_LABEL]);
        let sum: f64 = grouped.iter().map(|entry| entry.value).sum();
        assert_eq!(sum, total(&rows, "value"));
    }

    #[test]
    fn time_series_groups_by_series_then_x() {
        let points = time_series(&rows(), "year", "value", Some("trade_type"));
        let summary: Vec<(&str, f64, f64)> = points
            .iter()
            .map(|p| (p.series.as_str(), p.x, p.y))
            .collect();
        assert_eq!(
            summary,
            [
                ("Export", 2022.0, 10.0),
                ("Export", 2023.0, 7.5),
                ("Import", 2022.0, 4.0),
                ("Import", 2024.0, 0.0),
            ]
        );
        assert_eq!(distinct_x(&points), 3);
    }

    #[test]
    fn pivot_cells_sum_to_total() {
        let rows = rows();
        let table = pivot(&rows, "year", "mode", "value");
        assert_eq!(table.categories, ["2022", "2023", "2024"]);
        assert_eq!(table.keys[0], "Truck");
        assert_eq!(table.total(), total(&rows, "value"));
        assert_eq!(table.category_total(0), 14.0);
    }

    #[test]
    fn top_n_folds_remainder_into_other() {
        let values = vec![
            CategoryValue { label: "a".into(), value: 5.0 },
            CategoryValue { label: "b".into(), value: 3.0 },
            CategoryValue { label: "c".into(), value: 2.0 },
            CategoryValue { label: "d".into(), value: 1.0 },
        ];
        let folded = top_n_with_other(values, 2);
        assert_eq!(folded.len(), 3);
        assert_eq!(folded[2].label, OTHER_LABEL);
        assert_eq!(folded[2].value, 3.0);
    }

    #[test]
    fn export_rows_use_display_headers() {
        let points = time_series(&rows(), "year", "value", None);
        let exported = series_rows(&points, "Year", None, "Value");
        assert_eq!(exported.len(), 3);
        assert_eq!(exported[0].keys().collect::<Vec<_>>(), ["Year", "Value"]);
    }

    #[test]
    fn trade_totals_split_by_direction() {
        let totals = trade_totals(&rows(), "value");
        assert!(totals.exports > 0.0);
        assert!(totals.imports > 0.0);
        assert_eq!(totals.total(), total(&rows(), "value"));
        assert_eq!(totals.balance(), totals.exports - totals.imports);
    }
}
