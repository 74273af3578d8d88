use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// A single CSV cell after normalisation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
    Null,
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(value) if value.is_finite() => Some(*value),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(value) => f.write_str(value),
            Cell::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{value:.0}")
            }
            Cell::Number(value) => write!(f, "{value}"),
            Cell::Null => Ok(()),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// Column name → cell, in header order.
pub type Row = IndexMap<String, Cell>;

/// Builds a row from `(column, cell)` pairs.
pub fn row<I, K, V>(pairs: I) -> Row
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Cell>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}

/// Numeric value of `column`, if present and numeric.
pub fn number(row: &Row, column: &str) -> Option<f64> {
    row.get(column).and_then(Cell::as_f64)
}

/// Display text of `column`, if present and non-null.
pub fn text(row: &Row, column: &str) -> Option<String> {
    row.get(column)
        .filter(|cell| !cell.is_null())
        .map(|cell| cell.to_string())
}

/// One loaded CSV file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    pub id: String,
    pub label: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn missing_columns<'a>(&self, expected: &[&'a str]) -> Vec<&'a str> {
        expected
            .iter()
            .copied()
            .filter(|column| !self.has_column(column))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numbers_display_without_decimals() {
        assert_eq!(Cell::Number(2023.0).to_string(), "2023");
        assert_eq!(Cell::Number(12.5).to_string(), "12.5");
        assert_eq!(Cell::Null.to_string(), "");
    }

    #[test]
    fn number_skips_text_and_null() {
        let r = row([("year", Cell::Number(2022.0)), ("mode", Cell::from("Truck"))]);
        assert_eq!(number(&r, "year"), Some(2022.0));
        assert_eq!(number(&r, "mode"), None);
        assert_eq!(number(&r, "missing"), None);
        assert_eq!(text(&r, "mode").as_deref(), Some("Truck"));
    }
}
