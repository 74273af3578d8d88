use std::collections::BTreeMap;

use super::columns;
use super::row::{text, Dataset, Row};

/// Dimensions the dashboard can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterKey {
    Year,
    TradeType,
    Mode,
    State,
    CommodityGroup,
    Port,
}

impl FilterKey {
    pub const ALL: [FilterKey; 6] = [
        FilterKey::Year,
        FilterKey::TradeType,
        FilterKey::Mode,
        FilterKey::State,
        FilterKey::CommodityGroup,
        FilterKey::Port,
    ];

    pub fn column(self) -> &'static str {
        match self {
            FilterKey::Year => columns::YEAR,
            FilterKey::TradeType => columns::TRADE_TYPE,
            FilterKey::Mode => columns::MODE,
            FilterKey::State => columns::STATE,
            FilterKey::CommodityGroup => columns::COMMODITY_GROUP,
            FilterKey::Port => columns::PORT,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterKey::Year => "Year",
            FilterKey::TradeType => "Trade type",
            FilterKey::Mode => "Mode",
            FilterKey::State => "State",
            FilterKey::CommodityGroup => "Commodity group",
            FilterKey::Port => "Port",
        }
    }
}

/// Selected value per filter key. A missing key means "no restriction".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    selections: BTreeMap<FilterKey, String>,
}

impl FilterState {
    pub fn get(&self, key: FilterKey) -> Option<&str> {
        self.selections.get(&key).map(String::as_str)
    }

    /// Sets a selection; an empty value clears it.
    pub fn set(&mut self, key: FilterKey, value: impl Into<String>) {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.selections.remove(&key);
        } else {
            self.selections.insert(key, trimmed.to_string());
        }
    }

    pub fn reset(&mut self) {
        self.selections.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn active(&self) -> impl Iterator<Item = (FilterKey, &str)> {
        self.selections.iter().map(|(key, value)| (*key, value.as_str()))
    }

    /// Whether `row` of `dataset` passes every selection. Selections on
    /// columns the dataset doesn't carry are ignored.
    pub fn matches(&self, dataset: &Dataset, row: &Row) -> bool {
        self.selections.iter().all(|(key, selected)| {
            let column = key.column();
            if !dataset.has_column(column) {
                return true;
            }
            text(row, column).is_some_and(|value| value == *selected)
        })
    }

    pub fn apply(&self, dataset: &Dataset) -> Vec<Row> {
        dataset
            .rows
            .iter()
            .filter(|row| self.matches(dataset, row))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::row::{row, Cell};

    fn dataset() -> Dataset {
        Dataset {
            id: "modes".into(),
            label: "Modes".into(),
            columns: vec!["year".into(), "trade_type".into(), "value".into()],
            rows: vec![
                row([
                    ("year", Cell::Number(2022.0)),
                    ("trade_type", Cell::from("Export")),
                    ("value", Cell::Number(10.0)),
                ]),
                row([
                    ("year", Cell::Number(2023.0)),
                    ("trade_type", Cell::from("Import")),
                    ("value", Cell::Number(20.0)),
                ]),
            ],
        }
    }

    #[test]
    fn empty_value_clears_selection() {
        let mut filters = FilterState::default();
        filters.set(FilterKey::Mode, "Truck");
        assert_eq!(filters.get(FilterKey::Mode), Some("Truck"));
        filters.set(FilterKey::Mode, "  ");
        assert!(filters.is_empty());
    }

    #[test]
    fn numeric_cells_match_their_display_text() {
        let mut filters = FilterState::default();
        filters.set(FilterKey::Year, "2023");
        let rows = filters.apply(&dataset());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["trade_type"], Cell::from("Import"));
    }

    #[test]
    fn selections_on_absent_columns_are_ignored() {
        let mut filters = FilterState::default();
        filters.set(FilterKey::Port, "Laredo");
        assert_eq!(filters.apply(&dataset()).len(), 2);
    }
}
