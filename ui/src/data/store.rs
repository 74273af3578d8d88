//! Application data store: loaded datasets, filter selections and load status.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::columns;
use super::filters::{FilterKey, FilterState};
pub use super::loader::DataSource;
use super::loader::fetch_datasets;
use super::row::{text, Dataset, Row};
use crate::core::config::DatasetConfig;
use crate::core::error::DataError;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Owns every dataset for the lifetime of the page, plus the filter state.
///
/// Components receive the store explicitly (a `Signal<DashboardStore>` handed
/// down from the page) and mutate it only through the setters below.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStore {
    datasets: Vec<Dataset>,
    filters: FilterState,
    status: LoadStatus,
}

impl DashboardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == LoadStatus::Ready
    }

    pub fn begin_loading(&mut self) {
        self.status = LoadStatus::Loading;
    }

    /// Applies the outcome of [`fetch_datasets`]. Missing expected columns are
    /// logged but never fail the load.
    pub fn finish_loading(&mut self, result: Result<Vec<Dataset>, DataError>) {
        match result {
            Ok(datasets) => {
                for dataset in &datasets {
                    let missing = dataset.missing_columns(&columns::REQUIRED);
                    if !missing.is_empty() {
                        tracing::warn!(
                            "dataset `{}` is missing expected columns: {}",
                            dataset.id,
                            missing.join(", ")
                        );
                    }
                }
                self.datasets = datasets;
                self.status = LoadStatus::Ready;
            }
            Err(err) => {
                tracing::warn!("data load failed: {err}");
                self.datasets.clear();
                self.status = LoadStatus::Failed(err.to_string());
            }
        }
    }

    /// Loads every configured dataset, moving through Loading → Ready/Failed.
    pub async fn load_data(&mut self, source: &DataSource, datasets: &[DatasetConfig]) {
        self.begin_loading();
        let result = fetch_datasets(source, datasets).await;
        self.finish_loading(result);
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    pub fn dataset(&self, id: &str) -> Result<&Dataset, DataError> {
        self.datasets
            .iter()
            .find(|dataset| dataset.id == id)
            .ok_or_else(|| DataError::UnknownDataset(id.to_string()))
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn set_filter(&mut self, key: FilterKey, value: impl Into<String>) {
        self.filters.set(key, value);
        tracing::debug!(filters = ?self.filters.active().collect::<Vec<_>>(), "filters changed");
    }

    pub fn reset_filters(&mut self) {
        self.filters.reset();
        tracing::debug!("filters cleared");
    }

    /// Rows of `dataset_id` that pass the current filters.
    pub fn filtered_rows(&self, dataset_id: &str) -> Result<Vec<Row>, DataError> {
        Ok(self.filters.apply(self.dataset(dataset_id)?))
    }

    /// Distinct values for a filter across every dataset carrying its column.
    pub fn filter_options(&self, key: FilterKey) -> Vec<String> {
        let column = key.column();
        let values: BTreeSet<String> = self
            .datasets
            .iter()
            .filter(|dataset| dataset.has_column(column))
            .flat_map(|dataset| dataset.rows.iter().filter_map(|row| text(row, column)))
            .collect();

        let mut values: Vec<String> = values.into_iter().collect();
        values.sort_by(|a, b| match (a.parse::<f64>(), b.parse::<f64>()) {
            (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => a.cmp(b),
        });
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DatasetConfig;

    fn inline_source() -> (DataSource, Vec<DatasetConfig>) {
        let source = DataSource::Inline(vec![
            (
                "modes.csv".into(),
                "Year,Trade Type,Mode,Value\n2021,Export,Truck,5\n2021,Import,Rail,7\n2022,Export,Rail,9\n".into(),
            ),
            (
                "ports.csv".into(),
                "Year,Flow,Port Name,Trade Value\n2022,Export,Laredo,3\n".into(),
            ),
        ]);
        let datasets = vec![
            DatasetConfig {
                id: "modes".into(),
                file: "modes.csv".into(),
                label: "Modes".into(),
            },
            DatasetConfig {
                id: "ports".into(),
                file: "ports.csv".into(),
                label: "Ports".into(),
            },
        ];
        (source, datasets)
    }

    #[test]
    fn load_data_transitions_to_ready() {
        let (source, datasets) = inline_source();
        let mut store = DashboardStore::new();
        assert_eq!(store.status(), &LoadStatus::Idle);
        futures::executor::block_on(store.load_data(&source, &datasets));
        assert!(store.is_ready());
        assert_eq!(store.datasets().len(), 2);
    }

    #[test]
    fn load_failure_sets_error_flag() {
        let (_, datasets) = inline_source();
        let mut store = DashboardStore::new();
        futures::executor::block_on(store.load_data(&DataSource::Inline(Vec::new()), &datasets));
        assert!(matches!(store.status(), LoadStatus::Failed(msg) if msg.contains("modes.csv")));
        assert!(store.datasets().is_empty());
    }

    #[test]
    fn filters_narrow_rows_and_reset_restores_them() {
        let (source, datasets) = inline_source();
        let mut store = DashboardStore::new();
        futures::executor::block_on(store.load_data(&source, &datasets));

        store.set_filter(FilterKey::TradeType, "Export");
        assert_eq!(store.filtered_rows("modes").unwrap().len(), 2);
        store.set_filter(FilterKey::Mode, "Rail");
        assert_eq!(store.filtered_rows("modes").unwrap().len(), 1);
        // the ports dataset has no mode column, so only trade type applies
        assert_eq!(store.filtered_rows("ports").unwrap().len(), 1);

        store.reset_filters();
        assert_eq!(store.filtered_rows("modes").unwrap().len(), 3);
    }

    #[test]
    fn filter_options_sort_numerically() {
        let (source, datasets) = inline_source();
        let mut store = DashboardStore::new();
        futures::executor::block_on(store.load_data(&source, &datasets));
        assert_eq!(store.filter_options(FilterKey::Year), ["2021", "2022"]);
        assert_eq!(store.filter_options(FilterKey::Port), ["Laredo"]);
    }

    #[test]
    fn unknown_dataset_is_an_error() {
        let store = DashboardStore::new();
        assert!(matches!(
            store.filtered_rows("nope"),
            Err(DataError::UnknownDataset(id)) if id == "nope"
        ));
    }
}
