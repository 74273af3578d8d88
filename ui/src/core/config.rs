//! Dashboard configuration, embedded at build time from `assets/dashboard.json`.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

const EMBEDDED_CONFIG: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/dashboard.json"
));

/// Environment override for the desktop data directory.
pub const DATA_DIR_ENV: &str = "TRADEBOARD_DATA_DIR";

pub const MODES_DATASET: &str = "modes";
pub const STATES_DATASET: &str = "states";
pub const COMMODITIES_DATASET: &str = "commodities";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub id: String,
    pub file: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    pub tagline: String,
    pub export_prefix: String,
    pub table_page_size: usize,
    pub datasets: Vec<DatasetConfig>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let dataset = |id: &str, file: &str, label: &str| DatasetConfig {
            id: id.into(),
            file: file.into(),
            label: label.into(),
        };
        Self {
            title: "Tradeboard".into(),
            tagline: "U.S.–Mexico trade at a glance".into(),
            export_prefix: "us-mexico-trade".into(),
            table_page_size: 25,
            datasets: vec![
                dataset(MODES_DATASET, "trade_by_mode.csv", "Trade by transport mode"),
                dataset(STATES_DATASET, "trade_by_state.csv", "Trade by U.S. state"),
                dataset(
                    COMMODITIES_DATASET,
                    "trade_by_commodity.csv",
                    "Trade by port and commodity",
                ),
            ],
        }
    }
}

impl DashboardConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn dataset(&self, id: &str) -> Option<&DatasetConfig> {
        self.datasets.iter().find(|dataset| dataset.id == id)
    }

    /// Filename stem for an export, e.g. `us-mexico-trade-trade-by-mode`.
    pub fn export_name(&self, stem: &str) -> String {
        format!("{}-{}", self.export_prefix, slugify(stem))
    }
}

static CONFIG: OnceCell<DashboardConfig> = OnceCell::new();

/// Process-wide configuration, parsed once.
pub fn config() -> &'static DashboardConfig {
    CONFIG.get_or_init(|| match DashboardConfig::from_json(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("dashboard.json is invalid ({err}); using built-in defaults");
            DashboardConfig::default()
        }
    })
}

pub fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            dash = false;
        } else if !dash && !slug.is_empty() {
            slug.push('-');
            dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_parses() {
        let parsed = DashboardConfig::from_json(EMBEDDED_CONFIG).unwrap();
        assert_eq!(parsed.datasets.len(), 3);
        assert!(parsed.dataset(MODES_DATASET).is_some());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let parsed = DashboardConfig::from_json(r#"{ "title": "Border" }"#).unwrap();
        assert_eq!(parsed.title, "Border");
        assert_eq!(parsed.table_page_size, 25);
        assert_eq!(parsed.datasets.len(), 3);
    }

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("Trade by Mode (2019–2024)"), "trade-by-mode-2019-2024");
        assert_eq!(
            DashboardConfig::default().export_name("Top ports"),
            "us-mexico-trade-top-ports"
        );
    }
}
