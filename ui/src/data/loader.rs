//! CSV loading: header alias resolution, numeric coercion and trimming.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

use rust_embed::RustEmbed;

use super::columns;
use super::row::{Cell, Dataset, Row};
use crate::core::config::DatasetConfig;
use crate::core::error::DataError;

#[derive(RustEmbed)]
#[folder = "assets/data/"]
struct EmbeddedData;

/// Where dataset files are read from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// CSV files compiled into the binary.
    Embedded,
    /// A directory of CSV files on disk.
    #[cfg(not(target_arch = "wasm32"))]
    Directory(PathBuf),
    /// In-memory `(file name, contents)` pairs.
    Inline(Vec<(String, String)>),
}

impl DataSource {
    /// Embedded data, unless the desktop build is pointed at a directory.
    pub fn from_env() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Some(dir) = std::env::var_os(crate::core::config::DATA_DIR_ENV) {
                return DataSource::Directory(PathBuf::from(dir));
            }
        }
        DataSource::Embedded
    }

    fn read(&self, file: &str) -> Result<Vec<u8>, DataError> {
        match self {
            DataSource::Embedded => EmbeddedData::get(file)
                .map(|asset| asset.data.into_owned())
                .ok_or_else(|| DataError::MissingAsset(file.to_string())),
            #[cfg(not(target_arch = "wasm32"))]
            DataSource::Directory(dir) => {
                let path = dir.join(file);
                std::fs::read(&path).map_err(|source| DataError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
            DataSource::Inline(files) => files
                .iter()
                .find(|(name, _)| name == file)
                .map(|(_, contents)| contents.clone().into_bytes())
                .ok_or_else(|| DataError::MissingAsset(file.to_string())),
        }
    }
}

/// Normalised alias key → canonical column.
const HEADER_ALIASES: &[(&str, &str)] = &[
    ("year", columns::YEAR),
    ("yr", columns::YEAR),
    ("tradeyear", columns::YEAR),
    ("tradetype", columns::TRADE_TYPE),
    ("flow", columns::TRADE_TYPE),
    ("tradeflow", columns::TRADE_TYPE),
    ("direction", columns::TRADE_TYPE),
    ("mode", columns::MODE),
    ("transportmode", columns::MODE),
    ("modeoftransport", columns::MODE),
    ("state", columns::STATE),
    ("usstate", columns::STATE),
    ("port", columns::PORT),
    ("portname", columns::PORT),
    ("portofentry", columns::PORT),
    ("commodity", columns::COMMODITY),
    ("commoditydescription", columns::COMMODITY),
    ("commoditygroup", columns::COMMODITY_GROUP),
    ("hsgroup", columns::COMMODITY_GROUP),
    ("value", columns::VALUE),
    ("tradevalue", columns::VALUE),
    ("valueusd", columns::VALUE),
];

/// Resolves a raw CSV header to its canonical column name.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim_start_matches('\u{feff}').trim();
    let key: String = trimmed
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    HEADER_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Parses `"$1,234.5"`-style numbers.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

pub fn parse_dataset(id: &str, label: &str, bytes: &[u8]) -> Result<Dataset, DataError> {
    let csv_error = |source| DataError::Csv {
        dataset: id.to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(normalize_header)
        .collect();

    let mut rows = Vec::new();
    let mut unparseable = 0usize;

    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let mut row = Row::with_capacity(columns.len());
        for (index, column) in columns.iter().enumerate() {
            let raw = record.get(index).unwrap_or("").trim();
            let cell = if raw.is_empty() {
                Cell::Null
            } else if columns::NUMERIC.contains(&column.as_str()) {
                match parse_number(raw) {
                    Some(value) => Cell::Number(value),
                    None => {
                        unparseable += 1;
                        Cell::Null
                    }
                }
            } else {
                Cell::Text(raw.to_string())
            };
            row.insert(column.clone(), cell);
        }
        rows.push(row);
    }

    if unparseable > 0 {
        tracing::warn!("dataset `{id}`: {unparseable} numeric cells could not be parsed");
    }

    Ok(Dataset {
        id: id.to_string(),
        label: label.to_string(),
        columns,
        rows,
    })
}

/// Reads and parses every configured dataset.
pub async fn fetch_datasets(
    source: &DataSource,
    configured: &[DatasetConfig],
) -> Result<Vec<Dataset>, DataError> {
    let mut datasets = Vec::with_capacity(configured.len());
    for entry in configured {
        let bytes = source.read(&entry.file)?;
        let dataset = parse_dataset(&entry.id, &entry.label, &bytes)?;
        tracing::info!("loaded `{}` ({} rows)", entry.id, dataset.rows.len());
        datasets.push(dataset);
    }
    Ok(datasets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::config;
    use crate::data::row::number;

    #[test]
    fn aliases_resolve_to_canonical_columns() {
        assert_eq!(normalize_header("Trade Value"), "value");
        assert_eq!(normalize_header("TradeValue"), "value");
        assert_eq!(normalize_header(" Trade Type "), "trade_type");
        assert_eq!(normalize_header("\u{feff}Year"), "year");
        assert_eq!(normalize_header("Commodity Group"), "commodity_group");
        assert_eq!(normalize_header("Notes"), "Notes");
    }

    #[test]
    fn numbers_strip_currency_noise() {
        assert_eq!(parse_number("$1,234.50"), Some(1234.5));
        assert_eq!(parse_number(" 2023 "), Some(2023.0));
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn parse_dataset_coerces_and_trims() {
        let csv = "Year,Trade Type,Mode,Trade Value\n2022, Export ,Truck,\"$1,000\"\n2023,Import,,oops\n,,,\n";
        let dataset = parse_dataset("modes", "Modes", csv.as_bytes()).unwrap();
        assert_eq!(dataset.columns, ["year", "trade_type", "mode", "value"]);
        assert_eq!(dataset.rows.len(), 2);

        let first = &dataset.rows[0];
        assert_eq!(number(first, "year"), Some(2022.0));
        assert_eq!(first["trade_type"], Cell::Text("Export".into()));
        assert_eq!(number(first, "value"), Some(1000.0));

        let second = &dataset.rows[1];
        assert_eq!(second["mode"], Cell::Null);
        assert_eq!(second["value"], Cell::Null);
    }

    #[test]
    fn embedded_datasets_load_with_required_columns() {
        let datasets =
            futures::executor::block_on(fetch_datasets(&DataSource::Embedded, &config().datasets))
                .unwrap();
        assert_eq!(datasets.len(), 3);
        for dataset in &datasets {
            assert!(!dataset.rows.is_empty(), "{} is empty", dataset.id);
            assert!(dataset.missing_columns(&columns::REQUIRED).is_empty());
        }
    }

    #[test]
    fn missing_inline_file_is_reported() {
        let source = DataSource::Inline(Vec::new());
        let err = source.read("absent.csv").unwrap_err();
        assert!(matches!(err, DataError::MissingAsset(name) if name == "absent.csv"));
    }
}
