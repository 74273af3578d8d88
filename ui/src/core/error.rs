//! Error types shared by the data layer and the export pipeline.

use thiserror::Error;

/// Failures while loading or querying datasets.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("embedded data file `{0}` is missing")]
    MissingAsset(String),

    #[error("couldn't read `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("couldn't parse dataset `{dataset}`: {source}")]
    Csv {
        dataset: String,
        #[source]
        source: csv::Error,
    },

    #[error("unknown dataset `{0}`")]
    UnknownDataset(String),
}

/// Failures while serialising or rasterising an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export")]
    Empty,

    #[error("chart surface has zero size ({width}×{height})")]
    ZeroSize { width: f64, height: f64 },

    #[error("SVG could not be decoded: {0}")]
    Svg(String),

    #[error("rasterisation failed: {0}")]
    Raster(String),

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("couldn't write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Platform(String),
}
