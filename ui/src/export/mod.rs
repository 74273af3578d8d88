//! CSV and PNG exports.
//!
//! Payloads are assembled at click time from the chart card's data, scoped to
//! the visible range when the chart is zoomed, and handed to the platform's
//! download mechanism.

pub mod csv;
pub mod download;
pub mod payload;
pub mod png;

pub use payload::{scope_rows, DownloadPayload};

/// Where an export ended up.
#[derive(Clone, Debug, PartialEq)]
pub enum ExportOutcome {
    /// Nothing was produced, e.g. an empty table.
    Skipped,
    /// The browser download was triggered.
    Started,
    /// Written to disk at this path.
    Saved(String),
}

impl ExportOutcome {
    pub fn message(&self, what: &str) -> Option<String> {
        match self {
            ExportOutcome::Skipped => None,
            ExportOutcome::Started => Some(format!("{what} download started")),
            ExportOutcome::Saved(path) => Some(format!("{what} saved to {path}")),
        }
    }
}

/// Progress shown next to the export controls.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum ExportStatus {
    #[default]
    Idle,
    Working(&'static str),
    Done(String),
    Error(String),
}

impl ExportStatus {
    pub fn from_outcome(outcome: &ExportOutcome, what: &str) -> Self {
        match outcome.message(what) {
            Some(message) => ExportStatus::Done(message),
            None => ExportStatus::Idle,
        }
    }
}
