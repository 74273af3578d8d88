//! Data layer: rows, loading, filtering and aggregation.
//!
//! ```text
//!  embedded CSV / data dir
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader  │  parse + normalise headers → Dataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  store   │  datasets + FilterState + LoadStatus
//!   └──────────┘
//!        │  filtered rows
//!        ▼
//!   ┌───────────┐
//!   │ aggregate │  grouped sums, pivots, time series → charts
//!   └───────────┘
//! ```

pub mod aggregate;
pub mod filters;
pub mod loader;
pub mod row;
pub mod store;

pub use filters::{FilterKey, FilterState};
pub use row::{Cell, Dataset, Row};
pub use store::{DashboardStore, DataSource, LoadStatus};

/// Canonical column names produced by header normalisation.
pub mod columns {
    pub const YEAR: &str = "year";
    pub const TRADE_TYPE: &str = "trade_type";
    pub const MODE: &str = "mode";
    pub const STATE: &str = "state";
    pub const PORT: &str = "port";
    pub const COMMODITY: &str = "commodity";
    pub const COMMODITY_GROUP: &str = "commodity_group";
    pub const VALUE: &str = "value";

    /// Columns every dataset is expected to carry.
    pub const REQUIRED: [&str; 3] = [YEAR, TRADE_TYPE, VALUE];

    /// Columns whose cells are coerced to numbers.
    pub const NUMERIC: [&str; 2] = [YEAR, VALUE];
}
