//! Shared UI crate for Tradeboard: data loading, chart rendering, exports and
//! the dashboard pages. The `web` and `desktop` crates only add routing and a
//! launcher around it.

pub mod charts;
pub mod core;
pub mod data;
pub mod export;
pub mod state;
pub mod views;

pub use state::{use_dashboard, use_dashboard_provider};

pub mod components {
    // Branded application navbar (components/app_navbar.rs)
    pub mod app_navbar;
    pub use app_navbar::register_nav;
    pub use app_navbar::AppNavbar;
    pub use app_navbar::NavBuilder;

    pub mod chart_card;
    pub use chart_card::ChartCard;

    pub mod chart_view;
    pub use chart_view::{ChartView, SnapshotSlot};

    pub mod data_table;
    pub use data_table::DataTable;

    pub(crate) mod export_controls;
    pub use export_controls::ExportFeedback;

    pub mod filter_bar;
    pub use filter_bar::FilterBar;

    pub mod highlights;
    pub use highlights::Highlights;

    pub mod region_guard;
    pub use region_guard::RegionGuard;

    pub mod status;
    pub use status::{DataGate, ErrorPanel, LoadingPanel};
}
