mod overview;
pub use overview::Overview;

mod breakdown;
pub use breakdown::Breakdown;

mod data;
pub use data::DataExplorer;
