//! The dashboard store as shared application state.
//!
//! Launchers call [`use_dashboard_provider`] once at the root; pages and
//! regions read it back with [`use_dashboard`] and mutate it only through the
//! store's setters.

use dioxus::prelude::*;

use crate::core::config::config;
use crate::core::platform;
use crate::data::loader::fetch_datasets;
use crate::data::{DashboardStore, DataSource};

/// Provides the store to the tree and starts the one-time data load.
pub fn use_dashboard_provider() -> Signal<DashboardStore> {
    let store = use_context_provider(|| Signal::new(DashboardStore::new()));

    use_hook(move || {
        let mut store = store;
        store.write().begin_loading();
        platform::spawn_future(async move {
            let source = DataSource::from_env();
            tracing::info!(?source, "loading datasets");
            let result = fetch_datasets(&source, &config().datasets).await;
            store.write().finish_loading(result);
        });
    });

    store
}

pub fn use_dashboard() -> Signal<DashboardStore> {
    use_context::<Signal<DashboardStore>>()
}
