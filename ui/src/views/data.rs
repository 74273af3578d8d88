use dioxus::prelude::*;

use crate::components::{DataGate, DataTable, FilterBar, RegionGuard};
use crate::core::config::{config, MODES_DATASET};

/// Raw rows of any configured dataset, filtered and paginated.
#[component]
pub fn DataExplorer() -> Element {
    let mut dataset_id = use_signal(|| MODES_DATASET.to_string());
    let datasets = &config().datasets;

    rsx! {
        section { class: "page page-data",
            div { class: "page__intro",
                h1 { "Data" }
                p { "Browse the source tables behind the charts and download them as CSV." }
            }

            div { class: "dataset-picker", role: "tablist",
                for dataset in datasets.iter() {
                    button {
                        key: "{dataset.id}",
                        r#type: "button",
                        role: "tab",
                        class: if dataset_id() == dataset.id { "button button--primary" } else { "button button--ghost" },
                        onclick: {
                            let id = dataset.id.clone();
                            move |_| dataset_id.set(id.clone())
                        },
                        "{dataset.label}"
                    }
                }
            }

            FilterBar {}

            DataGate {
                RegionGuard { title: "Data table",
                    DataTable { key: "{dataset_id}", dataset_id: dataset_id() }
                }
            }
        }
    }
}
