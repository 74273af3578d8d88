use dioxus::prelude::*;

use crate::data::LoadStatus;
use crate::state::use_dashboard;

#[component]
pub fn LoadingPanel(#[props(default = "Loading trade data…".to_string())] message: String) -> Element {
    rsx! {
        div { class: "status-panel status-panel--loading", role: "status",
            span { class: "status-panel__spinner", aria_hidden: "true" }
            p { "{message}" }
        }
    }
}

#[component]
pub fn ErrorPanel(message: String) -> Element {
    rsx! {
        div { class: "status-panel status-panel--error", role: "alert",
            strong { "The trade data couldn't be loaded." }
            p { class: "status-panel__detail", "{message}" }
        }
    }
}

/// Renders `children` once the datasets are loaded, a status panel before.
#[component]
pub fn DataGate(children: Element) -> Element {
    let store = use_dashboard();
    let status = store.read().status().clone();

    match status {
        LoadStatus::Ready => rsx! { {children} },
        LoadStatus::Failed(message) => rsx! { ErrorPanel { message } },
        LoadStatus::Idle | LoadStatus::Loading => rsx! { LoadingPanel {} },
    }
}
