use tracing::Level;
use dioxus::prelude::*;

use ui::charts::theme::chart_stylesheet;
use ui::components::app_navbar::{register_nav, NavBuilder};
use ui::components::AppNavbar;
use ui::use_dashboard_provider;
use ui::views::{Breakdown, DataExplorer, Overview};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(WebNavbar)]
    #[route("/")]
    Overview {},
    #[route("/breakdown")]
    Breakdown {},
    #[route("/data")]
    DataExplorer {},
}

// Shared theme, inlined so the web build needs no copy of its own.
const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

fn nav_overview(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Overview {},
        "{label}"
    })
}
fn nav_breakdown(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Breakdown {},
        "{label}"
    })
}
fn nav_data(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::DataExplorer {},
        "{label}"
    })
}

fn main() {
    if let Err(err) = dioxus::logger::init(Level::INFO) {
        eprintln!("logger already initialised: {err}");
    }
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    register_nav(NavBuilder {
        overview: nav_overview,
        breakdown: nav_breakdown,
        data: nav_data,
    });
    use_dashboard_provider();
    use_hook(|| tracing::info!(version = env!("CARGO_PKG_VERSION"), "dashboard started"));
    let chart_css = use_hook(|| chart_stylesheet().to_css(".chart-surface"));

    rsx! {
        document::Title { "{ui::core::config::config().title}" }
        document::Style { "{MAIN_CSS_INLINE}" }
        document::Style { "{chart_css}" }

        Router::<Route> {}
    }
}

/// A web-specific Router around the shared `AppNavbar` component
/// which allows us to use the web-specific `Route` enum.
#[component]
fn WebNavbar() -> Element {
    rsx! {
        AppNavbar { }
        main { class: "page-shell",
            Outlet::<Route> {}
        }
    }
}
