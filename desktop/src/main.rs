#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

#[cfg(feature = "desktop")]
use std::path::PathBuf;

#[cfg(feature = "desktop")]
use dioxus::desktop::{tao::window::WindowBuilder, Config};
use tracing::Level;
use dioxus::prelude::*;

use ui::charts::theme::chart_stylesheet;
use ui::components::app_navbar::{register_nav, NavBuilder};
use ui::components::AppNavbar;
use ui::core::config::config;
use ui::use_dashboard_provider;
use ui::views::{Breakdown, DataExplorer, Overview};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(DesktopNavbar)]
    #[route("/")]
    Overview {},
    #[route("/breakdown")]
    Breakdown {},
    #[route("/data")]
    DataExplorer {},
}

const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
)); // Embedded shared theme (ui/assets/theme/main.css); no separate desktop /assets needed.

#[cfg(feature = "desktop")]
fn main() {
    if let Err(err) = dioxus::logger::init(Level::INFO) {
        eprintln!("logger already initialised: {err}");
    }
    let resource_dir = resolve_resource_dir();

    LaunchBuilder::desktop()
        .with_cfg(
            Config::new()
                .with_window(
                    WindowBuilder::new()
                        .with_title(format!("{} – v{}", config().title, env!("CARGO_PKG_VERSION")))
                        .with_maximized(true),
                )
                .with_resource_directory(resource_dir),
        )
        .launch(App);
}

#[cfg(all(feature = "server", not(feature = "desktop")))]
fn main() {
    if let Err(err) = dioxus::logger::init(Level::INFO) {
        eprintln!("logger already initialised: {err}");
    }
    LaunchBuilder::server().launch(App);
}

fn nav_overview(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Overview {}, "{label}" })
}
fn nav_breakdown(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Breakdown {}, "{label}" })
}
fn nav_data(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::DataExplorer {}, "{label}" })
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

    // Runtime maximize fallback (in case initial builder maximize is ignored by WM)
    #[cfg(feature = "desktop")]
    {
        let win = dioxus::desktop::use_window();
        use_effect(move || {
            win.set_maximized(true);
        });
    }

    rsx! {
        // Always inline embedded CSS (no external file dependency for desktop builds)
        document::Style { "{MAIN_CSS_INLINE}" }
        document::Style { "{chart_css}" }

        Router::<Route> { }
    }
}

#[cfg(feature = "desktop")]
fn resolve_resource_dir() -> PathBuf {
    #[cfg(debug_assertions)]
    {
        // During `cargo run` / `dx serve` load directly from the crate.
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"))
    }

    #[cfg(not(debug_assertions))]
    {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("assets")))
            .unwrap_or_else(|| PathBuf::from("assets"))
    }
}

/// A desktop-specific Router around the shared `AppNavbar` component
/// which allows us to use the desktop-specific `Route` enum.
#[component]
fn DesktopNavbar() -> Element {
    rsx! {
        AppNavbar { }
        main { class: "page-shell",
            Outlet::<Route> {}
        }
    }
}
