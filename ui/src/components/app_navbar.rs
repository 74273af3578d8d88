use dioxus::prelude::*;
use once_cell::sync::OnceCell;

use crate::core::config::config;

const NAVBAR_CSS: Asset = asset!("/assets/styling/navbar.css");
const NAVBAR_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/styling/navbar.css"
));

/// Router links supplied by a launcher, so `ui` never needs the platform's
/// `Route` enum.
///
/// Each function receives the link label and returns a `Link` that already
/// contains it:
///
/// ```ignore
/// register_nav(NavBuilder {
///     overview: |label| rsx!(Link { class: "navbar__link", to: Route::Overview {}, "{label}" }),
///     breakdown: |label| rsx!(Link { class: "navbar__link", to: Route::Breakdown {}, "{label}" }),
///     data: |label| rsx!(Link { class: "navbar__link", to: Route::Data {}, "{label}" }),
/// });
/// ```
pub struct NavBuilder {
    pub overview: fn(label: &str) -> Element,
    pub breakdown: fn(label: &str) -> Element,
    pub data: fn(label: &str) -> Element,
}

static NAV_BUILDER: OnceCell<NavBuilder> = OnceCell::new();

/// Installs the launcher's links. Later calls are ignored.
pub fn register_nav(builder: NavBuilder) {
    let _ = NAV_BUILDER.set(builder);
}

#[component]
pub fn AppNavbar(children: Element) -> Element {
    let brand = config();

    let links = NAV_BUILDER.get().map(|builder| {
        let overview = (builder.overview)("Overview");
        let breakdown = (builder.breakdown)("Breakdown");
        let data = (builder.data)("Data");
        rsx! {
            nav { class: "navbar__links",
                {overview}
                {breakdown}
                {data}
            }
        }
    });

    rsx! {
        document::Link { rel: "stylesheet", href: NAVBAR_CSS }
        if cfg!(all(not(debug_assertions), not(target_arch = "wasm32"))) {
            document::Style { "{NAVBAR_CSS_INLINE}" }
        }

        header { id: "navbar", class: "navbar",
            div { class: "navbar__inner",
                div { class: "navbar__brand",
                    span { class: "navbar__brand-link",
                        span { class: "navbar__brand-spark", aria_hidden: "true" }
                        span { class: "navbar__brand-mark", "{brand.title}" }
                    }
                    span { class: "navbar__brand-subtitle", "{brand.tagline}" }
                }

                if let Some(links) = links {
                    {links}
                } else {
                    nav { class: "navbar__links", {children} }
                }
            }
        }
    }
}
