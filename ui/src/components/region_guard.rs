use dioxus::prelude::*;

use crate::state::use_dashboard;

/// Isolates one page region: an error raised while rendering `children` is
/// shown in place with a "Try again" action instead of taking the page down.
///
/// Retrying resets the dashboard filters, calls `on_retry` (pages clear their
/// chart selection there), then re-renders the region.
#[component]
pub fn RegionGuard(
    #[props(into)] title: String,
    on_retry: Option<EventHandler<()>>,
    children: Element,
) -> Element {
    let mut store = use_dashboard();

    rsx! {
        ErrorBoundary {
            handle_error: move |errors: ErrorContext| {
                let detail = errors
                    .errors()
                    .first()
                    .map(|err| err.to_string())
                    .unwrap_or_else(|| "Unknown error".to_string());
                tracing::warn!(region = %title, %detail, "region failed to render");
                let title = title.clone();
                rsx! {
                    div { class: "region-error", role: "alert",
                        strong { class: "region-error__title", "{title} couldn't be shown" }
                        p { class: "region-error__detail", "{detail}" }
                        button {
                            r#type: "button",
                            class: "button button--primary",
                            onclick: move |_| {
                                store.write().reset_filters();
                                if let Some(handler) = on_retry.as_ref() {
                                    handler.call(());
                                }
                                errors.clear_errors();
                            },
                            "Try again"
                        }
                    }
                }
            },
            {children}
        }
    }
}
