//! The card every chart sits in: title, export menu and fullscreen overlay.

use dioxus::prelude::*;

use crate::charts::{ChartKind, VisibleRange};
use crate::components::chart_view::{ChartView, SnapshotSlot};
use crate::components::export_controls::{run_export, ExportFeedback};
use crate::core::format::ValueFormat;
use crate::core::platform;
use crate::export::csv::export_csv;
use crate::export::png::{export_png, PngHeader};
use crate::export::{DownloadPayload, ExportStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CsvPart {
    Summary,
    Detail,
}

impl CsvPart {
    fn stem(self, base: &str) -> String {
        match self {
            CsvPart::Summary => base.to_string(),
            CsvPart::Detail => format!("{base}-detail"),
        }
    }
}

#[component]
pub fn ChartCard(
    title: String,
    #[props(default)] subtitle: String,
    #[props(default)] hint: String,
    chart: ChartKind,
    payload: DownloadPayload,
    #[props(default)] format: ValueFormat,
    selected: Option<String>,
    on_select: Option<EventHandler<Option<String>>>,
) -> Element {
    // the range is tagged with the data it was measured against, so new data
    // starts unzoomed without an extra effect
    let mut range = use_signal(|| None::<(u64, VisibleRange)>);
    let mut fullscreen = use_signal(|| false);
    let mut epoch = use_signal(|| 0_u32);
    let snapshot = use_hook(SnapshotSlot::default);
    let status = use_signal(ExportStatus::default);
    let busy = use_signal(|| false);
    let mut locked = use_signal(|| false);

    let fingerprint = chart.fingerprint();
    let current_range: Option<VisibleRange> = range()
        .filter(|(tag, _)| *tag == fingerprint)
        .map(|(_, visible)| visible);

    use_effect(move || {
        let open = fullscreen();
        if open != *locked.peek() {
            platform::set_page_scroll_locked(open);
            locked.set(open);
        }
    });
    use_drop(move || {
        if *locked.peek() {
            platform::set_page_scroll_locked(false);
        }
    });

    let mut toggle_fullscreen = move |open: bool| {
        range.set(None);
        epoch += 1;
        fullscreen.set(open);
    };

    let csv_handler = {
        let payload = payload.clone();
        let current_range = current_range.clone();
        move |part: CsvPart| {
            let scoped = payload.scoped(current_range.as_ref());
            let rows = match part {
                CsvPart::Summary => scoped.summary_rows,
                CsvPart::Detail => scoped.detail_rows,
            };
            let stem = part.stem(&scoped.filename);
            run_export(status, busy, "Preparing CSV", "CSV", async move {
                export_csv(&rows, &stem).await
            });
        }
    };
    let summary_csv = {
        let handler = csv_handler.clone();
        move |_| handler(CsvPart::Summary)
    };
    let detail_csv = {
        let handler = csv_handler;
        move |_| handler(CsvPart::Detail)
    };

    let png_handler = {
        let snapshot = snapshot.clone();
        let header = PngHeader::new(title.clone(), Some(subtitle.clone()));
        let stem = payload.filename.clone();
        move |_| {
            let doc = snapshot.get();
            let header = header.clone();
            let stem = stem.clone();
            run_export(status, busy, "Preparing PNG", "PNG", async move {
                Ok(export_png(doc, Some(header), &stem).await)
            });
        }
    };

    let range_note = current_range
        .as_ref()
        .map(|visible| format!("Showing {:.0}–{:.0}", visible.min, visible.max));
    let has_summary = !payload.summary_rows.is_empty();
    let has_detail = !payload.detail_rows.is_empty();
    let view_key = format!("{fingerprint}-{}", epoch());
    let is_fullscreen = fullscreen();

    let body = if chart.is_empty() {
        rsx! { p { class: "chart-card__placeholder", "No data for the current filters." } }
    } else {
        rsx! {
            ChartView {
                key: "{view_key}",
                chart: chart.clone(),
                format,
                snapshot: snapshot.clone(),
                selected: selected.clone(),
                on_select,
                on_range: move |visible: Option<VisibleRange>| {
                    range.set(visible.map(|visible| (fingerprint, visible)));
                },
            }
        }
    };

    let inline_body = body.clone();

    rsx! {
        section { class: "chart-card",
            header { class: "chart-card__header",
                div { class: "chart-card__titles",
                    h2 { "{title}" }
                    if !subtitle.is_empty() {
                        p { class: "chart-card__subtitle", "{subtitle}" }
                    }
                }
                div { class: "chart-card__actions",
                    details { class: "chart-card__menu",
                        summary { class: "button button--ghost", "CSV" }
                        div { class: "chart-card__menu-items",
                            button {
                                r#type: "button",
                                class: "button",
                                disabled: busy() || !has_summary,
                                onclick: summary_csv,
                                "Chart data"
                            }
                            button {
                                r#type: "button",
                                class: "button",
                                disabled: busy() || !has_detail,
                                onclick: detail_csv,
                                "Source rows"
                            }
                        }
                    }
                    button {
                        r#type: "button",
                        class: "button button--ghost",
                        disabled: busy() || chart.is_empty(),
                        onclick: png_handler,
                        "PNG"
                    }
                    button {
                        r#type: "button",
                        class: "button button--ghost",
                        aria_label: "Open fullscreen",
                        onclick: move |_| toggle_fullscreen(true),
                        "⤢"
                    }
                }
            }
            if let Some(note) = range_note.as_ref() {
                p { class: "chart-card__range", "{note}" }
            } else if !hint.is_empty() {
                p { class: "chart-card__hint", "{hint}" }
            }
            if is_fullscreen {
                p { class: "chart-card__placeholder", "Open in fullscreen." }
            } else {
                div { class: "chart-card__body", {inline_body} }
            }
            ExportFeedback { status: status() }
        }

        if is_fullscreen {
            div {
                class: "chart-overlay",
                role: "dialog",
                aria_modal: "true",
                tabindex: "-1",
                onmounted: move |evt| async move {
                    let _ = evt.data().set_focus(true).await;
                },
                onkeydown: move |evt: KeyboardEvent| {
                    if evt.key() == Key::Escape {
                        evt.prevent_default();
                        toggle_fullscreen(false);
                    }
                },
                div { class: "chart-overlay__panel",
                    header { class: "chart-card__header",
                        div { class: "chart-card__titles",
                            h2 { "{title}" }
                            if !subtitle.is_empty() {
                                p { class: "chart-card__subtitle", "{subtitle}" }
                            }
                        }
                        button {
                            r#type: "button",
                            class: "button button--ghost",
                            aria_label: "Close fullscreen",
                            onclick: move |_| toggle_fullscreen(false),
                            "✕"
                        }
                    }
                    if let Some(note) = range_note.as_ref() {
                        p { class: "chart-card__range", "{note}" }
                    }
                    div { class: "chart-overlay__body", {body} }
                }
            }
        }
    }
}
