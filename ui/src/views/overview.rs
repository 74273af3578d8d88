use dioxus::prelude::*;

use crate::charts::{ChartKind, StaticChart};
use crate::components::{ChartCard, DataGate, FilterBar, Highlights, RegionGuard};
use crate::core::config::{config, MODES_DATASET};
use crate::data::aggregate::{
    category_rows, distinct_x, group_sum, series_rows, time_series, trade_totals,
};
use crate::data::columns;
use crate::data::row::text;
use crate::export::DownloadPayload;
use crate::state::use_dashboard;

#[component]
pub fn Overview() -> Element {
    let mut selected_mode = use_signal(|| None::<String>);
    let clear_selection = move |_: ()| selected_mode.set(None);

    rsx! {
        section { class: "page page-overview",
            div { class: "page__intro",
                h1 { "Overview" }
                p {
                    "Trade between the United States and Mexico by year, direction and mode of transport. "
                    "Zooming the trend chart also narrows its CSV exports to the years in view."
                }
            }

            FilterBar { on_reset: clear_selection }

            DataGate {
                RegionGuard { title: "Highlights", on_retry: clear_selection,
                    TradeHighlights {}
                }
                div { class: "chart-grid",
                    div { class: "chart-grid__wide",
                        RegionGuard { title: "Trade over time", on_retry: clear_selection,
                            TradeTrend { mode: selected_mode() }
                        }
                    }
                    RegionGuard { title: "Trade by mode", on_retry: clear_selection,
                        ModeBreakdown {
                            selected: selected_mode(),
                            on_select: move |mode: Option<String>| selected_mode.set(mode),
                        }
                    }
                    RegionGuard { title: "Exports and imports", on_retry: clear_selection,
                        DirectionSplit {}
                    }
                }
            }
        }
    }
}

#[component]
fn TradeHighlights() -> Element {
    let store = use_dashboard();
    let rows = store.read().filtered_rows(MODES_DATASET)?;
    rsx! {
        Highlights { totals: trade_totals(&rows, columns::VALUE) }
    }
}

#[component]
fn TradeTrend(mode: Option<String>) -> Element {
    let store = use_dashboard();
    let mut rows = store.read().filtered_rows(MODES_DATASET)?;
    if let Some(mode) = mode.as_deref() {
        rows.retain(|row| text(row, columns::MODE).as_deref() == Some(mode));
    }

    let points = time_series(&rows, columns::YEAR, columns::VALUE, Some(columns::TRADE_TYPE));
    let payload = DownloadPayload::new(config().export_name("trade over time"))
        .summary(series_rows(&points, "Year", Some("Trade Type"), "Value"))
        .detail(rows);
    let subtitle = match mode {
        Some(mode) => format!("{mode} shipments by trade direction"),
        None => "All modes by trade direction".to_string(),
    };
    // zoom needs at least three years on the axis
    let hint = if distinct_x(&points) >= 3 {
        "Scroll to zoom, drag to pan".to_string()
    } else {
        String::new()
    };

    rsx! {
        ChartCard {
            title: "Trade over time",
            subtitle,
            hint,
            chart: ChartKind::Line {
                points,
                axis_key: columns::YEAR.to_string(),
            },
            payload,
        }
    }
}

#[component]
fn ModeBreakdown(selected: Option<String>, on_select: EventHandler<Option<String>>) -> Element {
    let store = use_dashboard();
    let rows = store.read().filtered_rows(MODES_DATASET)?;
    let values = group_sum(&rows, columns::MODE, columns::VALUE);
    let payload = DownloadPayload::new(config().export_name("trade by mode"))
        .summary(category_rows(&values, "Mode", "Value"))
        .detail(rows);

    rsx! {
        ChartCard {
            title: "Trade by mode",
            subtitle: "Click a mode to focus the trend",
            chart: ChartKind::Static(StaticChart::Bar(values)),
            payload,
            selected,
            on_select,
        }
    }
}

#[component]
fn DirectionSplit() -> Element {
    let store = use_dashboard();
    let rows = store.read().filtered_rows(MODES_DATASET)?;
    let values = group_sum(&rows, columns::TRADE_TYPE, columns::VALUE);
    let payload = DownloadPayload::new(config().export_name("exports and imports"))
        .summary(category_rows(&values, "Trade Type", "Value"))
        .detail(rows);

    rsx! {
        ChartCard {
            title: "Exports and imports",
            subtitle: "Share of total trade",
            chart: ChartKind::Static(StaticChart::Donut(values)),
            payload,
        }
    }
}
