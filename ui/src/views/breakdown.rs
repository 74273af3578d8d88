use dioxus::prelude::*;

use crate::charts::{ChartKind, StaticChart};
use crate::components::{ChartCard, DataGate, FilterBar, RegionGuard};
use crate::core::config::{config, COMMODITIES_DATASET, STATES_DATASET};
use crate::data::aggregate::{
    category_rows, group_sum, pivot, pivot_rows, pivot_top_n, top_n_with_other,
};
use crate::data::columns;
use crate::data::row::text;
use crate::data::FilterKey;
use crate::export::DownloadPayload;
use crate::state::use_dashboard;

const TOP_GROUPS: usize = 10;
const TOP_STATES: usize = 8;
const TOP_PORTS: usize = 10;

#[component]
pub fn Breakdown() -> Element {
    let mut selected_group = use_signal(|| None::<String>);
    let clear_selection = move |_: ()| selected_group.set(None);

    rsx! {
        section { class: "page page-breakdown",
            div { class: "page__intro",
                h1 { "Breakdown" }
                p { "Where the trade goes: commodity groups, border states and ports of entry." }
            }

            FilterBar {
                keys: vec![FilterKey::Year, FilterKey::TradeType, FilterKey::State, FilterKey::Port],
                on_reset: clear_selection,
            }

            DataGate {
                div { class: "chart-grid",
                    div { class: "chart-grid__wide",
                        RegionGuard { title: "Commodity groups", on_retry: clear_selection,
                            CommodityTreemap {
                                selected: selected_group(),
                                on_select: move |group: Option<String>| selected_group.set(group),
                            }
                        }
                    }
                    RegionGuard { title: "Border states", on_retry: clear_selection,
                        StateStack {}
                    }
                    RegionGuard { title: "Ports of entry", on_retry: clear_selection,
                        PortRanking { group: selected_group() }
                    }
                }
            }
        }
    }
}

#[component]
fn CommodityTreemap(selected: Option<String>, on_select: EventHandler<Option<String>>) -> Element {
    let store = use_dashboard();
    let rows = store.read().filtered_rows(COMMODITIES_DATASET)?;
    let values = top_n_with_other(
        group_sum(&rows, columns::COMMODITY_GROUP, columns::VALUE),
        TOP_GROUPS,
    );
    let payload = DownloadPayload::new(config().export_name("commodity groups"))
        .summary(category_rows(&values, "Commodity Group", "Value"))
        .detail(rows);

    rsx! {
        ChartCard {
            title: "Commodity groups",
            subtitle: "Click a group to see its ports",
            chart: ChartKind::Static(StaticChart::Treemap(values)),
            payload,
            selected,
            on_select,
        }
    }
}

#[component]
fn StateStack() -> Element {
    let store = use_dashboard();
    let rows = store.read().filtered_rows(STATES_DATASET)?;
    let table = pivot_top_n(
        pivot(&rows, columns::STATE, columns::TRADE_TYPE, columns::VALUE),
        TOP_STATES,
    );
    let payload = DownloadPayload::new(config().export_name("border states"))
        .summary(pivot_rows(&table, "State"))
        .detail(rows);

    rsx! {
        ChartCard {
            title: "Border states",
            subtitle: "Exports and imports by U.S. state",
            chart: ChartKind::Static(StaticChart::StackedBar(table)),
            payload,
        }
    }
}

#[component]
fn PortRanking(group: Option<String>) -> Element {
    let store = use_dashboard();
    let mut rows = store.read().filtered_rows(COMMODITIES_DATASET)?;
    if let Some(group) = group.as_deref() {
        rows.retain(|row| text(row, columns::COMMODITY_GROUP).as_deref() == Some(group));
    }
    let values = top_n_with_other(group_sum(&rows, columns::PORT, columns::VALUE), TOP_PORTS);
    let payload = DownloadPayload::new(config().export_name("ports of entry"))
        .summary(category_rows(&values, "Port", "Value"))
        .detail(rows);
    let subtitle = match group {
        Some(group) => format!("Top ports for {group}"),
        None => "Top ports across all commodities".to_string(),
    };

    rsx! {
        ChartCard {
            title: "Ports of entry",
            subtitle,
            chart: ChartKind::Static(StaticChart::Bar(values)),
            payload,
        }
    }
}
