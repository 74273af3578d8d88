use dioxus::prelude::*;

use crate::core::format::{format_currency, format_percent};
use crate::data::aggregate::TradeTotals;

/// KPI strip above the overview charts.
#[component]
pub fn Highlights(totals: TradeTotals) -> Element {
    let export_share = if totals.total() > 0.0 {
        format_percent(totals.exports / totals.total())
    } else {
        "—".to_string()
    };
    let balance_class = if totals.balance() >= 0.0 {
        "highlight__value highlight__value--positive"
    } else {
        "highlight__value highlight__value--negative"
    };

    rsx! {
        div { class: "highlights",
            div { class: "highlight",
                span { class: "highlight__label", "Total trade" }
                span { class: "highlight__value", {format_currency(totals.total())} }
            }
            div { class: "highlight",
                span { class: "highlight__label", "U.S. exports" }
                span { class: "highlight__value", {format_currency(totals.exports)} }
                span { class: "highlight__meta", "{export_share} of total" }
            }
            div { class: "highlight",
                span { class: "highlight__label", "U.S. imports" }
                span { class: "highlight__value", {format_currency(totals.imports)} }
            }
            div { class: "highlight",
                span { class: "highlight__label", "Trade balance" }
                span { class: "{balance_class}", {format_currency(totals.balance())} }
            }
        }
    }
}
