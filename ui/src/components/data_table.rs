use dioxus::prelude::*;

use crate::components::export_controls::{run_export, ExportFeedback};
use crate::core::config::config;
use crate::core::format::format_currency;
use crate::data::columns;
use crate::data::row::Cell;
use crate::export::csv::export_csv;
use crate::export::ExportStatus;
use crate::state::use_dashboard;

/// Half-open row range shown on `page` (zero-based), plus the page count.
/// Out-of-range pages clamp to the last page.
pub fn page_bounds(total: usize, page: usize, size: usize) -> (usize, usize, usize) {
    let size = size.max(1);
    let pages = total.div_ceil(size).max(1);
    let page = page.min(pages - 1);
    let start = (page * size).min(total);
    let end = (start + size).min(total);
    (start, end, pages)
}

/// `trade_type` → `Trade Type`.
pub fn display_header(column: &str) -> String {
    column
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn display_cell(column: &str, cell: &Cell) -> String {
    match cell {
        Cell::Number(value) if column == columns::VALUE => format_currency(*value),
        Cell::Number(value) if column == columns::YEAR => format!("{value:.0}"),
        other => other.to_string(),
    }
}

/// Paginated view of one dataset's filtered rows.
#[component]
pub fn DataTable(dataset_id: String) -> Element {
    let store = use_dashboard();
    let mut page = use_signal(|| 0_usize);
    let status = use_signal(ExportStatus::default);
    let busy = use_signal(|| false);
    let page_size = config().table_page_size;

    let (label, headers, rows) = {
        let store = store.read();
        let dataset = store.dataset(&dataset_id)?;
        (
            dataset.label.clone(),
            dataset.columns.clone(),
            store.filtered_rows(&dataset_id)?,
        )
    };

    let (start, end, pages) = page_bounds(rows.len(), page(), page_size);
    let current = page().min(pages - 1);
    let visible: Vec<Vec<String>> = rows[start..end]
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|column| {
                    row.get(column)
                        .map(|cell| display_cell(column, cell))
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();
    let total_rows = rows.len();
    let (page_label, first_row) = (current + 1, start + 1);

    let export_handler = {
        let stem = config().export_name(&label);
        move |_| {
            let rows = rows.clone();
            let stem = stem.clone();
            run_export(status, busy, "Preparing CSV", "CSV", async move {
                export_csv(&rows, &stem).await
            });
        }
    };

    rsx! {
        section { class: "data-table",
            header { class: "data-table__header",
                div {
                    h2 { "{label}" }
                    span { class: "data-table__meta", "{total_rows} rows match the current filters" }
                }
                button {
                    r#type: "button",
                    class: "button button--primary",
                    disabled: busy() || total_rows == 0,
                    onclick: export_handler,
                    "Download CSV"
                }
            }

            if total_rows == 0 {
                p { class: "data-table__placeholder", "No rows match the current filters." }
            } else {
                div { class: "data-table__scroll",
                    table {
                        thead {
                            tr {
                                for column in headers.iter() {
                                    th { key: "{column}", scope: "col", {display_header(column)} }
                                }
                            }
                        }
                        tbody {
                            for (row_key, cells) in (start..end).zip(visible) {
                                tr { key: "{row_key}",
                                    for cell in cells.into_iter() {
                                        td { "{cell}" }
                                    }
                                }
                            }
                        }
                    }
                }
                nav { class: "data-table__pager",
                    button {
                        r#type: "button",
                        class: "button button--ghost",
                        disabled: current == 0,
                        onclick: move |_| page.set(current.saturating_sub(1)),
                        "Previous"
                    }
                    span { class: "data-table__page", "Page {page_label} of {pages} · rows {first_row}–{end}" }
                    button {
                        r#type: "button",
                        class: "button button--ghost",
                        disabled: current + 1 >= pages,
                        onclick: move |_| page.set(current + 1),
                        "Next"
                    }
                }
            }
            ExportFeedback { status: status() }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_clamp_to_the_data() {
        assert_eq!(page_bounds(60, 0, 25), (0, 25, 3));
        assert_eq!(page_bounds(60, 2, 25), (50, 60, 3));
        assert_eq!(page_bounds(60, 9, 25), (50, 60, 3));
        assert_eq!(page_bounds(0, 0, 25), (0, 0, 1));
        assert_eq!(page_bounds(5, 0, 0), (0, 1, 5));
    }

    #[test]
    fn headers_are_title_cased() {
        assert_eq!(display_header("trade_type"), "Trade Type");
        assert_eq!(display_header("year"), "Year");
    }
}
