use dioxus::prelude::*;

use crate::data::FilterKey;
use crate::state::use_dashboard;

/// One dropdown per filter dimension present in the loaded data, plus reset.
#[component]
pub fn FilterBar(
    #[props(default = FilterKey::ALL.to_vec())]
    keys: Vec<FilterKey>,
    on_reset: Option<EventHandler<()>>,
) -> Element {
    let mut store = use_dashboard();

    let controls: Vec<(FilterKey, &'static str, Vec<String>, String)> = {
        let store = store.read();
        keys.iter()
            .map(|&key| {
                let current = store.filters().get(key).unwrap_or_default().to_string();
                (key, key.label(), store.filter_options(key), current)
            })
            .filter(|(_, _, options, _)| !options.is_empty())
            .collect()
    };
    let any_active = !store.read().filters().is_empty();

    rsx! {
        div { class: "filter-bar",
            for (key, name, options, current) in controls.into_iter() {
                label { key: "{key:?}", class: "filter-bar__field",
                    span { class: "filter-bar__label", "{name}" }
                    select {
                        class: "filter-bar__select",
                        value: "{current}",
                        onchange: move |evt: FormEvent| {
                            store.write().set_filter(key, evt.value());
                        },
                        option { value: "", selected: current.is_empty(), "All" }
                        for value in options.into_iter() {
                            option {
                                key: "{value}",
                                value: "{value}",
                                selected: value == current,
                                "{value}"
                            }
                        }
                    }
                }
            }
            button {
                r#type: "button",
                class: "button button--ghost filter-bar__reset",
                disabled: !any_active,
                onclick: move |_| {
                    store.write().reset_filters();
                    if let Some(handler) = on_reset.as_ref() {
                        handler.call(());
                    }
                },
                "Reset filters"
            }
        }
    }
}
