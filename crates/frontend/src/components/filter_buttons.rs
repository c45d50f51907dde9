use dioxus::prelude::*;

use school_map_shared::filter::FilterState;

/// Toggle buttons, one per filter code. The leading character of a code
/// routes it to its dimension: G → gender, T → track, P → ownership.
const FILTER_BUTTONS: &[(&str, &str)] = &[
    ("G1", "Girls"),
    ("G2", "Boys"),
    ("T1", "Technical"),
    ("T2", "Vocational"),
    ("P1", "Public"),
    ("P2", "Private"),
];

#[component]
pub fn FilterButtons(filters: Signal<FilterState>) -> Element {
    let mut filters = filters;

    rsx! {
        div { class: "filter-buttons",
            for &(code, label) in FILTER_BUTTONS {
                button {
                    class: if filters.read().is_code_active(code) { "filter-btn active" } else { "filter-btn" },
                    onclick: move |_| {
                        filters.write().toggle_code(code);
                    },
                    "{label}"
                }
            }
        }
    }
}
