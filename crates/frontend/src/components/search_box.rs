use dioxus::prelude::*;

use school_map_shared::filter::FilterState;

/// Free-text search over school name, course list, and address. Fires on
/// every keystroke.
#[component]
pub fn SearchBox(filters: Signal<FilterState>) -> Element {
    let mut filters = filters;
    let current = filters.read().search_text.clone();

    rsx! {
        input {
            r#type: "text",
            class: "search-input",
            "aria-label": "Search schools",
            placeholder: "Name, course or address...",
            value: "{current}",
            oninput: move |evt: Event<FormData>| {
                filters.write().search_text = evt.value().to_string();
            },
        }
    }
}
