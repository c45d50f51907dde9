use dioxus::prelude::*;

use school_map_shared::filter::FilterState;
use school_map_shared::models::Zone;

/// Sentinel zone identifier meaning "all zones".
pub const ALL_ZONES: &str = "0";

#[component]
pub fn ZoneSelect(zones: ReadSignal<Vec<Zone>>, filters: Signal<FilterState>) -> Element {
    let mut filters = filters;
    let selected = filters.read().selected_zone.clone();
    let zones = zones.read().clone();

    rsx! {
        div { class: "panel",
            h3 { "Zone" }
            select {
                "aria-label": "Select zone",
                onchange: move |evt: Event<FormData>| {
                    let value = evt.value();
                    filters.write().selected_zone = (value != ALL_ZONES).then_some(value);
                },
                option { value: ALL_ZONES, selected: selected.is_none(), "All Zones" }
                for zone in zones {
                    option {
                        value: "{zone.id}",
                        selected: selected.as_deref() == Some(zone.id.as_str()),
                        "{zone.name}"
                    }
                }
            }
        }
    }
}
