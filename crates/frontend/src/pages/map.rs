use dioxus::prelude::*;

use school_map_shared::filter::{apply_filters, used_course_options, FilterState};
use school_map_shared::models::School;

use crate::api;
use crate::components::course_select::CourseSelect;
use crate::components::filter_buttons::FilterButtons;
use crate::components::map_view::{self, MapView};
use crate::components::search_box::SearchBox;
use crate::components::zone_select::ZoneSelect;

#[component]
pub fn SchoolMap() -> Element {
    // Loaded-once collections. A failed school batch is logged and resolves
    // to None — the map stays up without markers. The zone layers load
    // independently; their failure only blanks the polygons / zone dropdown.
    let data_resource = use_resource(|| async {
        match api::load_school_data().await {
            Ok(data) => Some(data),
            Err(err) => {
                tracing::error!(%err, "school data load failed");
                None
            }
        }
    });
    let zones_resource = use_resource(|| async {
        match api::fetch_zones().await {
            Ok(zones) => zones,
            Err(err) => {
                tracing::error!(%err, "zone list load failed");
                Vec::new()
            }
        }
    });
    let boundaries_resource = use_resource(|| async {
        match api::fetch_zone_boundaries().await {
            Ok(boundaries) => boundaries,
            Err(err) => {
                tracing::error!(%err, "zone boundary load failed");
                Vec::new()
            }
        }
    });

    // The only mutable filter state; written exclusively by the UI handlers
    // below, one event at a time.
    let filters = use_signal(FilterState::default);
    let selected_school = use_signal(|| None::<School>);

    let schools = use_memo(move || {
        data_resource
            .read()
            .clone()
            .flatten()
            .map(|data| data.schools)
            .unwrap_or_default()
    });
    let course_names = use_memo(move || {
        data_resource
            .read()
            .clone()
            .flatten()
            .map(|data| data.course_names)
            .unwrap_or_default()
    });
    let zones = use_memo(move || zones_resource.read().clone().unwrap_or_default());
    let boundaries = use_memo(move || boundaries_resource.read().clone().unwrap_or_default());

    // Recomputed whenever any filter changes; the map draws exactly this set.
    let visible = use_memo(move || apply_filters(&schools.read(), &filters.read()));

    let course_options =
        use_memo(move || used_course_options(&schools.read(), &course_names.read()));
    let district_colors =
        use_memo(move || map_view::district_color_table(&zones.read(), &boundaries.read()));

    let total = schools.read().len();
    let shown = visible.read().len();

    rsx! {
        div { class: "app",
            div { class: "header",
                h1 { "Vocational School Map" }
                FilterButtons { filters }
            }

            div { class: "sidebar",
                div { class: "panel",
                    h3 { "Search" }
                    SearchBox { filters }
                }

                CourseSelect { options: course_options, filters }

                ZoneSelect { zones, filters }

                div { class: "panel result-count",
                    "{shown} of {total} schools"
                }
            }

            MapView {
                schools: visible,
                boundaries,
                district_colors,
                course_names,
                selected_school,
            }
        }
    }
}
