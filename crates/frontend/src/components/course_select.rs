use dioxus::prelude::*;

use school_map_shared::filter::FilterState;
use school_map_shared::models::Course;

/// Sentinel option value meaning "no course constraint".
pub const ALL_COURSES: &str = "all";

#[component]
pub fn CourseSelect(options: ReadSignal<Vec<Course>>, filters: Signal<FilterState>) -> Element {
    let mut filters = filters;
    let selected = filters.read().selected_course.clone();
    let options = options.read().clone();

    rsx! {
        div { class: "panel",
            h3 { "Course" }
            select {
                "aria-label": "Select course",
                onchange: move |evt: Event<FormData>| {
                    let value = evt.value();
                    filters.write().selected_course = (value != ALL_COURSES).then_some(value);
                },
                option { value: ALL_COURSES, selected: selected.is_none(), "All Courses" }
                for course in options {
                    option {
                        value: "{course.code}",
                        selected: selected.as_deref() == Some(course.code.as_str()),
                        "{course.name}"
                    }
                }
            }
        }
    }
}
