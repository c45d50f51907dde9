use std::collections::HashMap;

use dioxus::prelude::*;

use school_map_shared::models::School;

/// Separator when joining translated course names. The data set is Persian,
/// so the Persian enumeration comma is the natural joiner.
pub const COURSE_JOINER: &str = "، ";

/// "Technical - Girls - Public" style classification line; blank fields are
/// dropped rather than rendered as dangling separators.
pub fn classification_line(school: &School) -> String {
    [
        school.technical_or_vocational.as_str(),
        school.gender_specific.as_str(),
        school.public_or_private.as_str(),
    ]
    .iter()
    .map(|part| part.trim())
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" - ")
}

/// The school's course codes translated through the dictionary. Codes the
/// dictionary doesn't know keep the raw code.
pub fn course_line(school: &School, names: &HashMap<String, String>) -> String {
    school
        .course_codes()
        .iter()
        .map(|code| names.get(code).cloned().unwrap_or_else(|| code.clone()))
        .collect::<Vec<_>>()
        .join(COURSE_JOINER)
}

/// Detail popup for the selected marker, pinned at its on-screen position.
#[component]
pub fn SchoolPopup(
    school: School,
    course_names: HashMap<String, String>,
    x: f64,
    y: f64,
    on_close: EventHandler<()>,
) -> Element {
    let classification = classification_line(&school);
    let courses = course_line(&school, &course_names);

    rsx! {
        div { class: "school-popup", style: "left: {x}px; top: {y}px;",
            button {
                class: "popup-close",
                "aria-label": "Close popup",
                onclick: move |_| on_close.call(()),
                "×"
            }
            b { "{school.school_name}" }
            if !classification.is_empty() {
                div { "{classification}" }
            }
            if !school.district_name.is_empty() {
                div { "{school.district_name}" }
            }
            if !courses.is_empty() {
                div { class: "popup-courses", "{courses}" }
            }
            if !school.address.is_empty() {
                div { "{school.address}" }
            }
            if !school.phone.is_empty() {
                div { class: "popup-phone", "{school.phone}" }
            }
        }
    }
}
