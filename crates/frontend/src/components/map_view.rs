use std::collections::HashMap;

use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;

use school_map_shared::geo;
use school_map_shared::models::{School, Zone, ZoneBoundary};

use crate::components::school_popup::SchoolPopup;
use crate::coords;

const MAP_CONTAINER_ID: &str = "school-map-container";

/// Drag threshold in pixels — movement below this is treated as a click.
const DRAG_THRESHOLD: f64 = 3.0;

const ZOOM_MIN: f64 = 1.0;
const ZOOM_MAX: f64 = 12.0;
const ZOOM_STEP: f64 = 1.1;

/// Distance threshold (map-image pixels, before zoom) for marker selection.
const SELECT_THRESHOLD: f64 = 40.0;

/// Reference container width (desktop map panel) used to normalize marker
/// sizes across screen widths.
const REFERENCE_WIDTH: f64 = 960.0;

// --- gender-track marker colors ---

const GIRLS_CODE: &str = "G1";
const GIRLS_FILL: &str = "#c2559d";
const BOYS_FILL: &str = "#3e7fc1";

/// Accent stroke for schools in districts without a boundary color.
const DEFAULT_ACCENT: &str = "white";

fn gender_fill(code: &str) -> &'static str {
    if code == GIRLS_CODE {
        GIRLS_FILL
    } else {
        BOYS_FILL
    }
}

/// A school marker resolved to image-pixel space. `school_idx` points back
/// into the visible school list the marker was built from.
#[derive(Debug, Clone, PartialEq)]
struct Marker {
    school_idx: usize,
    x: f64,
    y: f64,
    fill: &'static str,
    accent: String,
    title: String,
}

/// Resolve the visible schools to drawable markers. Schools without a usable
/// coordinate contribute nothing. The marker fill follows the gender track;
/// the accent stroke follows the school's district color, so each district
/// gets its own pair of icon variants.
fn resolve_markers(schools: &[School], district_colors: &HashMap<String, String>) -> Vec<Marker> {
    schools
        .iter()
        .enumerate()
        .filter_map(|(school_idx, school)| {
            let (x, y) = coords::school_marker_px(school)?;
            Some(Marker {
                school_idx,
                x,
                y,
                fill: gender_fill(&school.gender_specific_code),
                accent: district_colors
                    .get(&school.district)
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_ACCENT.to_string()),
                title: school.school_name.clone(),
            })
        })
        .collect()
}

/// Join the zone list with the boundary file on the zone name to get a
/// district-id → color table for marker accents.
pub fn district_color_table(
    zones: &[Zone],
    boundaries: &[ZoneBoundary],
) -> HashMap<String, String> {
    zones
        .iter()
        .filter_map(|zone| {
            boundaries
                .iter()
                .find(|boundary| boundary.name == zone.name)
                .map(|boundary| (zone.id.clone(), boundary.color.clone()))
        })
        .collect()
}

/// Index (into the visible school list) of the currently selected school.
fn selected_marker_index(schools: &[School], selected: &Option<School>) -> Option<usize> {
    let selected = selected.as_ref()?;
    schools.iter().position(|school| school == selected)
}

// ---------------------------------------------------------------------------
// DOM helpers
// ---------------------------------------------------------------------------

/// Get the bounding client rect of the map container element.
fn container_rect() -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(MAP_CONTAINER_ID)?;
    Some(element.get_bounding_client_rect())
}

// ---------------------------------------------------------------------------
// Zoom / pan math (pure functions, easily testable)
// ---------------------------------------------------------------------------

/// Compute new pan offsets so that `cursor` stays over the same content point
/// when zooming from `old_zoom` to `new_zoom`.
fn zoom_pan_at_cursor(
    cursor_x: f64,
    cursor_y: f64,
    old_zoom: f64,
    new_zoom: f64,
    old_pan_x: f64,
    old_pan_y: f64,
) -> (f64, f64) {
    let content_x = (cursor_x - old_pan_x) / old_zoom;
    let content_y = (cursor_y - old_pan_y) / old_zoom;
    (
        cursor_x - content_x * new_zoom,
        cursor_y - content_y * new_zoom,
    )
}

/// Clamp pan values so the map can't be dragged off-screen.
///
/// The map image is rendered at `width: 100%` of the container, so its actual
/// rendered height is `container_w * (MAP_HEIGHT_PX / MAP_WIDTH_PX)`, which
/// may exceed the container height.
fn clamp_pan(pan_x: f64, pan_y: f64, zoom: f64, container_w: f64, container_h: f64) -> (f64, f64) {
    let content_w = container_w * zoom;
    let content_h = container_w * (geo::MAP_HEIGHT_PX / geo::MAP_WIDTH_PX) * zoom;
    let min_pan_x = -(content_w - container_w).max(0.0);
    let min_pan_y = -(content_h - container_h).max(0.0);
    (pan_x.clamp(min_pan_x, 0.0), pan_y.clamp(min_pan_y, 0.0))
}

/// Apply `clamp_pan` using the live container dimensions.
fn clamp_pan_to_container(pan_x: f64, pan_y: f64, zoom: f64) -> (f64, f64) {
    match container_rect() {
        Some(rect) => clamp_pan(pan_x, pan_y, zoom, rect.width(), rect.height()),
        None => (pan_x, pan_y),
    }
}

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

/// Find the index of the nearest position within `threshold` (Euclidean distance).
fn find_nearest(positions: &[(f64, f64)], click: (f64, f64), threshold: f64) -> Option<usize> {
    let mut best_idx = None;
    let mut best_dist = threshold;
    for (i, pos) in positions.iter().enumerate() {
        let dx = pos.0 - click.0;
        let dy = pos.1 - click.1;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist < best_dist {
            best_dist = dist;
            best_idx = Some(i);
        }
    }
    best_idx
}

// ---------------------------------------------------------------------------
// SVG builder
// ---------------------------------------------------------------------------

/// Build the full overlay SVG content as a string. The string is rebuilt
/// wholesale from the current inputs on every change — previously drawn
/// markers are gone by construction, never left stale.
fn build_svg_content(
    boundaries: &[ZoneBoundary],
    markers: &[Marker],
    zoom: f64,
    container_width: f64,
    selected_idx: Option<usize>,
) -> String {
    let mut svg = String::with_capacity(8192);

    // Scale factor: keeps markers and strokes a consistent physical size on
    // screen regardless of container width and zoom level.
    let mobile_boost = (REFERENCE_WIDTH / container_width).max(1.0);
    let s = mobile_boost / zoom.min(6.0);

    build_zone_polygons(&mut svg, boundaries, s);
    build_school_markers(&mut svg, markers, s, selected_idx);

    svg
}

fn build_zone_polygons(svg: &mut String, boundaries: &[ZoneBoundary], s: f64) {
    for boundary in boundaries {
        if boundary.coordinates.is_empty() {
            continue;
        }
        let points = boundary
            .coordinates
            .iter()
            .map(|&[lat, lng]| {
                let (x, y) = geo::latlng_to_px(lat, lng);
                format!("{x},{y}")
            })
            .collect::<Vec<_>>()
            .join(" ");
        let sw = 2.0 * s;
        let color = &boundary.color;
        let name = &boundary.name;
        svg.push_str(&format!(
            r##"<g role="img"><title>{name}</title><polygon points="{points}" fill="{color}" fill-opacity="0.1" stroke="{color}" stroke-width="{sw}" stroke-opacity="0.6"/></g>"##
        ));
    }
}

fn build_school_markers(svg: &mut String, markers: &[Marker], s: f64, selected_idx: Option<usize>) {
    for marker in markers {
        let r = 9.0 * s;
        let sw = 2.5 * s;
        let x = marker.x;
        let y = marker.y;
        let fill = marker.fill;
        let accent = &marker.accent;
        let title = &marker.title;
        svg.push_str(&format!(r##"<g role="img"><title>{title}</title>"##));
        svg.push_str(&format!(
            r##"<circle cx="{x}" cy="{y}" r="{r}" fill="{fill}" stroke="{accent}" stroke-width="{sw}"/>"##
        ));
        if selected_idx == Some(marker.school_idx) {
            build_selection_ring(svg, x, y, s);
        }
        svg.push_str("</g>");
    }
}

/// Emit an animated dashed selection ring around a marker.
fn build_selection_ring(svg: &mut String, cx: f64, cy: f64, s: f64) {
    let r = 20.0 * s;
    let sw = 3.0 * s;
    let da1 = 6.0 * s;
    let da2 = 4.0 * s;
    svg.push_str(&format!(
        r##"<circle cx="{cx}" cy="{cy}" r="{r}" fill="none" stroke="white" stroke-width="{sw}" stroke-dasharray="{da1} {da2}" opacity="0.9"><animate attributeName="opacity" values="0.5;1;0.5" dur="1.2s" repeatCount="indefinite"/></circle>"##
    ));
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

#[component]
pub fn MapView(
    schools: ReadSignal<Vec<School>>,
    boundaries: ReadSignal<Vec<ZoneBoundary>>,
    district_colors: ReadSignal<HashMap<String, String>>,
    course_names: ReadSignal<HashMap<String, String>>,
    selected_school: Signal<Option<School>>,
) -> Element {
    let mut selected_school = selected_school;

    // Zoom / pan state
    let mut zoom = use_signal(|| 1.0_f64);
    let mut pan_x = use_signal(|| 0.0_f64);
    let mut pan_y = use_signal(|| 0.0_f64);

    // Drag state
    let mut is_dragging = use_signal(|| false);
    let mut did_drag = use_signal(|| false);
    let mut drag_start_x = use_signal(|| 0.0_f64);
    let mut drag_start_y = use_signal(|| 0.0_f64);
    let mut drag_start_pan_x = use_signal(|| 0.0_f64);
    let mut drag_start_pan_y = use_signal(|| 0.0_f64);

    // Markers for the currently visible subset.
    let markers = use_memo(move || resolve_markers(&schools.read(), &district_colors.read()));

    // Memoize SVG generation — only recomputes when the visible set, zone
    // polygons, zoom, or selection change. Pan is applied as a CSS transform
    // and doesn't trigger rebuilds.
    let svg_html = use_memo(move || {
        let markers = markers.read();
        let boundaries = boundaries.read();
        let cur_zoom = *zoom.read();
        let selected_idx = selected_marker_index(&schools.read(), &selected_school.read());
        let cw = container_rect().map(|r| r.width()).unwrap_or(REFERENCE_WIDTH);

        let content = build_svg_content(&boundaries, &markers, cur_zoom, cw, selected_idx);
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" preserveAspectRatio="none" style="position:absolute;top:0;left:0;width:100%;height:100%;pointer-events:none;">{}</svg>"#,
            geo::MAP_WIDTH_PX,
            geo::MAP_HEIGHT_PX,
            content
        )
    });

    let cur_pan_x = *pan_x.read();
    let cur_pan_y = *pan_y.read();
    let cur_zoom = *zoom.read();
    let dragging = *is_dragging.read();

    let transform_style = format!(
        "transform: translate({cur_pan_x}px, {cur_pan_y}px) scale({cur_zoom}); transform-origin: 0 0;"
    );
    let container_class = if dragging {
        "map-container dragging"
    } else {
        "map-container"
    };

    // Popup for the selected school, pinned at its on-screen marker position
    // (outside the transform so it keeps its size under zoom). A selection
    // that the active filters no longer include shows no popup.
    let popup = selected_school.read().as_ref().and_then(|school| {
        if !schools.read().iter().any(|s| s == school) {
            return None;
        }
        let (img_x, img_y) = coords::school_marker_px(school)?;
        let cw = container_rect().map(|r| r.width()).unwrap_or(REFERENCE_WIDTH);
        let (x, y) = coords::map_px_to_container(img_x, img_y, cw, cur_zoom, cur_pan_x, cur_pan_y);
        Some((school.clone(), x, y))
    });

    rsx! {
        div {
            id: MAP_CONTAINER_ID,
            class: "{container_class}",

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();

                let delta_y = wheel_delta_y(evt.data().delta());
                let factor = if delta_y < 0.0 { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
                let old_z = *zoom.read();
                let new_z = (old_z * factor).clamp(ZOOM_MIN, ZOOM_MAX);
                if (new_z - old_z).abs() < 1e-9 {
                    return;
                }

                let Some(rect) = container_rect() else { return };
                let client = evt.data().client_coordinates();
                let cx = client.x - rect.left();
                let cy = client.y - rect.top();

                let (new_px, new_py) =
                    zoom_pan_at_cursor(cx, cy, old_z, new_z, *pan_x.read(), *pan_y.read());
                let (px, py) = clamp_pan(new_px, new_py, new_z, rect.width(), rect.height());

                zoom.set(new_z);
                pan_x.set(px);
                pan_y.set(py);
            },

            onmousedown: move |evt: Event<MouseData>| {
                // Only track drag/click for left mouse button
                if evt.trigger_button() != Some(MouseButton::Primary) {
                    return;
                }
                let client = evt.client_coordinates();
                is_dragging.set(true);
                did_drag.set(false);
                drag_start_x.set(client.x);
                drag_start_y.set(client.y);
                drag_start_pan_x.set(*pan_x.read());
                drag_start_pan_y.set(*pan_y.read());
            },

            onmousemove: move |evt: Event<MouseData>| {
                if !*is_dragging.read() {
                    return;
                }
                let client = evt.client_coordinates();
                let dx = client.x - *drag_start_x.read();
                let dy = client.y - *drag_start_y.read();

                if !*did_drag.read() && (dx.abs() > DRAG_THRESHOLD || dy.abs() > DRAG_THRESHOLD) {
                    did_drag.set(true);
                }
                if *did_drag.read() {
                    let new_px = *drag_start_pan_x.read() + dx;
                    let new_py = *drag_start_pan_y.read() + dy;
                    let (px, py) = clamp_pan_to_container(new_px, new_py, *zoom.read());
                    pan_x.set(px);
                    pan_y.set(py);
                }
            },

            onmouseup: move |evt: Event<MouseData>| {
                let was_dragging = *is_dragging.read();
                let was_drag = *did_drag.read();
                is_dragging.set(false);

                // A mouseup without drag movement = a click: select the
                // nearest marker, or clear the selection on empty space.
                if was_dragging && !was_drag {
                    let client = evt.client_coordinates();
                    if let Some((img_x, img_y)) = coords::click_to_map_px(
                        client.x, client.y, MAP_CONTAINER_ID,
                        *zoom.read(), *pan_x.read(), *pan_y.read(),
                    ) {
                        let threshold = SELECT_THRESHOLD / (*zoom.read()).min(6.0);
                        let marker_points: Vec<(f64, f64)> =
                            markers.read().iter().map(|m| (m.x, m.y)).collect();
                        match find_nearest(&marker_points, (img_x, img_y), threshold) {
                            Some(i) => {
                                let school_idx = markers.read()[i].school_idx;
                                selected_school.set(schools.read().get(school_idx).cloned());
                            }
                            None => selected_school.set(None),
                        }
                    }
                }
            },

            onmouseleave: move |_| {
                is_dragging.set(false);
            },

            ondoubleclick: move |evt: Event<MouseData>| {
                evt.prevent_default();
                zoom.set(1.0);
                pan_x.set(0.0);
                pan_y.set(0.0);
            },

            // Inner wrapper — CSS transform applies zoom/pan to map + overlay together
            div {
                class: "map-inner",
                style: "{transform_style}",

                img { src: "/static/images/city-base.png", draggable: "false", alt: "City base map" }

                div {
                    dangerous_inner_html: "{svg_html}",
                    style: "position:absolute;top:0;left:0;width:100%;height:100%;pointer-events:none;",
                }
            }

            if let Some((school, x, y)) = popup {
                SchoolPopup {
                    school,
                    course_names: course_names.read().clone(),
                    x,
                    y,
                    on_close: move |_| selected_school.set(None),
                }
            }
        }
    }
}
