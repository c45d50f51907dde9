use school_map_shared::geo;
use school_map_shared::models::School;

/// Pure function: convert container-relative coordinates to native map-image
/// pixels, undoing the zoom/pan CSS transform. Usable in unit tests (no
/// web_sys dependency).
///
/// Only `container_w` is needed because the image renders with
/// `width:100%; height:auto`, so both axes share the same scale factor
/// (`MAP_WIDTH_PX / container_w`).
pub fn container_to_map_px(
    container_x: f64,
    container_y: f64,
    container_w: f64,
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
) -> Option<(f64, f64)> {
    if container_w <= 0.0 || zoom <= 0.0 {
        return None;
    }

    // Undo CSS transform: translate(pan_x, pan_y) scale(zoom)
    let rendered_x = (container_x - pan_x) / zoom;
    let rendered_y = (container_y - pan_y) / zoom;

    let scale = geo::MAP_WIDTH_PX / container_w;
    let img_x = (rendered_x * scale).clamp(0.0, geo::MAP_WIDTH_PX);
    let img_y = (rendered_y * scale).clamp(0.0, geo::MAP_HEIGHT_PX);

    Some((img_x, img_y))
}

/// Get container-relative click coordinates using web_sys, then convert
/// from rendered pixel space to map-image pixel space.
pub fn click_to_map_px(
    client_x: f64,
    client_y: f64,
    container_id: &str,
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
) -> Option<(f64, f64)> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(container_id)?;
    let rect = element.get_bounding_client_rect();

    let container_x = client_x - rect.left();
    let container_y = client_y - rect.top();

    container_to_map_px(container_x, container_y, rect.width(), zoom, pan_x, pan_y)
}

/// Map-image pixels → container pixels under the current zoom/pan transform.
/// Used to pin overlays (the school popup) that live outside the transformed
/// element so they keep their on-screen size.
pub fn map_px_to_container(
    img_x: f64,
    img_y: f64,
    container_w: f64,
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
) -> (f64, f64) {
    let scale = container_w / geo::MAP_WIDTH_PX;
    (
        img_x * scale * zoom + pan_x,
        img_y * scale * zoom + pan_y,
    )
}

/// Image-pixel position of a school marker, or `None` when the school has no
/// usable coordinate.
pub fn school_marker_px(school: &School) -> Option<(f64, f64)> {
    let (lat, lng) = school.coordinate()?;
    Some(geo::latlng_to_px(lat, lng))
}
