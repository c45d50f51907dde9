use std::collections::HashMap;

use futures_util::future::{try_join, try_join_all};
use serde::Deserialize;

use school_map_shared::models::{
    self, Course, School, Zone, ZoneBoundary,
};

/// Root path of the static JSON data files, relative to the site origin.
const DATA_ROOT: &str = "/static/data";

/// Build an absolute URL for a data file.
pub fn build_data_url(origin: &str, path: &str) -> String {
    format!("{}{}/{}", origin, DATA_ROOT, path)
}

fn data_url(path: &str) -> String {
    // In production, same origin. In dev, might be different.
    let window = web_sys::window().unwrap();
    let origin = window.location().origin().unwrap();
    build_data_url(&origin, path)
}

async fn fetch_json<T: for<'de> Deserialize<'de>>(path: &str) -> Result<T, String> {
    let resp = reqwest::Client::new()
        .get(data_url(path))
        .send()
        .await
        .map_err(|e| e.to_string())?
        .error_for_status()
        .map_err(|e| e.to_string())?;

    resp.json().await.map_err(|e| e.to_string())
}

/// Manifest of per-district school files, one file name per district.
pub async fn fetch_manifest() -> Result<Vec<String>, String> {
    fetch_json("schools/index.json").await
}

/// One district's schools. The payload is a single-key object whose value is
/// the school list; the key name varies per file.
pub async fn fetch_district_schools(file_name: &str) -> Result<Vec<School>, String> {
    let payload: serde_json::Value = fetch_json(&format!("schools/{}", file_name)).await?;
    models::schools_from_district_payload(payload).map_err(|e| format!("{}: {}", file_name, e))
}

/// The course dictionary: named groups of {code, name} pairs.
pub async fn fetch_course_groups() -> Result<HashMap<String, Vec<Course>>, String> {
    fetch_json("courses.json").await
}

pub async fn fetch_zones() -> Result<Vec<Zone>, String> {
    fetch_json("zones.json").await
}

pub async fn fetch_zone_boundaries() -> Result<Vec<ZoneBoundary>, String> {
    fetch_json("zones_range.json").await
}

/// Everything the marker layer needs, loaded once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct SchoolData {
    pub schools: Vec<School>,
    pub course_names: HashMap<String, String>,
}

/// Fetch the manifest, then every listed district file plus the course
/// dictionary concurrently, and merge. Partial results are discarded — one
/// failed fetch fails the whole load.
pub async fn load_school_data() -> Result<SchoolData, String> {
    let manifest = fetch_manifest().await?;

    let districts = manifest.iter().map(|name| fetch_district_schools(name));
    let (district_lists, groups) = try_join(try_join_all(districts), fetch_course_groups()).await?;

    let schools: Vec<School> = district_lists.into_iter().flatten().collect();
    tracing::info!(
        schools = schools.len(),
        districts = manifest.len(),
        "loaded school data"
    );

    Ok(SchoolData {
        schools,
        course_names: models::course_name_map(&groups),
    })
}
