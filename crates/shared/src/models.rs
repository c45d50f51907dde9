use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// A vocational school record as spelled in the per-district data files.
///
/// Field names are pinned to the wire format — `districtN` and `cources`
/// keep the historical spelling used by the data set. Coordinates ship as
/// strings and may be absent or non-numeric; use [`School::coordinate`] to
/// get a usable position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct School {
    #[serde(default)]
    pub school_name: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub latitude: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub longitude: Option<String>,
    /// Zone identifier, matched against [`Zone::id`].
    #[serde(default, deserialize_with = "lenient_string")]
    pub district: String,
    /// Zone display name.
    #[serde(rename = "districtN", default)]
    pub district_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: String,
    /// Gender-track label, e.g. "دخترانه".
    #[serde(default)]
    pub gender_specific: String,
    /// Gender-track code: "G1" girls, "G2" boys.
    #[serde(default)]
    pub gender_specific_code: String,
    #[serde(default)]
    pub technical_or_vocational: String,
    #[serde(default)]
    pub technical_or_vocational_code: String,
    #[serde(default)]
    pub public_or_private: String,
    #[serde(default)]
    pub public_or_private_code: String,
    /// Comma-delimited course-code string.
    #[serde(rename = "cources", default)]
    pub courses: String,
}

impl School {
    /// Parsed (latitude, longitude), or `None` when either axis is missing,
    /// unparseable, or non-finite. Schools without a usable coordinate get
    /// no marker.
    pub fn coordinate(&self) -> Option<(f64, f64)> {
        let lat: f64 = self.latitude.as_deref()?.trim().parse().ok()?;
        let lng: f64 = self.longitude.as_deref()?.trim().parse().ok()?;
        (lat.is_finite() && lng.is_finite()).then_some((lat, lng))
    }

    /// Normalized course-code list: split on commas, trimmed, empties dropped.
    pub fn course_codes(&self) -> Vec<String> {
        self.courses
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn offers_course(&self, code: &str) -> bool {
        self.courses.split(',').any(|c| c.trim() == code)
    }
}

/// A course: dictionary code plus display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(deserialize_with = "lenient_string")]
    pub code: String,
    pub name: String,
}

/// An administrative zone as listed in the zone file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub name: String,
}

/// A zone boundary polygon: display name, draw color, and an ordered ring of
/// [lat, lng] pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneBoundary {
    pub name: String,
    pub color: String,
    pub coordinates: Vec<[f64; 2]>,
}

/// Flatten the course dictionary's named groups into a code → name map.
pub fn course_name_map(groups: &HashMap<String, Vec<Course>>) -> HashMap<String, String> {
    groups
        .values()
        .flatten()
        .map(|course| (course.code.clone(), course.name.clone()))
        .collect()
}

#[derive(Debug, Error)]
pub enum DistrictFileError {
    #[error("district file is not a JSON object")]
    NotAnObject,
    #[error("district file has no top-level key")]
    MissingKey,
    #[error("district file has {0} top-level keys, expected exactly one")]
    AmbiguousKeys(usize),
    #[error("district school list is malformed: {0}")]
    BadSchoolList(#[from] serde_json::Error),
}

/// Extract the school list from a per-district payload.
///
/// Each district file is an object with exactly one top-level key (the key
/// name varies per file) whose value is the school list. Zero or multiple
/// keys is a malformed file and fails the decode rather than guessing.
pub fn schools_from_district_payload(
    payload: serde_json::Value,
) -> Result<Vec<School>, DistrictFileError> {
    let serde_json::Value::Object(map) = payload else {
        return Err(DistrictFileError::NotAnObject);
    };
    if map.len() > 1 {
        return Err(DistrictFileError::AmbiguousKeys(map.len()));
    }
    let Some((_, list)) = map.into_iter().next() else {
        return Err(DistrictFileError::MissingKey);
    };
    Ok(serde_json::from_value(list)?)
}

/// Accept a JSON string or number as a string; anything else becomes `None`.
/// The data files are inconsistent about quoting identifiers and phone
/// numbers, so decode leniently instead of failing the whole district.
fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}
