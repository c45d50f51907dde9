use std::collections::{BTreeSet, HashMap};

use crate::models::{Course, School};

/// The three multi-select code dimensions. A filter code is routed to its
/// dimension by the code's leading character: `G` gender, `T` technical or
/// vocational, `P` public or private.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDimension {
    Gender,
    Track,
    Ownership,
}

impl FilterDimension {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.chars().next()? {
            'G' => Some(Self::Gender),
            'T' => Some(Self::Track),
            'P' => Some(Self::Ownership),
            _ => None,
        }
    }
}

/// The active filter selections. An empty set / `None` / blank query on any
/// dimension means "do not constrain"; dimensions combine with AND.
///
/// This is the only mutable state in the filtering pipeline, and only UI
/// event handlers write to it — one event at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub gender_codes: Vec<String>,
    pub track_codes: Vec<String>,
    pub ownership_codes: Vec<String>,
    pub selected_course: Option<String>,
    pub selected_zone: Option<String>,
    pub search_text: String,
}

impl FilterState {
    pub fn codes(&self, dimension: FilterDimension) -> &[String] {
        match dimension {
            FilterDimension::Gender => &self.gender_codes,
            FilterDimension::Track => &self.track_codes,
            FilterDimension::Ownership => &self.ownership_codes,
        }
    }

    fn codes_mut(&mut self, dimension: FilterDimension) -> &mut Vec<String> {
        match dimension {
            FilterDimension::Gender => &mut self.gender_codes,
            FilterDimension::Track => &mut self.track_codes,
            FilterDimension::Ownership => &mut self.ownership_codes,
        }
    }

    /// Set-membership toggle for a code button. Returns whether the code is
    /// active after the call. Codes with an unknown prefix are ignored.
    pub fn toggle_code(&mut self, code: &str) -> bool {
        let Some(dimension) = FilterDimension::from_code(code) else {
            return false;
        };
        let set = self.codes_mut(dimension);
        if let Some(i) = set.iter().position(|c| c == code) {
            set.remove(i);
            false
        } else {
            set.push(code.to_string());
            true
        }
    }

    pub fn is_code_active(&self, code: &str) -> bool {
        FilterDimension::from_code(code)
            .is_some_and(|dimension| self.codes(dimension).iter().any(|c| c == code))
    }
}

/// AND-of-substrings match: every whitespace-separated token of `keyword`
/// must occur (case-insensitively) in `text`. An empty target or a keyword
/// with no tokens never matches. Not edit-distance matching.
pub fn fuzzy_match(text: &str, keyword: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let text = text.to_lowercase();
    let mut tokens = keyword.split_whitespace().peekable();
    if tokens.peek().is_none() {
        return false;
    }
    tokens.all(|token| text.contains(&token.to_lowercase()))
}

fn code_set_allows(set: &[String], code: &str) -> bool {
    set.is_empty() || set.iter().any(|c| c == code)
}

/// Compute the visible subset of `schools` under `filters`.
///
/// Pure: inputs are not mutated and the relative order of the input
/// collection is preserved. Stages narrow conjunctively — zone, course,
/// code sets, then free text.
pub fn apply_filters(schools: &[School], filters: &FilterState) -> Vec<School> {
    let mut kept: Vec<&School> = schools.iter().collect();

    if let Some(zone) = &filters.selected_zone {
        kept.retain(|school| &school.district == zone);
    }

    if let Some(course) = &filters.selected_course {
        kept.retain(|school| school.offers_course(course));
    }

    kept.retain(|school| {
        code_set_allows(&filters.gender_codes, &school.gender_specific_code)
            && code_set_allows(&filters.track_codes, &school.technical_or_vocational_code)
            && code_set_allows(&filters.ownership_codes, &school.public_or_private_code)
    });

    let query = filters.search_text.trim().to_lowercase();
    if !query.is_empty() {
        kept.retain(|school| {
            fuzzy_match(&school.school_name, &query)
                || fuzzy_match(&school.courses, &query)
                || fuzzy_match(&school.address, &query)
        });
    }

    kept.into_iter().cloned().collect()
}

/// Selectable course options: only codes offered by at least one school,
/// sorted ascending by display name. Codes missing from the dictionary keep
/// the raw code as their label.
pub fn used_course_options(
    schools: &[School],
    names: &HashMap<String, String>,
) -> Vec<Course> {
    let used: BTreeSet<String> = schools
        .iter()
        .flat_map(|school| school.course_codes())
        .collect();
    let mut options: Vec<Course> = used
        .into_iter()
        .map(|code| Course {
            name: names.get(&code).cloned().unwrap_or_else(|| code.clone()),
            code,
        })
        .collect();
    options.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.code.cmp(&b.code)));
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn school(name: &str, district: &str, courses: &str, codes: [&str; 3]) -> School {
        School {
            school_name: name.to_string(),
            latitude: Some("36.30".to_string()),
            longitude: Some("59.60".to_string()),
            district: district.to_string(),
            district_name: format!("District {district}"),
            address: format!("{name} street"),
            phone: String::new(),
            gender_specific: String::new(),
            gender_specific_code: codes[0].to_string(),
            technical_or_vocational: String::new(),
            technical_or_vocational_code: codes[1].to_string(),
            public_or_private: String::new(),
            public_or_private_code: codes[2].to_string(),
            courses: courses.to_string(),
        }
    }

    fn sample_schools() -> Vec<School> {
        vec![
            school("Sadaf Technical School", "3", "C101,C205", ["G1", "T1", "P1"]),
            school("Kar o Danesh Omid", "1", "C205", ["G2", "T2", "P1"]),
            school("Honarestan Azadi", "3", "C310", ["G2", "T1", "P2"]),
            school("Narges Vocational", "5", "C101", ["G1", "T2", "P2"]),
        ]
    }

    fn names(schools: &[School]) -> Vec<&str> {
        schools.iter().map(|s| s.school_name.as_str()).collect()
    }

    // --- fuzzy_match ---

    #[test]
    fn test_fuzzy_match_tokens_in_any_order() {
        assert!(fuzzy_match("Sadaf Technical School", "school sadaf"));
        assert!(fuzzy_match("Sadaf Technical School", "SADAF tech"));
    }

    #[test]
    fn test_fuzzy_match_rejects_near_miss() {
        assert!(!fuzzy_match("Sadaf", "sadax"));
    }

    #[test]
    fn test_fuzzy_match_all_tokens_required() {
        assert!(!fuzzy_match("Sadaf Technical School", "sadaf azadi"));
    }

    #[test]
    fn test_fuzzy_match_empty_text_never_matches() {
        assert!(!fuzzy_match("", "sadaf"));
    }

    #[test]
    fn test_fuzzy_match_blank_keyword_never_matches() {
        assert!(!fuzzy_match("Sadaf", ""));
        assert!(!fuzzy_match("Sadaf", "   "));
    }

    // --- apply_filters ---

    #[test]
    fn test_unconstrained_state_returns_everything_in_order() {
        let schools = sample_schools();
        let result = apply_filters(&schools, &FilterState::default());
        assert_eq!(result, schools);
    }

    #[test]
    fn test_zone_filter() {
        let schools = sample_schools();
        let filters = FilterState {
            selected_zone: Some("3".to_string()),
            ..Default::default()
        };
        let result = apply_filters(&schools, &filters);
        assert_eq!(
            names(&result),
            vec!["Sadaf Technical School", "Honarestan Azadi"]
        );
    }

    #[test]
    fn test_clearing_zone_restores_previous_result() {
        let schools = sample_schools();
        let mut filters = FilterState::default();
        let before = apply_filters(&schools, &filters);

        filters.selected_zone = Some("3".to_string());
        let narrowed = apply_filters(&schools, &filters);
        assert!(narrowed.len() < before.len());

        filters.selected_zone = None;
        assert_eq!(apply_filters(&schools, &filters), before);
    }

    #[test]
    fn test_course_filter_uses_normalized_codes() {
        let schools = sample_schools();
        let filters = FilterState {
            selected_course: Some("C205".to_string()),
            ..Default::default()
        };
        let result = apply_filters(&schools, &filters);
        assert_eq!(
            names(&result),
            vec!["Sadaf Technical School", "Kar o Danesh Omid"]
        );
    }

    #[test]
    fn test_code_set_filters_are_conjunctive_across_dimensions() {
        let schools = sample_schools();
        let filters = FilterState {
            gender_codes: vec!["G2".to_string()],
            track_codes: vec!["T1".to_string()],
            ..Default::default()
        };
        let result = apply_filters(&schools, &filters);
        assert_eq!(names(&result), vec!["Honarestan Azadi"]);
    }

    #[test]
    fn test_code_set_matches_any_code_within_dimension() {
        let schools = sample_schools();
        let filters = FilterState {
            gender_codes: vec!["G1".to_string(), "G2".to_string()],
            ..Default::default()
        };
        let result = apply_filters(&schools, &filters);
        assert_eq!(result.len(), schools.len());
    }

    #[test]
    fn test_adding_a_code_never_grows_the_result() {
        let schools = sample_schools();
        let mut filters = FilterState::default();
        let all = apply_filters(&schools, &filters).len();

        filters.gender_codes.push("G1".to_string());
        let narrowed = apply_filters(&schools, &filters).len();
        assert!(narrowed <= all);

        filters.gender_codes.push("G2".to_string());
        let widened = apply_filters(&schools, &filters).len();
        assert!(widened >= narrowed);
    }

    #[test]
    fn test_search_matches_name_courses_and_address() {
        let schools = sample_schools();

        let by_name = FilterState {
            search_text: "omid".to_string(),
            ..Default::default()
        };
        assert_eq!(names(&apply_filters(&schools, &by_name)), vec!["Kar o Danesh Omid"]);

        let by_course = FilterState {
            search_text: "c310".to_string(),
            ..Default::default()
        };
        assert_eq!(names(&apply_filters(&schools, &by_course)), vec!["Honarestan Azadi"]);

        let by_address = FilterState {
            search_text: "narges street".to_string(),
            ..Default::default()
        };
        assert_eq!(names(&apply_filters(&schools, &by_address)), vec!["Narges Vocational"]);
    }

    #[test]
    fn test_whitespace_only_search_is_unconstrained() {
        let schools = sample_schools();
        let filters = FilterState {
            search_text: "   ".to_string(),
            ..Default::default()
        };
        assert_eq!(apply_filters(&schools, &filters).len(), schools.len());
    }

    #[test]
    fn test_all_stages_compose() {
        let schools = sample_schools();
        let filters = FilterState {
            gender_codes: vec!["G1".to_string()],
            selected_zone: Some("3".to_string()),
            selected_course: Some("C101".to_string()),
            search_text: "sadaf".to_string(),
            ..Default::default()
        };
        assert_eq!(names(&apply_filters(&schools, &filters)), vec!["Sadaf Technical School"]);
    }

    #[test]
    fn test_impossible_combination_yields_empty_not_error() {
        let schools = sample_schools();
        let filters = FilterState {
            selected_zone: Some("3".to_string()),
            selected_course: Some("C205".to_string()),
            gender_codes: vec!["G2".to_string()],
            ..Default::default()
        };
        assert!(apply_filters(&schools, &filters).is_empty());
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let schools = sample_schools();
        let snapshot = schools.clone();
        let filters = FilterState {
            selected_zone: Some("3".to_string()),
            ..Default::default()
        };
        let _ = apply_filters(&schools, &filters);
        assert_eq!(schools, snapshot);
    }

    // --- FilterState toggling ---

    #[test]
    fn test_toggle_routes_by_prefix() {
        let mut filters = FilterState::default();
        assert!(filters.toggle_code("G1"));
        assert!(filters.toggle_code("T2"));
        assert!(filters.toggle_code("P1"));
        assert_eq!(filters.gender_codes, vec!["G1"]);
        assert_eq!(filters.track_codes, vec!["T2"]);
        assert_eq!(filters.ownership_codes, vec!["P1"]);
    }

    #[test]
    fn test_toggle_twice_restores_empty_set_and_result() {
        let schools = sample_schools();
        let mut filters = FilterState::default();
        let before = apply_filters(&schools, &filters);

        filters.toggle_code("G1");
        filters.toggle_code("G1");

        assert_eq!(filters, FilterState::default());
        assert_eq!(apply_filters(&schools, &filters), before);
    }

    #[test]
    fn test_toggle_unknown_prefix_is_ignored() {
        let mut filters = FilterState::default();
        assert!(!filters.toggle_code("X9"));
        assert!(!filters.toggle_code(""));
        assert_eq!(filters, FilterState::default());
    }

    #[test]
    fn test_is_code_active_tracks_toggles() {
        let mut filters = FilterState::default();
        assert!(!filters.is_code_active("T1"));
        filters.toggle_code("T1");
        assert!(filters.is_code_active("T1"));
        assert!(!filters.is_code_active("T2"));
    }

    // --- course options ---

    #[test]
    fn test_course_options_contain_only_used_codes() {
        let schools = sample_schools();
        let dictionary: HashMap<String, String> = [
            ("C101", "Electronics"),
            ("C205", "Accounting"),
            ("C310", "Graphics"),
            ("C999", "Unoffered Course"),
        ]
        .into_iter()
        .map(|(c, n)| (c.to_string(), n.to_string()))
        .collect();

        let options = used_course_options(&schools, &dictionary);
        let codes: Vec<&str> = options.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["C205", "C101", "C310"]);
    }

    #[test]
    fn test_course_options_sorted_by_display_name() {
        let schools = sample_schools();
        let dictionary: HashMap<String, String> = [
            ("C101", "Electronics"),
            ("C205", "Accounting"),
            ("C310", "Graphics"),
        ]
        .into_iter()
        .map(|(c, n)| (c.to_string(), n.to_string()))
        .collect();

        let options = used_course_options(&schools, &dictionary);
        let labels: Vec<&str> = options.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(labels, vec!["Accounting", "Electronics", "Graphics"]);
    }

    #[test]
    fn test_course_options_fall_back_to_raw_code() {
        let schools = vec![school("A", "1", "ZZZ", ["G1", "T1", "P1"])];
        let options = used_course_options(&schools, &HashMap::new());
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].code, "ZZZ");
        assert_eq!(options[0].name, "ZZZ");
    }
}
