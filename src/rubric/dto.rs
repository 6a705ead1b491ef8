use crate::events::model::RUBRIC_SITE_URL;
use serde::Serialize;

/// Which listings to ask the Rubric search for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub limit: u32,
    pub university_id: String,
    pub state: String,
    pub country_code: String,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            limit: 200,
            university_id: "12".to_string(),
            state: "Queensland".to_string(),
            country_code: "AU".to_string(),
        }
    }
}

/// The `details` form field of a `getUnifiedSearch` call, as the web portal sends it
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDetails<'a> {
    pub first_call: bool,
    pub sort_type: &'static str,
    pub desired_type: &'static str,
    pub limit: u32,
    pub offset: u32,
    pub sort_direction: &'static str,
    pub search_query: &'static str,
    pub events_period_filter: &'static str,
    pub country_code: &'a str,
    pub state: &'a str,
    pub selected_university_id: &'a str,
    pub current_url: String,
    pub device: &'static str,
    pub version: u32,
}

impl<'a> From<&'a SearchQuery> for SearchDetails<'a> {
    fn from(query: &'a SearchQuery) -> Self {
        Self {
            first_call: true,
            sort_type: "date",
            desired_type: "events",
            limit: query.limit,
            offset: 0,
            sort_direction: "asc",
            search_query: "",
            events_period_filter: "All",
            country_code: &query.country_code,
            state: &query.state,
            selected_university_id: &query.university_id,
            current_url: format!(
                "{}/search?country={}&state={}&universityid={}&type=events",
                RUBRIC_SITE_URL, query.country_code, query.state, query.university_id
            ),
            device: "web_portal",
            version: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn should_serialize_details_like_the_web_portal() {
        let details = serde_json::to_string(&SearchDetails::from(&SearchQuery::default())).unwrap();

        assert_eq!(
            details,
            r#"{"firstCall":true,"sortType":"date","desiredType":"events","limit":200,"offset":0,"sortDirection":"asc","searchQuery":"","eventsPeriodFilter":"All","countryCode":"AU","state":"Queensland","selectedUniversityId":"12","currentUrl":"https://campus.hellorubric.com/search?country=AU&state=Queensland&universityid=12&type=events","device":"web_portal","version":4}"#
        );
    }
}
