//! Reflection of the shareable filters (`type`, `city`, `q`) into the URL.
//! Price, radius and the user location stay session-local.

use url::form_urlencoded;

use crate::filter::FilterState;
use crate::models::SpaceType;

pub const SPACES_PATH: &str = "/spaces";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub space_type: Option<SpaceType>,
    pub city: Option<String>,
    pub q: Option<String>,
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl QueryParams {
    /// Parse a location search string, with or without the leading `?`.
    /// Unknown `type` values are ignored.
    pub fn parse(search: &str) -> Self {
        let search = search.strip_prefix('?').unwrap_or(search);
        let mut params = QueryParams::default();
        for (key, value) in form_urlencoded::parse(search.as_bytes()) {
            match key.as_ref() {
                "type" => params.space_type = SpaceType::parse(value.trim()),
                "city" => params.city = non_blank(&value),
                "q" => params.q = non_blank(&value),
                _ => {}
            }
        }
        params
    }

    pub fn from_state(state: &FilterState) -> Self {
        QueryParams {
            space_type: state.space_type,
            city: state.city_term().map(str::to_string),
            q: state.query_term().map(str::to_string),
        }
    }

    /// Seed a fresh filter state. Non-URL fields keep their defaults.
    pub fn to_state(&self) -> FilterState {
        FilterState {
            space_type: self.space_type,
            city: self.city.clone(),
            query: self.q.clone(),
            ..FilterState::default()
        }
    }

    /// `type=..&city=..&q=..`, skipping unset keys. Empty when nothing is set.
    pub fn to_query_string(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        if let Some(t) = self.space_type {
            out.append_pair("type", t.as_str());
        }
        if let Some(city) = &self.city {
            out.append_pair("city", city);
        }
        if let Some(q) = &self.q {
            out.append_pair("q", q);
        }
        out.finish()
    }

    pub fn to_url(&self, path: &str) -> String {
        let query = self.to_query_string();
        if query.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{query}")
        }
    }
}

/// Link into the spaces page with the given filters, e.g. for the type list.
pub fn build_url(city: Option<&str>, space_type: Option<SpaceType>, q: Option<&str>) -> String {
    QueryParams {
        space_type,
        city: city.and_then(non_blank),
        q: q.and_then(non_blank),
    }
    .to_url(SPACES_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seeds_filters() {
        let params = QueryParams::parse("?type=Vehicle&city=New%20York&q=wrap&radius=25");
        assert_eq!(params.space_type, Some(SpaceType::Vehicle));
        assert_eq!(params.city.as_deref(), Some("New York"));
        assert_eq!(params.q.as_deref(), Some("wrap"));

        let state = params.to_state();
        assert_eq!(state.radius_miles, 10.0);
        assert_eq!(state.user_location, None);
    }

    #[test]
    fn test_parse_ignores_unknown_type_and_blanks() {
        let params = QueryParams::parse("type=Spaceship&city=+&q=");
        assert_eq!(params, QueryParams::default());
    }

    #[test]
    fn test_state_round_trip_keeps_only_shareable_fields() {
        let state = FilterState {
            space_type: Some(SpaceType::Digital),
            city: Some(" Los Angeles ".to_string()),
            query: Some("screen".to_string()),
            price_floor: 400,
            radius_miles: 50.0,
            ..FilterState::default()
        };
        let qs = QueryParams::from_state(&state).to_query_string();
        assert_eq!(qs, "type=Digital&city=Los+Angeles&q=screen");
        assert_eq!(QueryParams::parse(&qs).to_state().price_floor, 0);
    }

    #[test]
    fn test_build_url() {
        assert_eq!(build_url(None, None, None), "/spaces");
        assert_eq!(
            build_url(Some("Austin"), Some(SpaceType::Outdoor), None),
            "/spaces?type=Outdoor&city=Austin"
        );
        // "All types" keeps city and query.
        assert_eq!(
            build_url(Some("Austin"), None, Some("mural")),
            "/spaces?city=Austin&q=mural"
        );
    }
}
