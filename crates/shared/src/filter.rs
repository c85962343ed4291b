use serde::{Deserialize, Serialize};

use crate::calc::distance_miles;
use crate::models::{format_price, Coordinate, Listing, MapMarker, SpaceType};

/// Top of the price slider in dollars. A ceiling at this value means "and up".
pub const PRICE_SLIDER_MAX_DOLLARS: u32 = 5_000;

/// Radius presets offered once a user location is known.
pub const RADIUS_OPTIONS: [u32; 4] = [5, 10, 25, 50];

pub const DEFAULT_RADIUS_MILES: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub price_floor: u32,
    pub price_ceiling: u32,
    pub space_type: Option<SpaceType>,
    pub city: Option<String>,
    pub query: Option<String>,
    pub user_location: Option<Coordinate>,
    pub radius_miles: f64,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            price_floor: 0,
            price_ceiling: PRICE_SLIDER_MAX_DOLLARS,
            space_type: None,
            city: None,
            query: None,
            user_location: None,
            radius_miles: DEFAULT_RADIUS_MILES as f64,
        }
    }
}

impl FilterState {
    /// The active city substring, ignoring blank input.
    pub fn city_term(&self) -> Option<&str> {
        non_blank(self.city.as_deref())
    }

    /// The active free-text query, ignoring blank input.
    pub fn query_term(&self) -> Option<&str> {
        non_blank(self.query.as_deref())
    }

    pub fn has_upper_price_bound(&self) -> bool {
        self.price_ceiling < PRICE_SLIDER_MAX_DOLLARS
    }

    /// Label for the ceiling slider, e.g. `$2,000` or `$5,000+`.
    pub fn price_ceiling_label(&self) -> String {
        let label = format_price(self.price_ceiling as i64 * 100);
        if self.has_upper_price_bound() {
            label
        } else {
            format!("{label}+")
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

pub fn matches_price(listing: &Listing, state: &FilterState) -> bool {
    let price = listing.price_dollars();
    if price < state.price_floor as f64 {
        return false;
    }
    !state.has_upper_price_bound() || price <= state.price_ceiling as f64
}

pub fn matches_type(listing: &Listing, state: &FilterState) -> bool {
    state.space_type.map_or(true, |t| listing.space_type == t)
}

pub fn matches_city(listing: &Listing, state: &FilterState) -> bool {
    match state.city_term() {
        None => true,
        Some(term) => {
            let term = term.to_lowercase();
            listing
                .city
                .as_deref()
                .is_some_and(|city| contains_ignore_case(city, &term))
        }
    }
}

/// Inclusive radius test. Listings without a coordinate never pass once a
/// user location is set.
pub fn matches_proximity(listing: &Listing, state: &FilterState) -> bool {
    match state.user_location {
        None => true,
        Some(user) => listing
            .coordinate
            .is_some_and(|c| distance_miles(user, c) <= state.radius_miles),
    }
}

pub fn matches_query(listing: &Listing, state: &FilterState) -> bool {
    match state.query_term() {
        None => true,
        Some(q) => {
            let q = q.to_lowercase();
            contains_ignore_case(&listing.title, &q) || contains_ignore_case(&listing.description, &q)
        }
    }
}

pub fn matches(listing: &Listing, state: &FilterState) -> bool {
    matches_price(listing, state)
        && matches_type(listing, state)
        && matches_city(listing, state)
        && matches_proximity(listing, state)
        && matches_query(listing, state)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    pub listings: Vec<Listing>,
    pub markers: Vec<MapMarker>,
}

impl FilterOutcome {
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

/// Apply every predicate, keeping input order. Markers are the passing
/// listings that have a coordinate.
pub fn filter(listings: &[Listing], state: &FilterState) -> FilterOutcome {
    let listings: Vec<Listing> = listings
        .iter()
        .filter(|l| matches(l, state))
        .cloned()
        .collect();
    let markers = listings.iter().filter_map(Listing::to_marker).collect();
    FilterOutcome { listings, markers }
}

/// Header line such as "3 listings · Billboard in Chicago".
pub fn result_summary(count: usize, state: &FilterState) -> String {
    let noun = if count == 1 { "listing" } else { "listings" };
    let mut summary = format!("{count} {noun}");
    if let Some(t) = state.space_type {
        summary.push_str(&format!(" · {t}"));
    }
    if let Some(city) = state.city_term() {
        summary.push_str(&format!(" in {city}"));
    }
    summary
}

/// Copy shown under "No listings found".
pub fn empty_state_hint(state: &FilterState) -> &'static str {
    if state.user_location.is_some() {
        "Try increasing the radius or clearing the location filter."
    } else {
        "Try adjusting your filters or search."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::demo_listings;
    use crate::models::ListingStatus;

    fn listing(id: &str, price_cents: i64, city: Option<&str>, coord: Option<Coordinate>) -> Listing {
        Listing {
            id: id.to_string(),
            title: format!("Listing {id}"),
            space_type: SpaceType::Billboard,
            price_cents,
            city: city.map(str::to_string),
            address: None,
            coordinate: coord,
            description: String::new(),
            image_url: None,
            status: ListingStatus::Published,
            created_at: String::new(),
        }
    }

    #[test]
    fn test_default_state_passes_everything() {
        let all = demo_listings();
        let out = filter(&all, &FilterState::default());
        assert_eq!(out.listings, all);
        assert_eq!(out.markers.len(), all.len());
    }

    #[test]
    fn test_output_is_subset_and_markers_follow_listings() {
        let mut all = demo_listings();
        all.push(listing("no-coord", 10_000, Some("Chicago"), None));
        let state = FilterState {
            city: Some("chic".to_string()),
            ..Default::default()
        };
        let out = filter(&all, &state);
        assert!(out.listings.iter().all(|l| all.contains(l)));
        assert!(out
            .markers
            .iter()
            .all(|m| out.listings.iter().any(|l| l.id == m.id)));
        // The coordinate-less listing is listed but has no marker.
        assert_eq!(out.listings.len(), 2);
        assert_eq!(out.markers.len(), 1);
    }

    #[test]
    fn test_city_is_case_insensitive_substring() {
        let l = listing("1", 10_000, Some("Chicago"), None);
        let mut state = FilterState::default();
        for term in ["chic", "CAGO", "hica", "Chicago"] {
            state.city = Some(term.to_string());
            assert!(matches_city(&l, &state), "{term}");
        }
        state.city = Some("boston".to_string());
        assert!(!matches_city(&l, &state));
        state.city = Some("   ".to_string());
        assert!(matches_city(&l, &state));
        state.city = Some("chi".to_string());
        assert!(!matches_city(&listing("2", 10_000, None, None), &state));
    }

    #[test]
    fn test_price_bounds_inclusive() {
        let state = FilterState {
            price_floor: 250,
            price_ceiling: 1_500,
            ..Default::default()
        };
        assert!(matches_price(&listing("floor", 25_000, None, None), &state));
        assert!(matches_price(&listing("ceil", 150_000, None, None), &state));
        assert!(!matches_price(&listing("below", 24_999, None, None), &state));
        assert!(!matches_price(&listing("above", 150_001, None, None), &state));
    }

    #[test]
    fn test_price_ceiling_at_slider_max_is_open_ended() {
        let state = FilterState::default();
        assert!(!state.has_upper_price_bound());
        let pricey = listing("pricey", (PRICE_SLIDER_MAX_DOLLARS as i64 + 2_500) * 100, None, None);
        assert!(matches_price(&pricey, &state));
        assert_eq!(state.price_ceiling_label(), "$5,000+");

        let bounded = FilterState {
            price_ceiling: PRICE_SLIDER_MAX_DOLLARS - 1,
            ..Default::default()
        };
        assert!(!matches_price(&pricey, &bounded));
        assert_eq!(bounded.price_ceiling_label(), "$4,999");
    }

    #[test]
    fn test_proximity_boundary_inclusive() {
        let user = Coordinate::new(41.8827, -87.6233);
        let spot = Coordinate::new(41.95, -87.70);
        let l = listing("near", 10_000, None, Some(spot));
        let d = distance_miles(user, spot);

        let at_edge = FilterState {
            user_location: Some(user),
            radius_miles: d,
            ..Default::default()
        };
        assert!(matches_proximity(&l, &at_edge));

        let radius_just_short = FilterState {
            radius_miles: d - 1e-9,
            ..at_edge.clone()
        };
        assert!(!matches_proximity(&l, &radius_just_short));
    }

    #[test]
    fn test_proximity_excludes_missing_coordinates() {
        let state = FilterState {
            user_location: Some(Coordinate::new(0.0, 0.0)),
            radius_miles: 1e6,
            ..Default::default()
        };
        assert!(!matches(&listing("x", 100, Some("Anywhere"), None), &state));
        assert!(matches(&listing("y", 100, Some("Anywhere"), Some(Coordinate::new(1.0, 1.0))), &state));
    }

    #[test]
    fn test_query_matches_title_or_description() {
        let mut l = listing("q", 100, None, None);
        l.title = "Airport Terminal Screen".to_string();
        l.description = "Reach 50,000 daily travelers".to_string();
        let mut state = FilterState::default();
        state.query = Some("terminal".to_string());
        assert!(matches_query(&l, &state));
        state.query = Some("TRAVELERS".to_string());
        assert!(matches_query(&l, &state));
        state.query = Some("stadium".to_string());
        assert!(!matches_query(&l, &state));
    }

    #[test]
    fn test_vehicle_filter_on_demo_listings() {
        let state = FilterState {
            space_type: Some(SpaceType::Vehicle),
            ..Default::default()
        };
        let out = filter(&demo_listings(), &state);
        assert_eq!(out.listings.len(), 1);
        assert_eq!(out.listings[0].city.as_deref(), Some("Chicago"));
        assert_eq!(out.markers.len(), 1);
    }

    #[test]
    fn test_summary_and_hint() {
        let state = FilterState {
            space_type: Some(SpaceType::Billboard),
            city: Some("New York".to_string()),
            ..Default::default()
        };
        assert_eq!(result_summary(1, &state), "1 listing · Billboard in New York");
        assert_eq!(result_summary(0, &FilterState::default()), "0 listings");
        assert_eq!(empty_state_hint(&state), "Try adjusting your filters or search.");
        let near = FilterState {
            user_location: Some(Coordinate::new(0.0, 0.0)),
            ..Default::default()
        };
        assert!(empty_state_hint(&near).contains("radius"));
    }
}
