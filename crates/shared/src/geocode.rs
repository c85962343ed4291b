//! Place-name lookups for the empty-results fallback.

use serde::Deserialize;
use url::Url;

use crate::error::GeocodeError;
use crate::models::Coordinate;

pub const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Best-effort place lookup. One outbound call per invocation, no retries.
#[cfg(feature = "geocoder")]
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    async fn lookup(&self, place: &str) -> Result<Coordinate, GeocodeError>;

    /// Like `lookup` but every failure reads as "no match".
    async fn resolve(&self, place: &str) -> Option<Coordinate> {
        match self.lookup(place).await {
            Ok(coord) => Some(coord),
            Err(err) => {
                tracing::debug!(%place, %err, "geocode: no match");
                None
            }
        }
    }
}

/// Trimmed, lowercased place name. Cache key and de-dup identity.
pub fn normalize_place(place: &str) -> String {
    place.trim().to_lowercase()
}

/// Nominatim search URL for `place`, limited to the single best hit.
pub fn nominatim_url(base: &str, place: &str) -> Result<Url, GeocodeError> {
    let mut url = Url::parse(base).map_err(|e| GeocodeError::Transport(e.to_string()))?;
    url.query_pairs_mut()
        .append_pair("format", "json")
        .append_pair("limit", "1")
        .append_pair("q", place.trim());
    Ok(url)
}

#[derive(Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
}

/// Take the first hit of a Nominatim response. Coordinates arrive as strings.
pub fn parse_nominatim(body: &str) -> Result<Coordinate, GeocodeError> {
    let hits: Vec<NominatimHit> =
        serde_json::from_str(body).map_err(|e| GeocodeError::Malformed(e.to_string()))?;
    let first = hits.into_iter().next().ok_or(GeocodeError::NoMatch)?;
    let lat: f64 = first
        .lat
        .trim()
        .parse()
        .map_err(|_| GeocodeError::Malformed(format!("bad lat {:?}", first.lat)))?;
    let lng: f64 = first
        .lon
        .trim()
        .parse()
        .map_err(|_| GeocodeError::Malformed(format!("bad lon {:?}", first.lon)))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(GeocodeError::Malformed(format!("out of range {lat},{lng}")));
    }
    Ok(Coordinate::new(lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_hit() {
        let body = r#"[{"lat":"43.6166163","lon":"-116.200886","display_name":"Boise"},
                       {"lat":"1","lon":"2"}]"#;
        let c = parse_nominatim(body).unwrap();
        assert!((c.lat - 43.6166163).abs() < 1e-9);
        assert!((c.lng + 116.200886).abs() < 1e-9);
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(parse_nominatim("[]"), Err(GeocodeError::NoMatch)));
        assert!(matches!(
            parse_nominatim("<html>rate limited</html>"),
            Err(GeocodeError::Malformed(_))
        ));
        assert!(matches!(
            parse_nominatim(r#"[{"lat":"north","lon":"0"}]"#),
            Err(GeocodeError::Malformed(_))
        ));
        assert!(matches!(
            parse_nominatim(r#"[{"lat":"95","lon":"0"}]"#),
            Err(GeocodeError::Malformed(_))
        ));
    }

    #[test]
    fn test_nominatim_url() {
        let url = nominatim_url(NOMINATIM_SEARCH_URL, "  San José ").unwrap();
        assert_eq!(
            url.as_str(),
            "https://nominatim.openstreetmap.org/search?format=json&limit=1&q=San+Jos%C3%A9"
        );
        assert!(nominatim_url("not a url", "x").is_err());
    }

    #[test]
    fn test_normalize_place() {
        assert_eq!(normalize_place("  New York "), "new york");
    }

    #[cfg(feature = "geocoder")]
    mod trait_tests {
        use super::*;

        struct Fixed(Option<Coordinate>);

        #[async_trait::async_trait]
        impl Geocoder for Fixed {
            async fn lookup(&self, _place: &str) -> Result<Coordinate, GeocodeError> {
                self.0.ok_or(GeocodeError::Status(503))
            }
        }

        #[tokio::test]
        async fn test_resolve_swallows_errors() {
            let hit = Coordinate::new(1.0, 2.0);
            assert_eq!(Fixed(Some(hit)).resolve("x").await, Some(hit));
            assert_eq!(Fixed(None).resolve("x").await, None);
        }
    }
}
