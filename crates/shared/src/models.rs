use serde::{Deserialize, Serialize};

/// Kind of advertising surface a listing offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpaceType {
    Billboard,
    Vehicle,
    Indoor,
    Outdoor,
    Digital,
    Event,
    Other,
}

impl SpaceType {
    /// Types offered as filter choices, in display order. `Other` is never a filter choice.
    pub const FILTERABLE: [SpaceType; 6] = [
        SpaceType::Billboard,
        SpaceType::Vehicle,
        SpaceType::Indoor,
        SpaceType::Outdoor,
        SpaceType::Digital,
        SpaceType::Event,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpaceType::Billboard => "Billboard",
            SpaceType::Vehicle => "Vehicle",
            SpaceType::Indoor => "Indoor",
            SpaceType::Outdoor => "Outdoor",
            SpaceType::Digital => "Digital",
            SpaceType::Event => "Event",
            SpaceType::Other => "Other",
        }
    }

    /// Parse a query-string value. Matching is exact, like the `type` URL parameter.
    pub fn parse(value: &str) -> Option<SpaceType> {
        match value {
            "Billboard" => Some(SpaceType::Billboard),
            "Vehicle" => Some(SpaceType::Vehicle),
            "Indoor" => Some(SpaceType::Indoor),
            "Outdoor" => Some(SpaceType::Outdoor),
            "Digital" => Some(SpaceType::Digital),
            "Event" => Some(SpaceType::Event),
            "Other" => Some(SpaceType::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for SpaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Draft,
    Published,
    Archived,
}

/// A point in signed decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Coordinate { lat, lng }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub space_type: SpaceType,
    /// Monthly price in cents.
    pub price_cents: i64,
    pub city: Option<String>,
    pub address: Option<String>,
    /// `None` when the address was never geocoded.
    pub coordinate: Option<Coordinate>,
    pub description: String,
    pub image_url: Option<String>,
    pub status: ListingStatus,
    #[serde(default)]
    pub created_at: String,
}

impl Listing {
    pub fn price_dollars(&self) -> f64 {
        self.price_cents as f64 / 100.0
    }

    /// Project onto the map. Listings without a coordinate have no marker.
    pub fn to_marker(&self) -> Option<MapMarker> {
        let coord = self.coordinate?;
        Some(MapMarker {
            id: self.id.clone(),
            title: self.title.clone(),
            space_type: self.space_type,
            price_cents: self.price_cents,
            city: self.city.clone(),
            lat: coord.lat,
            lng: coord.lng,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub id: String,
    pub title: String,
    pub space_type: SpaceType,
    pub price_cents: i64,
    pub city: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

impl MapMarker {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    /// Secondary popup line, e.g. "Vehicle · Chicago".
    pub fn subtitle(&self) -> String {
        match &self.city {
            Some(city) if !city.is_empty() => format!("{} · {}", self.space_type, city),
            _ => self.space_type.to_string(),
        }
    }
}

/// Format cents as whole dollars with thousands separators, e.g. `$1,500`.
pub fn format_price(cents: i64) -> String {
    let dollars = (cents as f64 / 100.0).round() as i64;
    let digits = dollars.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if dollars < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(coordinate: Option<Coordinate>) -> Listing {
        Listing {
            id: "7".to_string(),
            title: "Bus Shelter Panel".to_string(),
            space_type: SpaceType::Outdoor,
            price_cents: 120_000,
            city: Some("Denver".to_string()),
            address: None,
            coordinate,
            description: String::new(),
            image_url: None,
            status: ListingStatus::Published,
            created_at: String::new(),
        }
    }

    #[test]
    fn test_marker_requires_coordinate() {
        assert!(listing(None).to_marker().is_none());
        let marker = listing(Some(Coordinate::new(39.74, -104.99))).to_marker().unwrap();
        assert_eq!(marker.id, "7");
        assert_eq!(marker.coordinate(), Coordinate::new(39.74, -104.99));
        assert_eq!(marker.subtitle(), "Outdoor · Denver");
    }

    #[test]
    fn test_space_type_parse_is_exact() {
        assert_eq!(SpaceType::parse("Vehicle"), Some(SpaceType::Vehicle));
        assert_eq!(SpaceType::parse("vehicle"), None);
        assert_eq!(SpaceType::parse(""), None);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ListingStatus::Published).unwrap();
        assert_eq!(json, "\"published\"");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(150_000), "$1,500");
        assert_eq!(format_price(25_000), "$250");
        assert_eq!(format_price(500_000_00), "$500,000");
        assert_eq!(format_price(0), "$0");
    }

    #[test]
    fn test_price_dollars() {
        assert!((listing(None).price_dollars() - 1200.0).abs() < 1e-9);
    }
}
