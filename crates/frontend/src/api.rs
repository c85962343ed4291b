use serde::{Deserialize, Serialize};
use spotlight_shared::models::{Coordinate, Listing, ListingStatus, SpaceType};

#[derive(Debug, Clone, Serialize)]
pub struct GraphQLRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

fn api_url() -> Result<String, String> {
    // Same origin in production; the dev server proxies /graphql.
    let window = web_sys::window().ok_or("no window")?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| "no location origin".to_string())?;
    Ok(format!("{}/graphql", origin))
}

async fn query<T: for<'de> Deserialize<'de>>(
    query_str: &str,
    variables: Option<serde_json::Value>,
) -> Result<T, String> {
    let req = GraphQLRequest {
        query: query_str.to_string(),
        variables,
    };

    let resp = reqwest::Client::new()
        .post(api_url()?)
        .json(&req)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let gql_resp: GraphQLResponse<T> = resp.json().await.map_err(|e| e.to_string())?;
    unwrap_response(gql_resp)
}

fn unwrap_response<T>(resp: GraphQLResponse<T>) -> Result<T, String> {
    if let Some(errors) = resp.errors {
        if let Some(first) = errors.into_iter().next() {
            return Err(first.message);
        }
    }
    resp.data.ok_or_else(|| "No data returned".to_string())
}

// Types mirroring the GraphQL schema

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CoordinateData {
    pub lat: f64,
    pub lng: f64,
}

impl From<CoordinateData> for Coordinate {
    fn from(c: CoordinateData) -> Self {
        Coordinate::new(c.lat, c.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingData {
    pub id: String,
    pub title: String,
    pub space_type: String,
    pub price_cents: i64,
    pub city: Option<String>,
    pub address: Option<String>,
    pub coordinate: Option<CoordinateData>,
    #[serde(default)]
    pub description: String,
    pub image_url: Option<String>,
    pub status: String,
    #[serde(default)]
    pub created_at: String,
}

/// GraphQL enums arrive upper-cased (`VEHICLE`); unknown values become `Other`.
fn space_type_from_gql(value: &str) -> SpaceType {
    SpaceType::FILTERABLE
        .into_iter()
        .find(|t| t.as_str().eq_ignore_ascii_case(value))
        .unwrap_or(SpaceType::Other)
}

fn status_from_gql(value: &str) -> ListingStatus {
    match value {
        "PUBLISHED" => ListingStatus::Published,
        "ARCHIVED" => ListingStatus::Archived,
        _ => ListingStatus::Draft,
    }
}

impl From<ListingData> for Listing {
    fn from(l: ListingData) -> Self {
        Listing {
            id: l.id,
            title: l.title,
            space_type: space_type_from_gql(&l.space_type),
            price_cents: l.price_cents,
            city: l.city,
            address: l.address,
            coordinate: l.coordinate.map(Coordinate::from),
            description: l.description,
            image_url: l.image_url,
            status: status_from_gql(&l.status),
            created_at: l.created_at,
        }
    }
}

// API functions

const LISTING_FIELDS: &str =
    "id title spaceType priceCents city address coordinate { lat lng } description imageUrl status createdAt";

#[derive(Deserialize)]
pub struct ListingsResponse {
    pub listings: Vec<ListingData>,
}

/// Every published listing. The engine filters locally.
pub async fn fetch_listings() -> Result<Vec<Listing>, String> {
    let resp: ListingsResponse =
        query(&format!("query {{ listings {{ {LISTING_FIELDS} }} }}"), None).await?;
    Ok(resp.listings.into_iter().map(Listing::from).collect())
}

#[derive(Deserialize)]
pub struct GeocodeResponse {
    pub geocode: Option<CoordinateData>,
}

pub fn build_geocode_variables(place: &str) -> serde_json::Value {
    serde_json::json!({ "place": place.trim() })
}

/// Resolve a place name through the server's cached geocoder. Every failure is `None`.
pub async fn geocode(place: &str) -> Option<Coordinate> {
    let resp: Result<GeocodeResponse, String> = query(
        r#"query Geocode($place: String!) { geocode(place: $place) { lat lng } }"#,
        Some(build_geocode_variables(place)),
    )
    .await;
    match resp {
        Ok(r) => r.geocode.map(Coordinate::from),
        Err(err) => {
            tracing::debug!(%place, %err, "geocode request failed");
            None
        }
    }
}
