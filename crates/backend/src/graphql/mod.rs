use std::sync::Arc;

use async_graphql::{Context, EmptyMutation, EmptySubscription, Enum, Object, SimpleObject, ID};
use spotlight_shared::{
    filter::RADIUS_OPTIONS,
    geocode::Geocoder,
    models::{self, ListingStatus, SpaceType},
};

use crate::catalog::{Catalog, ListingQuery};
use crate::storage::Storage;

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum GqlSpaceType {
    Billboard,
    Vehicle,
    Indoor,
    Outdoor,
    Digital,
    Event,
    Other,
}

impl From<SpaceType> for GqlSpaceType {
    fn from(t: SpaceType) -> Self {
        match t {
            SpaceType::Billboard => GqlSpaceType::Billboard,
            SpaceType::Vehicle => GqlSpaceType::Vehicle,
            SpaceType::Indoor => GqlSpaceType::Indoor,
            SpaceType::Outdoor => GqlSpaceType::Outdoor,
            SpaceType::Digital => GqlSpaceType::Digital,
            SpaceType::Event => GqlSpaceType::Event,
            SpaceType::Other => GqlSpaceType::Other,
        }
    }
}

impl From<GqlSpaceType> for SpaceType {
    fn from(t: GqlSpaceType) -> Self {
        match t {
            GqlSpaceType::Billboard => SpaceType::Billboard,
            GqlSpaceType::Vehicle => SpaceType::Vehicle,
            GqlSpaceType::Indoor => SpaceType::Indoor,
            GqlSpaceType::Outdoor => SpaceType::Outdoor,
            GqlSpaceType::Digital => SpaceType::Digital,
            GqlSpaceType::Event => SpaceType::Event,
            GqlSpaceType::Other => SpaceType::Other,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum GqlListingStatus {
    Draft,
    Published,
    Archived,
}

impl From<ListingStatus> for GqlListingStatus {
    fn from(s: ListingStatus) -> Self {
        match s {
            ListingStatus::Draft => GqlListingStatus::Draft,
            ListingStatus::Published => GqlListingStatus::Published,
            ListingStatus::Archived => GqlListingStatus::Archived,
        }
    }
}

// GraphQL output types

#[derive(SimpleObject, Clone, Copy)]
pub struct GqlCoordinate {
    pub lat: f64,
    pub lng: f64,
}

impl From<models::Coordinate> for GqlCoordinate {
    fn from(c: models::Coordinate) -> Self {
        GqlCoordinate { lat: c.lat, lng: c.lng }
    }
}

#[derive(SimpleObject)]
pub struct GqlListing {
    pub id: ID,
    pub title: String,
    pub space_type: GqlSpaceType,
    /// Monthly price in cents.
    pub price_cents: i64,
    pub city: Option<String>,
    pub address: Option<String>,
    pub coordinate: Option<GqlCoordinate>,
    pub description: String,
    pub image_url: Option<String>,
    pub status: GqlListingStatus,
    pub created_at: String,
}

impl From<models::Listing> for GqlListing {
    fn from(l: models::Listing) -> Self {
        GqlListing {
            id: ID(l.id),
            title: l.title,
            space_type: l.space_type.into(),
            price_cents: l.price_cents,
            city: l.city,
            address: l.address,
            coordinate: l.coordinate.map(GqlCoordinate::from),
            description: l.description,
            image_url: l.image_url,
            status: l.status.into(),
            created_at: l.created_at,
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlMarker {
    pub id: ID,
    pub title: String,
    pub space_type: GqlSpaceType,
    pub price_cents: i64,
    pub city: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

impl From<models::MapMarker> for GqlMarker {
    fn from(m: models::MapMarker) -> Self {
        GqlMarker {
            id: ID(m.id),
            title: m.title,
            space_type: m.space_type.into(),
            price_cents: m.price_cents,
            city: m.city,
            lat: m.lat,
            lng: m.lng,
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlStats {
    pub listings: u64,
    pub cached_places: u64,
    pub db_size_bytes: u64,
}

fn listing_query(q: Option<String>, space_type: Option<GqlSpaceType>, city: Option<String>) -> ListingQuery {
    ListingQuery {
        q,
        space_type: space_type.map(SpaceType::from),
        city,
    }
}

// Query root

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Published listings, newest first.
    async fn listings(
        &self,
        ctx: &Context<'_>,
        q: Option<String>,
        #[graphql(name = "type")] space_type: Option<GqlSpaceType>,
        city: Option<String>,
    ) -> async_graphql::Result<Vec<GqlListing>> {
        let catalog = ctx.data::<Arc<Catalog>>()?;
        Ok(catalog
            .search(&listing_query(q, space_type, city))
            .into_iter()
            .map(GqlListing::from)
            .collect())
    }

    async fn listing(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Option<GqlListing>> {
        let catalog = ctx.data::<Arc<Catalog>>()?;
        Ok(catalog.find(&id).cloned().map(GqlListing::from))
    }

    async fn markers(
        &self,
        ctx: &Context<'_>,
        q: Option<String>,
        #[graphql(name = "type")] space_type: Option<GqlSpaceType>,
        city: Option<String>,
    ) -> async_graphql::Result<Vec<GqlMarker>> {
        let catalog = ctx.data::<Arc<Catalog>>()?;
        Ok(catalog
            .markers(&listing_query(q, space_type, city))
            .into_iter()
            .map(GqlMarker::from)
            .collect())
    }

    /// Coordinate for a free-text place, or null when nothing matched.
    async fn geocode(&self, ctx: &Context<'_>, place: String) -> async_graphql::Result<Option<GqlCoordinate>> {
        if place.trim().is_empty() {
            return Ok(None);
        }
        let geocoder = ctx.data::<Arc<dyn Geocoder>>()?;
        Ok(geocoder.resolve(&place).await.map(GqlCoordinate::from))
    }

    /// Types offered as filter choices.
    async fn space_types(&self) -> Vec<String> {
        SpaceType::FILTERABLE
            .iter()
            .map(|t| t.as_str().to_string())
            .collect()
    }

    async fn radius_options(&self) -> Vec<i32> {
        RADIUS_OPTIONS.iter().map(|&r| r as i32).collect()
    }

    async fn stats(&self, ctx: &Context<'_>) -> async_graphql::Result<GqlStats> {
        let catalog = ctx.data::<Arc<Catalog>>()?;
        let storage = ctx.data::<Arc<Storage>>()?;
        let cached_places = storage.count_geocodes()?;
        let db_size_bytes = storage.db_size_bytes()?;
        Ok(GqlStats {
            listings: catalog.search(&ListingQuery::default()).len() as u64,
            cached_places,
            db_size_bytes,
        })
    }
}

pub type Schema = async_graphql::Schema<QueryRoot, EmptyMutation, EmptySubscription>;

pub fn build_schema(catalog: Arc<Catalog>, storage: Arc<Storage>, geocoder: Arc<dyn Geocoder>) -> Schema {
    async_graphql::Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(catalog)
        .data(storage)
        .data(geocoder)
        .finish()
}
