use spotlight_shared::mock::demo_listings;
use spotlight_shared::models::{Listing, ListingStatus, MapMarker, SpaceType};
use std::path::Path;

/// Server-side listing filters. Price and proximity are left to the client engine.
#[derive(Debug, Clone, Default)]
pub struct ListingQuery {
    pub q: Option<String>,
    pub space_type: Option<SpaceType>,
    pub city: Option<String>,
}

pub struct Catalog {
    listings: Vec<Listing>,
}

impl Catalog {
    pub fn load(assets_dir: &Path) -> Result<Self, String> {
        let listings_path = assets_dir.join("listings.json");
        let data = std::fs::read_to_string(&listings_path)
            .map_err(|e| format!("Failed to read {}: {}", listings_path.display(), e))?;
        let listings: Vec<Listing> = serde_json::from_str(&data)
            .map_err(|e| format!("Failed to parse listings.json: {}", e))?;

        tracing::info!(listings = listings.len(), "Loaded listing catalog");
        Ok(Catalog { listings })
    }

    /// Load the catalog, or fall back to the demo listings when it is unavailable.
    pub fn load_or_demo(assets_dir: &Path) -> Self {
        Self::load(assets_dir).unwrap_or_else(|err| {
            tracing::warn!(%err, "listing source unavailable, serving demo listings");
            Catalog::new(demo_listings())
        })
    }

    pub fn new(listings: Vec<Listing>) -> Self {
        Catalog { listings }
    }

    /// Published listings matching `query`, newest first.
    pub fn search(&self, query: &ListingQuery) -> Vec<Listing> {
        let q = non_blank_lower(query.q.as_deref());
        let city = non_blank_lower(query.city.as_deref());

        let mut found: Vec<Listing> = self
            .listings
            .iter()
            .filter(|l| l.status == ListingStatus::Published)
            .filter(|l| query.space_type.map_or(true, |t| l.space_type == t))
            .filter(|l| match &q {
                Some(q) => {
                    l.title.to_lowercase().contains(q) || l.description.to_lowercase().contains(q)
                }
                None => true,
            })
            .filter(|l| match &city {
                Some(city) => l
                    .city
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase().contains(city)),
                None => true,
            })
            .cloned()
            .collect();
        // RFC 3339 timestamps sort lexically.
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        found
    }

    pub fn markers(&self, query: &ListingQuery) -> Vec<MapMarker> {
        self.search(query)
            .iter()
            .filter_map(Listing::to_marker)
            .collect()
    }

    /// Any status; a direct link to a draft still resolves.
    pub fn find(&self, id: &str) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }
}

fn non_blank_lower(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}
