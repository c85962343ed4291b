//! Event-driven discovery store.
//!
//! `DiscoveryEngine` owns the listing set, the filter state, hover, favorites
//! and the camera controller. Every setter recomputes what it has to and
//! returns the [`Effect`]s the host must carry out (camera moves, geocode
//! lookups, scrolling, URL updates). The engine itself does no I/O apart from
//! the synchronous favorite store.

use crate::camera::{
    radius_overlay, CameraAction, CameraCommand, CameraInputs, MapViewController, RadiusCircle,
};
use crate::config::DiscoveryConfig;
use crate::error::GeolocationError;
use crate::favorites::{FavoriteSet, FavoriteStore};
use crate::filter::{
    empty_state_hint, filter, result_summary, FilterOutcome, FilterState, PRICE_SLIDER_MAX_DOLLARS,
};
use crate::models::{Coordinate, Listing, MapMarker, SpaceType};
use crate::query::QueryParams;
use crate::sync::{row_element_id, HoverSource, HoverState, MarkerStyle};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Move the map camera.
    Camera(CameraCommand),
    /// Resolve `place` and report back through `geocode_resolved`.
    Geocode { place: String },
    /// Smoothly scroll the row with this DOM id to the nearest edge.
    ScrollIntoView(String),
    /// Replace the current URL's query string (no history entry).
    ReflectUrl(String),
}

/// State of the "Near me" button.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LocateStatus {
    #[default]
    Idle,
    Locating,
    Located,
    Failed(GeolocationError),
}

impl LocateStatus {
    pub fn button_label(&self) -> &'static str {
        match self {
            LocateStatus::Locating => "Locating…",
            LocateStatus::Located => "Update location",
            LocateStatus::Idle | LocateStatus::Failed(_) => "Near me",
        }
    }

    pub fn error_message(&self) -> Option<String> {
        match self {
            LocateStatus::Failed(err) => Some(err.to_string()),
            _ => None,
        }
    }
}

pub struct DiscoveryEngine {
    config: DiscoveryConfig,
    listings: Vec<Listing>,
    revision: u64,
    state: FilterState,
    /// Inputs the current outcome was computed from.
    computed_for: (u64, FilterState),
    outcome: FilterOutcome,
    camera: MapViewController,
    initial_view: CameraCommand,
    hover: HoverState,
    favorites: FavoriteSet,
    store: Box<dyn FavoriteStore>,
    locate: LocateStatus,
    reflected_query: String,
}

impl DiscoveryEngine {
    pub fn new(
        config: DiscoveryConfig,
        listings: Vec<Listing>,
        initial: FilterState,
        store: Box<dyn FavoriteStore>,
    ) -> Self {
        let outcome = filter(&listings, &initial);
        let (camera, initial_view) = MapViewController::mount(
            config.camera,
            CameraInputs {
                user_location: initial.user_location,
                markers: &outcome.markers,
                city: initial.city_term(),
            },
        );
        let favorites = FavoriteSet::load(store.as_ref());
        let reflected_query = QueryParams::from_state(&initial).to_query_string();
        tracing::debug!(
            listings = listings.len(),
            shown = outcome.listings.len(),
            favorites = favorites.len(),
            "discovery engine mounted"
        );
        DiscoveryEngine {
            config,
            listings,
            revision: 0,
            computed_for: (0, initial.clone()),
            state: initial,
            outcome,
            camera,
            initial_view,
            hover: HoverState::default(),
            favorites,
            store,
            locate: LocateStatus::Idle,
            reflected_query,
        }
    }

    /// Engine seeded from a location search string such as `?type=Vehicle`.
    pub fn from_query(
        config: DiscoveryConfig,
        listings: Vec<Listing>,
        search: &str,
        store: Box<dyn FavoriteStore>,
    ) -> Self {
        let mut initial = QueryParams::parse(search).to_state();
        initial.radius_miles = config.default_radius_miles as f64;
        Self::new(config, listings, initial, store)
    }

    // Accessors

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Where the map starts. Applied without animation.
    /// Effects for a freshly mounted map: the initial view, then the city
    /// fallback when a seeded city has no markers.
    pub fn start(&mut self) -> Vec<Effect> {
        let mut effects = vec![Effect::Camera(self.initial_view)];
        effects.extend(self.refresh());
        effects
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn listings(&self) -> &[Listing] {
        &self.outcome.listings
    }

    pub fn markers(&self) -> &[MapMarker] {
        &self.outcome.markers
    }

    pub fn summary(&self) -> String {
        result_summary(self.outcome.listings.len(), &self.state)
    }

    /// Empty-state copy, or `None` while there are results.
    pub fn empty_hint(&self) -> Option<&'static str> {
        self.outcome.is_empty().then(|| empty_state_hint(&self.state))
    }

    pub fn radius_circle(&self) -> Option<RadiusCircle> {
        radius_overlay(self.state.user_location, self.state.radius_miles)
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hover.hovered()
    }

    pub fn marker_style(&self, id: &str) -> MarkerStyle {
        self.hover.style_for(id)
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    pub fn locate_status(&self) -> &LocateStatus {
        &self.locate
    }

    // Listing source

    pub fn set_listings(&mut self, listings: Vec<Listing>) -> Vec<Effect> {
        self.listings = listings;
        self.revision += 1;
        self.refresh()
    }

    // Filter inputs

    /// Set both price handles. Values are clamped to the slider and kept ordered.
    pub fn set_price_range(&mut self, floor: u32, ceiling: u32) -> Vec<Effect> {
        let ceiling = ceiling.min(PRICE_SLIDER_MAX_DOLLARS);
        let floor = floor.min(ceiling);
        self.update(|s| {
            s.price_floor = floor;
            s.price_ceiling = ceiling;
        })
    }

    pub fn set_space_type(&mut self, space_type: Option<SpaceType>) -> Vec<Effect> {
        self.update(|s| s.space_type = space_type)
    }

    pub fn set_city(&mut self, city: Option<String>) -> Vec<Effect> {
        self.update(|s| s.city = city)
    }

    pub fn set_query(&mut self, query: Option<String>) -> Vec<Effect> {
        self.update(|s| s.query = query)
    }

    /// Change the proximity radius. Non-positive values are ignored.
    pub fn set_radius(&mut self, miles: f64) -> Vec<Effect> {
        if !miles.is_finite() || miles <= 0.0 {
            return Vec::new();
        }
        if !self.config.is_radius_option(miles) {
            tracing::debug!(miles, "radius outside presets");
        }
        self.update(|s| s.radius_miles = miles)
    }

    // Geolocation

    pub fn begin_locating(&mut self) {
        self.locate = LocateStatus::Locating;
    }

    /// A fresh fix always recenters, even when it matches the previous one.
    pub fn location_found(&mut self, coordinate: Coordinate) -> Vec<Effect> {
        self.locate = LocateStatus::Located;
        if self.state.user_location == Some(coordinate) {
            return vec![Effect::Camera(CameraCommand::fly_to(
                coordinate,
                self.config.camera.close_zoom,
            ))];
        }
        self.update(|s| s.user_location = Some(coordinate))
    }

    /// A failed request reverts to no user location and keeps the message.
    pub fn location_failed(&mut self, err: GeolocationError) -> Vec<Effect> {
        tracing::debug!(%err, "geolocation failed");
        self.locate = LocateStatus::Failed(err);
        self.update(|s| s.user_location = None)
    }

    /// "Clear location filter": drops the user location and any error.
    pub fn clear_location(&mut self) -> Vec<Effect> {
        self.locate = LocateStatus::Idle;
        self.update(|s| s.user_location = None)
    }

    // Hover and favorites

    pub fn hover_row(&mut self, id: &str) {
        self.hover.enter(id, HoverSource::List);
    }

    pub fn hover_marker(&mut self, id: &str) -> Vec<Effect> {
        self.hover
            .enter(id, HoverSource::Marker)
            .map(|row| Effect::ScrollIntoView(row_element_id(&row)))
            .into_iter()
            .collect()
    }

    pub fn leave_hover(&mut self) {
        self.hover.leave();
    }

    /// Flip a favorite and persist the whole set. Returns the new membership.
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        let now = self.favorites.toggle(id);
        if let Err(err) = self.favorites.save(self.store.as_ref()) {
            tracing::debug!(%err, "favorites not persisted");
        }
        now
    }

    // Geocode fallback

    pub fn geocode_resolved(&mut self, place: &str, found: Option<Coordinate>) -> Vec<Effect> {
        self.camera
            .geocode_resolved(place, found)
            .map(Effect::Camera)
            .into_iter()
            .collect()
    }

    fn update(&mut self, apply: impl FnOnce(&mut FilterState)) -> Vec<Effect> {
        let before = self.state.clone();
        apply(&mut self.state);
        if self.state == before {
            return Vec::new();
        }
        self.refresh()
    }

    /// Recompute the outcome if its inputs moved, then run the camera and URL reflection.
    fn refresh(&mut self) -> Vec<Effect> {
        let key = (self.revision, self.state.clone());
        if self.computed_for != key {
            self.outcome = filter(&self.listings, &self.state);
            self.computed_for = key;
        }

        let mut effects = Vec::new();
        let action = self.camera.on_change(CameraInputs {
            user_location: self.state.user_location,
            markers: &self.outcome.markers,
            city: self.state.city_term(),
        });
        match action {
            Some(CameraAction::Move(cmd)) => effects.push(Effect::Camera(cmd)),
            Some(CameraAction::Geocode(place)) => effects.push(Effect::Geocode { place }),
            None => {}
        }

        let query = QueryParams::from_state(&self.state).to_query_string();
        if query != self.reflected_query {
            self.reflected_query = query.clone();
            effects.push(Effect::ReflectUrl(query));
        }
        effects
    }
}
