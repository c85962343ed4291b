//! Map camera control.
//!
//! The controller turns filter/location changes into at most one camera action
//! per change cycle, in fixed priority order:
//!
//! 1. the user location changed: fly to it;
//! 2. the marker set changed (and no user location is active): fit the markers;
//! 3. no markers and a new city was searched: geocode the city and fly there.
//!
//! It never talks to the map widget itself. Hosts apply the returned
//! [`CameraCommand`]s and run the geocode lookups, feeding results back through
//! [`MapViewController::geocode_resolved`].

use serde::{Deserialize, Serialize};

use crate::calc::LatLngBounds;
use crate::geocode::normalize_place;
use crate::models::{Coordinate, MapMarker};

const METERS_PER_MILE: f64 = 1609.344;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraSettings {
    /// Wide view used when there is nothing to show.
    pub default_center: Coordinate,
    pub default_zoom: f64,
    /// Zoom for a single point: one marker, the user, or a geocoded city.
    pub close_zoom: f64,
    pub fit_padding_px: f64,
    /// Ceiling for fit-to-bounds so tight clusters do not over-zoom.
    pub max_fit_zoom: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        CameraSettings {
            // Geographic center of the contiguous United States.
            default_center: Coordinate::new(39.8283, -98.5795),
            default_zoom: 4.0,
            close_zoom: 13.0,
            fit_padding_px: 48.0,
            max_fit_zoom: 14.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraTarget {
    Point { center: Coordinate, zoom: f64 },
    Bounds {
        bounds: LatLngBounds,
        padding_px: f64,
        max_zoom: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraCommand {
    pub target: CameraTarget,
    /// `false` only for the initial placement on mount.
    pub animate: bool,
}

impl CameraCommand {
    pub fn fly_to(center: Coordinate, zoom: f64) -> Self {
        CameraCommand {
            target: CameraTarget::Point { center, zoom },
            animate: true,
        }
    }
}

/// What the controller wants done after a change cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraAction {
    Move(CameraCommand),
    /// Look up this place name; report back via `geocode_resolved`.
    Geocode(String),
}

/// Order-independent identity of a marker set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MarkerSetKey(Vec<String>);

impl MarkerSetKey {
    pub fn from_markers(markers: &[MapMarker]) -> Self {
        let mut ids: Vec<String> = markers.iter().map(|m| m.id.clone()).collect();
        ids.sort_unstable();
        ids.dedup();
        MarkerSetKey(ids)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Circle drawn around the user location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusCircle {
    pub center: Coordinate,
    pub radius_miles: f64,
}

impl RadiusCircle {
    pub fn radius_meters(&self) -> f64 {
        self.radius_miles * METERS_PER_MILE
    }
}

pub fn radius_overlay(user_location: Option<Coordinate>, radius_miles: f64) -> Option<RadiusCircle> {
    user_location.map(|center| RadiusCircle {
        center,
        radius_miles,
    })
}

/// Everything the controller looks at in one change cycle.
#[derive(Debug, Clone, Copy)]
pub struct CameraInputs<'a> {
    pub user_location: Option<Coordinate>,
    pub markers: &'a [MapMarker],
    pub city: Option<&'a str>,
}

fn fallback_place(city: Option<&str>) -> Option<String> {
    city.map(normalize_place).filter(|c| !c.is_empty())
}

#[derive(Debug, Clone)]
pub struct MapViewController {
    settings: CameraSettings,
    last_user: Option<Coordinate>,
    last_key: MarkerSetKey,
    /// City (normalized) the fallback last fired for. Cleared once markers reappear.
    last_fallback_city: Option<String>,
}

impl MapViewController {
    /// Record the initial state without animating and return where the map starts.
    pub fn mount(settings: CameraSettings, inputs: CameraInputs<'_>) -> (Self, CameraCommand) {
        let initial = match inputs.user_location {
            Some(user) => CameraTarget::Point {
                center: user,
                zoom: settings.close_zoom,
            },
            None => Self::frame_markers(&settings, inputs.markers).unwrap_or(CameraTarget::Point {
                center: settings.default_center,
                zoom: settings.default_zoom,
            }),
        };
        let controller = MapViewController {
            settings,
            last_user: inputs.user_location,
            last_key: MarkerSetKey::from_markers(inputs.markers),
            last_fallback_city: None,
        };
        (
            controller,
            CameraCommand {
                target: initial,
                animate: false,
            },
        )
    }

    fn frame_markers(settings: &CameraSettings, markers: &[MapMarker]) -> Option<CameraTarget> {
        match markers {
            [] => None,
            [only] => Some(CameraTarget::Point {
                center: only.coordinate(),
                zoom: settings.close_zoom,
            }),
            many => LatLngBounds::from_coordinates(many.iter().map(MapMarker::coordinate)).map(
                |bounds| CameraTarget::Bounds {
                    bounds,
                    padding_px: settings.fit_padding_px,
                    max_zoom: settings.max_fit_zoom,
                },
            ),
        }
    }

    /// Run one change cycle. At most one action comes back.
    pub fn on_change(&mut self, inputs: CameraInputs<'_>) -> Option<CameraAction> {
        let key = MarkerSetKey::from_markers(inputs.markers);
        let user_changed = inputs.user_location != self.last_user;
        let key_changed = key != self.last_key;
        let user_cleared = user_changed && inputs.user_location.is_none();

        self.last_user = inputs.user_location;
        self.last_key = key;
        if !inputs.markers.is_empty() {
            self.last_fallback_city = None;
        }

        if let (true, Some(user)) = (user_changed, inputs.user_location) {
            tracing::debug!(lat = user.lat, lng = user.lng, "camera: fly to user location");
            return Some(CameraAction::Move(CameraCommand::fly_to(
                user,
                self.settings.close_zoom,
            )));
        }
        if inputs.user_location.is_some() {
            return None;
        }

        if key_changed || user_cleared {
            if let Some(target) = Self::frame_markers(&self.settings, inputs.markers) {
                tracing::debug!(markers = inputs.markers.len(), "camera: fit markers");
                return Some(CameraAction::Move(CameraCommand {
                    target,
                    animate: true,
                }));
            }
        }

        if inputs.markers.is_empty() {
            let city = fallback_place(inputs.city)?;
            if self.last_fallback_city.as_deref() == Some(city.as_str()) {
                return None;
            }
            self.last_fallback_city = Some(city);
            let place = inputs.city.map(str::trim).unwrap_or_default().to_string();
            tracing::debug!(%place, "camera: no markers, geocoding city");
            return Some(CameraAction::Geocode(place));
        }

        None
    }

    /// Apply a finished lookup. Responses are applied even if filters moved on
    /// meanwhile; a miss leaves the camera where it is.
    pub fn geocode_resolved(&self, place: &str, found: Option<Coordinate>) -> Option<CameraCommand> {
        match found {
            Some(center) => Some(CameraCommand::fly_to(center, self.settings.close_zoom)),
            None => {
                tracing::debug!(%place, "camera: geocode fallback found nothing");
                None
            }
        }
    }
}
