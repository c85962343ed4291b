use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use spotlight_shared::camera::CameraCommand;
use spotlight_shared::config::DiscoveryConfig;
use spotlight_shared::engine::{DiscoveryEngine, Effect};
use spotlight_shared::mock::demo_listings;
use spotlight_shared::models::{Listing, SpaceType};

use crate::api;
use crate::browser::{self, LocalFavoriteStore};
use crate::components::filter_panel::FilterPanel;
use crate::components::listing_card::ListingCard;
use crate::components::map_view::{map_size, MapCamera, MapView};
use crate::viewport::{self, CameraTween};

/// Tween step. Roughly one animation frame.
const FRAME_MS: u32 = 16;

#[component]
pub fn Explorer() -> Element {
    let listings = use_resource(|| async {
        match api::fetch_listings().await {
            Ok(listings) => listings,
            Err(err) => {
                tracing::warn!(%err, "listing fetch failed, showing demo listings");
                demo_listings()
            }
        }
    });

    let element = match &*listings.read() {
        Some(listings) => rsx! {
            Discovery { listings: listings.clone() }
        },
        None => rsx! {
            div { class: "app loading", "Loading spaces..." }
        },
    };
    element
}

/// Signals the effect runner needs. All of them are `Copy`.
#[derive(Clone, Copy)]
struct Host {
    engine: Signal<DiscoveryEngine>,
    camera: Signal<MapCamera>,
    /// Bumped on every camera command and manual move; stale tweens stop.
    flight: Signal<u64>,
}

impl Host {
    /// Run an engine mutation, then carry out whatever it asked for.
    fn update(self, change: impl FnOnce(&mut DiscoveryEngine) -> Vec<Effect>) {
        let mut engine = self.engine;
        let effects = change(&mut engine.write());
        self.dispatch(effects);
    }

    fn dispatch(self, effects: Vec<Effect>) {
        for effect in effects {
            tracing::trace!(?effect, "effect");
            match effect {
                Effect::Camera(command) => self.move_camera(command),
                Effect::Geocode { place } => self.geocode(place),
                Effect::ScrollIntoView(element_id) => browser::scroll_into_view(&element_id),
                Effect::ReflectUrl(query) => browser::replace_query(&query),
            }
        }
    }

    fn cancel_flight(self) -> u64 {
        let mut flight = self.flight;
        let mut generation = flight.write();
        *generation += 1;
        *generation
    }

    fn move_camera(self, command: CameraCommand) {
        let (width, height) = map_size();
        let to = viewport::resolve_target(&command.target, width, height);
        let generation = self.cancel_flight();
        let mut camera = self.camera;

        if !command.animate {
            camera.set(MapCamera { center: to.0, zoom: to.1 });
            return;
        }

        let from = {
            let current = camera.peek();
            (current.center, current.zoom)
        };
        let tween = CameraTween::new(from, to);
        let flight = self.flight;
        spawn(async move {
            let mut elapsed = 0.0;
            loop {
                TimeoutFuture::new(FRAME_MS).await;
                if *flight.peek() != generation {
                    return;
                }
                elapsed += FRAME_MS as f64;
                let (center, zoom) = tween.at(elapsed);
                camera.set(MapCamera { center, zoom });
                if tween.is_done(elapsed) {
                    return;
                }
            }
        });
    }

    fn geocode(self, place: String) {
        spawn(async move {
            let found = api::geocode(&place).await;
            tracing::debug!(%place, found = found.is_some(), "geocode fallback resolved");
            self.update(|engine| engine.geocode_resolved(&place, found));
        });
    }

    fn locate(self) {
        let mut engine = self.engine;
        engine.write().begin_locating();
        spawn(async move {
            let result = browser::current_position().await;
            self.update(|engine| match result {
                Ok(coordinate) => engine.location_found(coordinate),
                Err(err) => engine.location_failed(err),
            });
        });
    }

    /// Refetch the listing source; the engine refilters against the new revision.
    fn reload(self) {
        spawn(async move {
            match api::fetch_listings().await {
                Ok(listings) => {
                    self.update(|engine| engine.set_listings(listings));
                    tracing::debug!(revision = self.engine.peek().revision(), "listings reloaded");
                }
                Err(err) => tracing::warn!(%err, "listing reload failed"),
            }
        });
    }

    fn hover_row(self, id: &str) {
        let mut engine = self.engine;
        engine.write().hover_row(id);
    }

    fn leave_hover(self) {
        let mut engine = self.engine;
        engine.write().leave_hover();
    }

    fn toggle_favorite(self, id: &str) {
        let mut engine = self.engine;
        let now = engine.write().toggle_favorite(id);
        tracing::debug!(%id, favorite = now, "favorite toggled");
    }
}

#[component]
fn Discovery(listings: Vec<Listing>) -> Element {
    let engine = use_signal(|| {
        DiscoveryEngine::from_query(
            DiscoveryConfig::default(),
            listings,
            &browser::location_search(),
            Box::new(LocalFavoriteStore),
        )
    });
    let camera = use_signal(|| {
        let settings = engine.peek().config().camera;
        MapCamera {
            center: settings.default_center,
            zoom: settings.default_zoom,
        }
    });
    let flight = use_signal(|| 0u64);
    let host = Host { engine, camera, flight };

    // Initial framing once the map container has a size. Runs once: it only
    // writes to the engine.
    use_effect(move || host.update(DiscoveryEngine::start));

    let view = engine.read();
    let state = view.state().clone();
    let locate = view.locate_status().clone();
    let radius_options = view.config().radius_options.clone();
    let price_step = view.config().price_slider_step_dollars;
    let shown: Vec<Listing> = view.listings().to_vec();
    let markers: Vec<_> = view
        .markers()
        .iter()
        .map(|m| (m.clone(), view.marker_style(&m.id)))
        .collect();
    let hovered = view.hovered().map(str::to_string);
    let radius = view.radius_circle();
    let summary = view.summary();
    let empty_hint = view.empty_hint();
    let favorites: Vec<bool> = shown.iter().map(|l| view.is_favorite(&l.id)).collect();
    drop(view);

    rsx! {
        div { class: "app",
            header { class: "header",
                h1 { a { href: "/spaces", "SpotLight" } }
                div { class: "header-actions",
                    span { class: "summary", "{summary}" }
                    button { class: "secondary", onclick: move |_| host.reload(), "Refresh" }
                }
            }

            FilterPanel {
                state,
                locate,
                radius_options,
                price_step,
                on_query: move |q: Option<String>| host.update(|e| e.set_query(q)),
                on_city: move |city: Option<String>| host.update(|e| e.set_city(city)),
                on_type: move |t: Option<SpaceType>| host.update(|e| e.set_space_type(t)),
                on_price: move |(floor, ceiling): (u32, u32)| host.update(|e| e.set_price_range(floor, ceiling)),
                on_locate: move |_| host.locate(),
                on_radius: move |miles: u32| host.update(|e| e.set_radius(miles as f64)),
                on_clear_location: move |_| host.update(|e| e.clear_location()),
            }

            section { class: "results",
                if let Some(hint) = empty_hint {
                    div { class: "empty-state",
                        h3 { "No listings found" }
                        p { "{hint}" }
                    }
                }
                for (listing, favorite) in shown.into_iter().zip(favorites) {
                    ListingCard {
                        key: "{listing.id}",
                        highlighted: hovered.as_deref() == Some(listing.id.as_str()),
                        favorite,
                        listing,
                        on_enter: move |id: String| host.hover_row(&id),
                        on_leave: move |_| host.leave_hover(),
                        on_toggle_favorite: move |id: String| host.toggle_favorite(&id),
                    }
                }
            }

            div { class: "map-area",
                MapView {
                    markers,
                    radius,
                    camera,
                    on_marker_enter: move |id: String| host.update(|e| e.hover_marker(&id)),
                    on_marker_leave: move |_| host.leave_hover(),
                    on_user_move: move |_| {
                        host.cancel_flight();
                    },
                }
            }
        }
    }
}
