use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use spotlight_shared::camera::RadiusCircle;
use spotlight_shared::models::{format_price, Coordinate, MapMarker};
use spotlight_shared::sync::MarkerStyle;

use crate::browser;
use crate::viewport::{self, Viewport};

pub const MAP_CONTAINER_ID: &str = "spotlight-map-container";

/// Size used before the container has been measured.
pub const FALLBACK_MAP_SIZE: (f64, f64) = (800.0, 600.0);

/// Drag threshold in pixels. Movement below this is treated as a click.
const DRAG_THRESHOLD: f64 = 3.0;

/// Zoom levels per wheel notch.
const WHEEL_ZOOM_STEP: f64 = 0.5;

/// Where the map camera currently sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapCamera {
    pub center: Coordinate,
    pub zoom: f64,
}

impl MapCamera {
    pub fn viewport(&self, (width, height): (f64, f64)) -> Viewport {
        Viewport {
            center: self.center,
            zoom: self.zoom,
            width,
            height,
        }
    }
}

/// Measured container size, or the fallback before first layout.
pub fn map_size() -> (f64, f64) {
    browser::element_size(MAP_CONTAINER_ID).unwrap_or(FALLBACK_MAP_SIZE)
}

// ---------------------------------------------------------------------------
// Pure helpers
// ---------------------------------------------------------------------------

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

fn wheel_zoom(current: f64, delta_y: f64) -> f64 {
    if delta_y < 0.0 {
        viewport::clamp_zoom(current + WHEEL_ZOOM_STEP)
    } else if delta_y > 0.0 {
        viewport::clamp_zoom(current - WHEEL_ZOOM_STEP)
    } else {
        current
    }
}

/// SVG overlay for the proximity circle, sized from ground resolution.
fn radius_svg(circle: &RadiusCircle, view: &Viewport) -> String {
    let (cx, cy) = view.to_screen(circle.center);
    let r = circle.radius_meters() / view.meters_per_pixel();
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" style="position:absolute;top:0;left:0;pointer-events:none;z-index:2;"><circle cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}" fill="rgba(37,99,235,0.08)" stroke="#2563eb" stroke-width="2" stroke-dasharray="6 4"/><circle cx="{cx:.1}" cy="{cy:.1}" r="6" fill="#2563eb" stroke="white" stroke-width="2"/></svg>"##,
        w = view.width,
        h = view.height,
    )
}

fn marker_dot_style(style: MarkerStyle, x: f64, y: f64) -> String {
    let r = style.radius_px();
    format!(
        "left:{:.1}px;top:{:.1}px;width:{d}px;height:{d}px;background:{};opacity:{};z-index:{};",
        x - r,
        y - r,
        style.fill(),
        style.fill_opacity(),
        style.z_index(),
        d = r * 2.0,
    )
}

/// New container size when it moved by at least a pixel from `current`.
fn remeasure(current: (f64, f64), measured: Option<(f64, f64)>) -> Option<(f64, f64)> {
    let (width, height) = measured?;
    ((width - current.0).abs() >= 1.0 || (height - current.1).abs() >= 1.0).then_some((width, height))
}

struct Popup {
    title: String,
    subtitle: String,
    price: String,
    style: String,
}

fn popup_price(marker: &MapMarker) -> String {
    format!("{}/mo", format_price(marker.price_cents))
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

#[component]
pub fn MapView(
    markers: Vec<(MapMarker, MarkerStyle)>,
    radius: Option<RadiusCircle>,
    camera: Signal<MapCamera>,
    on_marker_enter: EventHandler<String>,
    on_marker_leave: EventHandler<()>,
    // Manual pan or zoom; running camera tweens stop.
    on_user_move: EventHandler<()>,
) -> Element {
    let mut size = use_signal(|| FALLBACK_MAP_SIZE);
    let mut drag_origin = use_signal(|| None::<(f64, f64)>);
    let mut did_drag = use_signal(|| false);

    let view = camera.read().viewport(*size.read());
    let tiles = view.tiles();
    let overlay = radius.as_ref().map(|c| radius_svg(c, &view));

    let placed: Vec<(MapMarker, MarkerStyle, f64, f64)> = markers
        .iter()
        .map(|(m, style)| {
            let (x, y) = view.to_screen(m.coordinate());
            (m.clone(), *style, x, y)
        })
        .filter(|(_, _, x, y)| *x > -50.0 && *y > -50.0 && *x < view.width + 50.0 && *y < view.height + 50.0)
        .collect();
    let popup = placed
        .iter()
        .find(|(_, style, _, _)| *style == MarkerStyle::Highlighted)
        .map(|(marker, _, x, y)| Popup {
            title: marker.title.clone(),
            subtitle: marker.subtitle(),
            price: popup_price(marker),
            style: format!("left:{x:.1}px;top:{:.1}px;", y - 16.0),
        });

    rsx! {
        div {
            id: MAP_CONTAINER_ID,
            class: "map-container",

            onmounted: move |_| {
                let current_size = *size.peek();
                if let Some(measured) = remeasure(current_size, browser::element_size(MAP_CONTAINER_ID)) {
                    size.set(measured);
                }
            },

            onresize: move |_| {
                let current_size = *size.peek();
                if let Some(measured) = remeasure(current_size, browser::element_size(MAP_CONTAINER_ID)) {
                    tracing::trace!(width = measured.0, height = measured.1, "map resized");
                    size.set(measured);
                }
            },

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();
                let current = camera.read().viewport(*size.read());
                let new_zoom = wheel_zoom(current.zoom, wheel_delta_y(evt.data().delta()));
                if (new_zoom - current.zoom).abs() < 1e-9 {
                    return;
                }
                let Some((left, top)) = browser::element_origin(MAP_CONTAINER_ID) else { return };
                let client = evt.data().client_coordinates();
                let zoomed = current.zoomed_at(client.x - left, client.y - top, new_zoom);
                on_user_move.call(());
                camera.set(MapCamera { center: zoomed.center, zoom: zoomed.zoom });
            },

            onmousedown: move |evt: Event<MouseData>| {
                if evt.trigger_button() != Some(MouseButton::Primary) {
                    return;
                }
                let client = evt.client_coordinates();
                drag_origin.set(Some((client.x, client.y)));
                did_drag.set(false);
            },

            onmousemove: move |evt: Event<MouseData>| {
                let Some((last_x, last_y)) = *drag_origin.read() else { return };
                let client = evt.client_coordinates();
                let dx = client.x - last_x;
                let dy = client.y - last_y;
                if !*did_drag.read() && dx.abs() <= DRAG_THRESHOLD && dy.abs() <= DRAG_THRESHOLD {
                    return;
                }
                if !*did_drag.read() {
                    did_drag.set(true);
                    on_user_move.call(());
                }
                let panned = camera.read().viewport(*size.read()).panned(dx, dy);
                camera.set(MapCamera { center: panned.center, zoom: panned.zoom });
                drag_origin.set(Some((client.x, client.y)));
            },

            onmouseup: move |_| drag_origin.set(None),
            onmouseleave: move |_| drag_origin.set(None),

            ondoubleclick: move |evt: Event<MouseData>| {
                evt.prevent_default();
                let Some((left, top)) = browser::element_origin(MAP_CONTAINER_ID) else { return };
                let client = evt.client_coordinates();
                let current = camera.read().viewport(*size.read());
                let zoomed = current.zoomed_at(client.x - left, client.y - top, current.zoom + 1.0);
                on_user_move.call(());
                camera.set(MapCamera { center: zoomed.center, zoom: zoomed.zoom });
            },

            div { class: "map-tiles",
                for tile in tiles {
                    img {
                        key: "{tile.url}-{tile.left}",
                        class: "map-tile",
                        src: "{tile.url}",
                        draggable: "false",
                        style: "left:{tile.left}px;top:{tile.top}px;width:{tile.size}px;height:{tile.size}px;",
                    }
                }
            }

            if let Some(svg) = overlay {
                div { dangerous_inner_html: "{svg}" }
            }

            for (marker, style, x, y) in placed {
                div {
                    key: "{marker.id}",
                    class: "map-marker",
                    role: "img",
                    title: "{marker.title}",
                    style: marker_dot_style(style, x, y),
                    onmouseenter: {
                        let id = marker.id.clone();
                        move |_| on_marker_enter.call(id.clone())
                    },
                    onmouseleave: move |_| on_marker_leave.call(()),
                }
            }

            if let Some(popup) = popup {
                div { class: "map-popup", style: "{popup.style}",
                    strong { "{popup.title}" }
                    span { class: "map-popup-sub", "{popup.subtitle}" }
                    span { class: "map-popup-price", "{popup.price}" }
                }
            }

            div { class: "map-attribution",
                "© "
                a { href: "https://www.openstreetmap.org/copyright", target: "_blank", "OpenStreetMap" }
                " contributors"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spotlight_shared::models::SpaceType;

    fn view() -> Viewport {
        Viewport {
            center: Coordinate::new(41.8827, -87.6233),
            zoom: 11.0,
            width: 800.0,
            height: 600.0,
        }
    }

    #[test]
    fn test_wheel_zoom_direction_and_clamp() {
        assert_eq!(wheel_zoom(10.0, -120.0), 10.5);
        assert_eq!(wheel_zoom(10.0, 120.0), 9.5);
        assert_eq!(wheel_zoom(10.0, 0.0), 10.0);
        assert_eq!(wheel_zoom(viewport::MAX_ZOOM, -1.0), viewport::MAX_ZOOM);
    }

    #[test]
    fn test_radius_svg_is_centered_on_user() {
        let circle = RadiusCircle {
            center: Coordinate::new(41.8827, -87.6233),
            radius_miles: 10.0,
        };
        let svg = radius_svg(&circle, &view());
        assert!(svg.contains(r#"cx="400.0""#));
        assert!(svg.contains(r#"cy="300.0""#));
        assert!(svg.contains("stroke-dasharray"));
    }

    #[test]
    fn test_highlighted_marker_is_larger() {
        let normal = marker_dot_style(MarkerStyle::Normal, 100.0, 100.0);
        let hot = marker_dot_style(MarkerStyle::Highlighted, 100.0, 100.0);
        assert!(normal.contains("width:16px"));
        assert!(hot.contains("width:24px"));
        assert!(hot.contains("z-index:10"));
    }

    #[test]
    fn test_remeasure_after_container_resize() {
        assert_eq!(remeasure(FALLBACK_MAP_SIZE, Some((1280.0, 720.0))), Some((1280.0, 720.0)));
        assert_eq!(remeasure((1280.0, 720.0), Some((1280.4, 720.0))), None);
        assert_eq!(remeasure((1280.0, 720.0), None), None);

        // Tiles follow the new size: a wider container needs more columns.
        let narrow = MapCamera { center: Coordinate::new(41.8827, -87.6233), zoom: 11.0 };
        let small = narrow.viewport(FALLBACK_MAP_SIZE).tiles().len();
        let large = narrow.viewport((1920.0, 1080.0)).tiles().len();
        assert!(large > small);
    }

    #[test]
    fn test_popup_price() {
        let marker = MapMarker {
            id: "2".to_string(),
            title: "Wrapped Van".to_string(),
            space_type: SpaceType::Vehicle,
            price_cents: 45_000,
            city: Some("Chicago".to_string()),
            lat: 41.8827,
            lng: -87.6233,
        };
        assert_eq!(popup_price(&marker), "$450/mo");
    }
}
