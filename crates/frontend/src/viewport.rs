//! Web Mercator math for the slippy map: projection, tile placement,
//! fit-to-bounds and camera tweening. Pure functions, tested natively.

use spotlight_shared::calc::LatLngBounds;
use spotlight_shared::camera::CameraTarget;
use spotlight_shared::models::Coordinate;

pub const TILE_SIZE: f64 = 256.0;
pub const MIN_ZOOM: f64 = 2.0;
pub const MAX_ZOOM: f64 = 18.0;

/// Mercator is undefined at the poles; tiles stop here.
const MAX_LATITUDE: f64 = 85.051_128_78;

/// Ground resolution at the equator for zoom 0, in meters per pixel.
const EQUATOR_METERS_PER_PX: f64 = 156_543.033_92;

pub const TILE_URL_TEMPLATE: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * 2f64.powf(zoom)
}

/// Project to world pixel coordinates at `zoom`.
pub fn project(c: Coordinate, zoom: f64) -> (f64, f64) {
    let size = world_size(zoom);
    let lat = c.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (c.lng + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) / 2.0 * size;
    (x, y)
}

pub fn unproject(x: f64, y: f64, zoom: f64) -> Coordinate {
    let size = world_size(zoom);
    let lng = x / size * 360.0 - 180.0;
    let n = std::f64::consts::PI * (1.0 - 2.0 * y / size);
    let lat = n.sinh().atan().to_degrees();
    Coordinate::new(lat, lng)
}

pub fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// One tile image and where it goes inside the map container.
#[derive(Debug, Clone, PartialEq)]
pub struct TilePlacement {
    pub url: String,
    pub left: f64,
    pub top: f64,
    pub size: f64,
}

/// What the map currently shows, in container pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: Coordinate,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    fn origin(&self) -> (f64, f64) {
        let (cx, cy) = project(self.center, self.zoom);
        (cx - self.width / 2.0, cy - self.height / 2.0)
    }

    pub fn to_screen(&self, c: Coordinate) -> (f64, f64) {
        let (ox, oy) = self.origin();
        let (x, y) = project(c, self.zoom);
        (x - ox, y - oy)
    }

    pub fn from_screen(&self, sx: f64, sy: f64) -> Coordinate {
        let (ox, oy) = self.origin();
        unproject(ox + sx, oy + sy, self.zoom)
    }

    /// Drag the map content by (dx, dy) screen pixels.
    pub fn panned(&self, dx: f64, dy: f64) -> Viewport {
        let (cx, cy) = project(self.center, self.zoom);
        Viewport {
            center: unproject(cx - dx, cy - dy, self.zoom),
            ..*self
        }
    }

    /// Zoom so the point under (sx, sy) stays put.
    pub fn zoomed_at(&self, sx: f64, sy: f64, zoom: f64) -> Viewport {
        let zoom = clamp_zoom(zoom);
        let anchor = self.from_screen(sx, sy);
        let (ax, ay) = project(anchor, zoom);
        let cx = ax - sx + self.width / 2.0;
        let cy = ay - sy + self.height / 2.0;
        Viewport {
            center: unproject(cx, cy, zoom),
            zoom,
            ..*self
        }
    }

    pub fn meters_per_pixel(&self) -> f64 {
        EQUATOR_METERS_PER_PX * self.center.lat.to_radians().cos() / 2f64.powf(self.zoom)
    }

    /// Tiles covering the container. Fractional zooms scale the nearest lower tile level.
    pub fn tiles(&self) -> Vec<TilePlacement> {
        let z = self.zoom.floor().max(0.0);
        let scale = 2f64.powf(self.zoom - z);
        let size = TILE_SIZE * scale;
        let count = 2f64.powf(z) as i64;
        let (ox, oy) = self.origin();

        let first_x = (ox / size).floor() as i64;
        let first_y = (oy / size).floor() as i64;
        let last_x = ((ox + self.width) / size).floor() as i64;
        let last_y = ((oy + self.height) / size).floor() as i64;

        let mut tiles = Vec::new();
        for ty in first_y..=last_y {
            if ty < 0 || ty >= count {
                continue;
            }
            for tx in first_x..=last_x {
                let wrapped = tx.rem_euclid(count);
                tiles.push(TilePlacement {
                    url: tile_url(z as u32, wrapped, ty),
                    left: tx as f64 * size - ox,
                    top: ty as f64 * size - oy,
                    size,
                });
            }
        }
        tiles
    }
}

pub fn tile_url(z: u32, x: i64, y: i64) -> String {
    TILE_URL_TEMPLATE
        .replace("{z}", &z.to_string())
        .replace("{x}", &x.to_string())
        .replace("{y}", &y.to_string())
}

/// Center and zoom showing `bounds` inside `width` x `height` with `padding` on every side.
pub fn fit_bounds(
    bounds: &LatLngBounds,
    width: f64,
    height: f64,
    padding: f64,
    max_zoom: f64,
) -> (Coordinate, f64) {
    let (west, north) = project(Coordinate::new(bounds.north, bounds.west), 0.0);
    let (east, south) = project(Coordinate::new(bounds.south, bounds.east), 0.0);
    let center = unproject((west + east) / 2.0, (north + south) / 2.0, 0.0);

    let span_x = (east - west).abs();
    let span_y = (south - north).abs();
    let avail_x = (width - 2.0 * padding).max(1.0);
    let avail_y = (height - 2.0 * padding).max(1.0);

    let zoom = if span_x <= f64::EPSILON && span_y <= f64::EPSILON {
        max_zoom
    } else {
        let fit_x = if span_x > 0.0 { avail_x / span_x } else { f64::INFINITY };
        let fit_y = if span_y > 0.0 { avail_y / span_y } else { f64::INFINITY };
        fit_x.min(fit_y).log2().min(max_zoom)
    };
    (center, clamp_zoom(zoom))
}

/// Where a camera target lands in a container of the given size.
pub fn resolve_target(target: &CameraTarget, width: f64, height: f64) -> (Coordinate, f64) {
    match target {
        CameraTarget::Point { center, zoom } => (*center, clamp_zoom(*zoom)),
        CameraTarget::Bounds {
            bounds,
            padding_px,
            max_zoom,
        } => fit_bounds(bounds, width, height, *padding_px, *max_zoom),
    }
}

pub const FLY_DURATION_MS: f64 = 900.0;

fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Animated camera move between two views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTween {
    pub from: (Coordinate, f64),
    pub to: (Coordinate, f64),
    pub duration_ms: f64,
}

impl CameraTween {
    pub fn new(from: (Coordinate, f64), to: (Coordinate, f64)) -> Self {
        CameraTween {
            from,
            to,
            duration_ms: FLY_DURATION_MS,
        }
    }

    /// View after `elapsed_ms`. Interpolates in projected space so straight
    /// screen paths stay straight.
    pub fn at(&self, elapsed_ms: f64) -> (Coordinate, f64) {
        if self.duration_ms <= 0.0 || elapsed_ms >= self.duration_ms {
            return self.to;
        }
        let t = ease_in_out_cubic((elapsed_ms / self.duration_ms).clamp(0.0, 1.0));
        let (fx, fy) = project(self.from.0, 0.0);
        let (tx, ty) = project(self.to.0, 0.0);
        let center = unproject(fx + (tx - fx) * t, fy + (ty - fy) * t, 0.0);
        let zoom = self.from.1 + (self.to.1 - self.from.1) * t;
        (center, zoom)
    }

    pub fn is_done(&self, elapsed_ms: f64) -> bool {
        elapsed_ms >= self.duration_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_project_origin_and_round_trip() {
        let (x, y) = project(Coordinate::new(0.0, 0.0), 0.0);
        assert!(close(x, 128.0, 1e-9) && close(y, 128.0, 1e-9));

        let chicago = Coordinate::new(41.8827, -87.6233);
        let (x, y) = project(chicago, 11.0);
        let back = unproject(x, y, 11.0);
        assert!(close(back.lat, chicago.lat, 1e-9));
        assert!(close(back.lng, chicago.lng, 1e-9));
    }

    #[test]
    fn test_center_is_middle_of_screen() {
        let v = Viewport {
            center: Coordinate::new(40.0, -74.0),
            zoom: 10.0,
            width: 800.0,
            height: 600.0,
        };
        let (sx, sy) = v.to_screen(v.center);
        assert!(close(sx, 400.0, 1e-6) && close(sy, 300.0, 1e-6));
        let c = v.from_screen(400.0, 300.0);
        assert!(close(c.lat, 40.0, 1e-9));
    }

    #[test]
    fn test_pan_moves_content_with_cursor() {
        let v = Viewport {
            center: Coordinate::new(40.0, -74.0),
            zoom: 10.0,
            width: 800.0,
            height: 600.0,
        };
        let spot = v.from_screen(100.0, 100.0);
        let moved = v.panned(50.0, -20.0);
        let (sx, sy) = moved.to_screen(spot);
        assert!(close(sx, 150.0, 1e-6) && close(sy, 80.0, 1e-6));
    }

    #[test]
    fn test_zoom_keeps_anchor_under_cursor() {
        let v = Viewport {
            center: Coordinate::new(30.0, -97.0),
            zoom: 8.0,
            width: 1000.0,
            height: 700.0,
        };
        let anchor = v.from_screen(250.0, 600.0);
        let z = v.zoomed_at(250.0, 600.0, 9.5);
        let (sx, sy) = z.to_screen(anchor);
        assert!(close(sx, 250.0, 1e-6) && close(sy, 600.0, 1e-6));
        assert_eq!(v.zoomed_at(0.0, 0.0, 40.0).zoom, MAX_ZOOM);
    }

    #[test]
    fn test_tiles_cover_viewport() {
        let v = Viewport {
            center: Coordinate::new(39.8283, -98.5795),
            zoom: 4.0,
            width: 800.0,
            height: 600.0,
        };
        let tiles = v.tiles();
        assert!(!tiles.is_empty());
        assert!(tiles.iter().all(|t| t.url.starts_with("https://tile.openstreetmap.org/4/")));
        assert!(tiles.iter().any(|t| t.left <= 0.0 && t.top <= 0.0));
        assert!(tiles
            .iter()
            .any(|t| t.left + t.size >= 800.0 && t.top + t.size >= 600.0));
    }

    #[test]
    fn test_fit_bounds_contains_corners_with_padding() {
        let bounds = LatLngBounds {
            south: 25.7617,
            west: -118.2437,
            north: 40.758,
            east: -73.9855,
        };
        let (center, zoom) = fit_bounds(&bounds, 900.0, 600.0, 48.0, 14.0);
        let v = Viewport {
            center,
            zoom,
            width: 900.0,
            height: 600.0,
        };
        for corner in [
            Coordinate::new(bounds.north, bounds.west),
            Coordinate::new(bounds.south, bounds.east),
        ] {
            let (x, y) = v.to_screen(corner);
            assert!(x >= 48.0 - 1e-6 && x <= 852.0 + 1e-6, "x {x}");
            assert!(y >= 48.0 - 1e-6 && y <= 552.0 + 1e-6, "y {y}");
        }
    }

    #[test]
    fn test_fit_bounds_respects_max_zoom() {
        let bounds = LatLngBounds {
            south: 41.88,
            west: -87.63,
            north: 41.8801,
            east: -87.6299,
        };
        let (_, zoom) = fit_bounds(&bounds, 900.0, 600.0, 48.0, 14.0);
        assert_eq!(zoom, 14.0);
    }

    #[test]
    fn test_tween_endpoints() {
        let a = (Coordinate::new(39.8283, -98.5795), 4.0);
        let b = (Coordinate::new(41.8827, -87.6233), 13.0);
        let tween = CameraTween::new(a, b);
        let start = tween.at(0.0);
        assert!(close(start.0.lat, a.0.lat, 1e-9) && close(start.1, 4.0, 1e-9));
        assert_eq!(tween.at(tween.duration_ms), b);
        let mid = tween.at(tween.duration_ms / 2.0);
        assert!(mid.1 > 4.0 && mid.1 < 13.0);
        assert!(tween.is_done(1_000.0));
    }

    #[test]
    fn test_meters_per_pixel_shrinks_with_zoom() {
        let mut v = Viewport {
            center: Coordinate::new(0.0, 0.0),
            zoom: 0.0,
            width: 100.0,
            height: 100.0,
        };
        assert!(close(v.meters_per_pixel(), EQUATOR_METERS_PER_PX, 1e-6));
        v.zoom = 1.0;
        assert!(close(v.meters_per_pixel(), EQUATOR_METERS_PER_PX / 2.0, 1e-6));
    }
}
