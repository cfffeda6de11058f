//! Web Mercator viewport math.
//!
//! World pixel coordinates follow the slippy-map convention: at zoom `z` the
//! world is `256 * 2^z` pixels square, origin at the north-west corner.

use std::f64::consts::PI;

use crate::geo::{Bounds, LatLng};

pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the Web Mercator projection.
pub const MAX_LAT: f64 = 85.051_128_78;

fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * 2f64.powf(zoom)
}

/// Project a lat/lng to world pixels at `zoom`.
pub fn project(p: LatLng, zoom: f64) -> (f64, f64) {
    let size = world_size(zoom);
    let lat = p.lat.clamp(-MAX_LAT, MAX_LAT).to_radians();
    let x = (p.lng + 180.0) / 360.0 * size;
    let y = (0.5 - ((1.0 + lat.sin()) / (1.0 - lat.sin())).ln() / (4.0 * PI)) * size;
    (x, y)
}

/// Inverse of [`project`].
pub fn unproject(x: f64, y: f64, zoom: f64) -> LatLng {
    let size = world_size(zoom);
    let lng = x / size * 360.0 - 180.0;
    let n = PI - 2.0 * PI * y / size;
    let lat = n.sinh().atan().to_degrees();
    LatLng::new(lat, lng)
}

/// A basemap tile address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

/// A tile together with where it lands on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleTile {
    pub coord: TileCoord,
    pub left: f64,
    pub top: f64,
    pub size: f64,
}

/// The visible window onto the map: a centre, a zoom, and a screen size in
/// CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: f64, width: f64, height: f64) -> Self {
        Viewport {
            center,
            zoom,
            width,
            height,
            min_zoom: 0.0,
            max_zoom: 18.0,
        }
    }

    pub fn with_zoom_limits(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
        self
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.width = width;
            self.height = height;
        }
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.center = center;
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Screen position of a lat/lng, relative to the top-left of the map.
    pub fn to_screen(&self, p: LatLng) -> (f64, f64) {
        let (cx, cy) = project(self.center, self.zoom);
        let (px, py) = project(p, self.zoom);
        (px - cx + self.width / 2.0, py - cy + self.height / 2.0)
    }

    /// Lat/lng under a screen position.
    pub fn to_lat_lng(&self, x: f64, y: f64) -> LatLng {
        let (cx, cy) = project(self.center, self.zoom);
        unproject(cx + x - self.width / 2.0, cy + y - self.height / 2.0, self.zoom)
    }

    /// Move the map content by a screen delta (positive `dx` drags it right).
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let (cx, cy) = project(self.center, self.zoom);
        self.center = unproject(cx - dx, cy - dy, self.zoom);
    }

    /// Change zoom keeping the point under `(x, y)` fixed on screen.
    pub fn zoom_at(&mut self, x: f64, y: f64, zoom: f64) {
        let zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        let anchor = self.to_lat_lng(x, y);
        let (ax, ay) = project(anchor, zoom);
        self.center = unproject(
            ax - (x - self.width / 2.0),
            ay - (y - self.height / 2.0),
            zoom,
        );
        self.zoom = zoom;
    }

    /// Centre on `bounds` at the largest whole zoom that fits it inside the
    /// screen minus `padding` on every side.
    pub fn fit_bounds(&mut self, bounds: Bounds, padding: f64) {
        let (x0, y1) = project(bounds.south_west(), 0.0);
        let (x1, y0) = project(bounds.north_east(), 0.0);
        let span_x = (x1 - x0).abs();
        let span_y = (y1 - y0).abs();
        let avail_w = (self.width - 2.0 * padding).max(1.0);
        let avail_h = (self.height - 2.0 * padding).max(1.0);

        let zoom = if span_x <= f64::EPSILON && span_y <= f64::EPSILON {
            self.max_zoom
        } else {
            let ratio = match (span_x > f64::EPSILON, span_y > f64::EPSILON) {
                (true, true) => (avail_w / span_x).min(avail_h / span_y),
                (true, false) => avail_w / span_x,
                _ => avail_h / span_y,
            };
            ratio.log2().floor()
        };

        let center = unproject((x0 + x1) / 2.0, (y0 + y1) / 2.0, 0.0);
        self.set_view(center, zoom);
    }

    /// Lat/lng rectangle currently on screen.
    pub fn visible_bounds(&self) -> Bounds {
        Bounds::from_corners(
            self.to_lat_lng(0.0, self.height),
            self.to_lat_lng(self.width, 0.0),
        )
    }

    /// Basemap tiles covering the screen at the nearest whole zoom.
    pub fn visible_tiles(&self) -> Vec<VisibleTile> {
        let z = self.zoom.round().clamp(0.0, 22.0);
        let tiles_per_side = 2u32.pow(z as u32);
        let tile_px = TILE_SIZE * 2f64.powf(self.zoom - z);

        let (cx, cy) = project(self.center, self.zoom);
        let left = cx - self.width / 2.0;
        let top = cy - self.height / 2.0;

        let max_index = tiles_per_side as f64 - 1.0;
        let first_x = (left / tile_px).floor().clamp(0.0, max_index) as u32;
        let last_x = (((left + self.width) / tile_px).ceil() - 1.0).clamp(0.0, max_index) as u32;
        let first_y = (top / tile_px).floor().clamp(0.0, max_index) as u32;
        let last_y = (((top + self.height) / tile_px).ceil() - 1.0).clamp(0.0, max_index) as u32;

        let mut tiles = Vec::new();
        for y in first_y..=last_y {
            for x in first_x..=last_x {
                tiles.push(VisibleTile {
                    coord: TileCoord { x, y, z: z as u8 },
                    left: x as f64 * tile_px - left,
                    top: y as f64 * tile_px - top,
                    size: tile_px,
                });
            }
        }
        tiles
    }
}
