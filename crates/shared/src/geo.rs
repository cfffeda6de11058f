//! Geographic primitives and helpers over GeoJSON features.

use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde::{Deserialize, Serialize};

/// Mean Earth radius used for haversine distances.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Property names that may carry a state's name, in lookup order.
pub const STATE_NAME_PROPERTIES: &[&str] = &["STNAME", "ST_NM", "stname", "state", "NAME_1"];

/// Property names that may carry a district's name, in lookup order.
pub const DISTRICT_NAME_PROPERTIES: &[&str] =
    &["dtname", "DTNAME", "DISTRICT", "district", "NAME_2"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }

    /// Great-circle distance in metres.
    pub fn distance_to(&self, other: LatLng) -> f64 {
        let phi1 = self.lat.to_radians();
        let phi2 = other.lat.to_radians();
        let d_phi = (other.lat - self.lat).to_radians();
        let d_lambda = (other.lng - self.lng).to_radians();
        let a = (d_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

/// Axis-aligned lat/lng rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn from_corners(a: LatLng, b: LatLng) -> Self {
        Bounds {
            south: a.lat.min(b.lat),
            west: a.lng.min(b.lng),
            north: a.lat.max(b.lat),
            east: a.lng.max(b.lng),
        }
    }

    pub fn point(p: LatLng) -> Self {
        Bounds::from_corners(p, p)
    }

    pub fn extend(&mut self, p: LatLng) {
        self.south = self.south.min(p.lat);
        self.west = self.west.min(p.lng);
        self.north = self.north.max(p.lat);
        self.east = self.east.max(p.lng);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            south: self.south.min(other.south),
            west: self.west.min(other.west),
            north: self.north.max(other.north),
            east: self.east.max(other.east),
        }
    }

    pub fn center(&self) -> LatLng {
        LatLng::new((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }

    pub fn contains(&self, p: LatLng) -> bool {
        (self.south..=self.north).contains(&p.lat) && (self.west..=self.east).contains(&p.lng)
    }

    pub fn south_west(&self) -> LatLng {
        LatLng::new(self.south, self.west)
    }

    pub fn north_east(&self) -> LatLng {
        LatLng::new(self.north, self.east)
    }
}

/// Call `f` for every `[lng, lat, ..]` position in a geometry value.
pub fn for_each_position(value: &Value, f: &mut impl FnMut(LatLng)) {
    let mut emit = |pos: &Vec<f64>| {
        if let [lng, lat, ..] = pos.as_slice() {
            f(LatLng::new(*lat, *lng));
        }
    };
    match value {
        Value::Point(p) => emit(p),
        Value::MultiPoint(ps) | Value::LineString(ps) => ps.iter().for_each(emit),
        Value::MultiLineString(lines) | Value::Polygon(lines) => {
            lines.iter().flatten().for_each(emit)
        }
        Value::MultiPolygon(polys) => polys.iter().flatten().flatten().for_each(emit),
        Value::GeometryCollection(geoms) => {
            for g in geoms {
                for_each_position(&g.value, f);
            }
        }
    }
}

pub fn geometry_bounds(geometry: &Geometry) -> Option<Bounds> {
    let mut bounds: Option<Bounds> = None;
    for_each_position(&geometry.value, &mut |p| match bounds.as_mut() {
        Some(b) => b.extend(p),
        None => bounds = Some(Bounds::point(p)),
    });
    bounds
}

pub fn feature_bounds(feature: &Feature) -> Option<Bounds> {
    feature.geometry.as_ref().and_then(geometry_bounds)
}

pub fn collection_bounds(collection: &FeatureCollection) -> Option<Bounds> {
    collection
        .features
        .iter()
        .filter_map(feature_bounds)
        .reduce(|a, b| a.union(&b))
}

/// Even-odd test of `p` against a ring of `[lng, lat]` positions.
fn ring_crosses(ring: &[Vec<f64>], p: LatLng) -> bool {
    let mut inside = false;
    let mut prev = match ring.last() {
        Some(last) => last,
        None => return false,
    };
    for cur in ring {
        if let ([x0, y0, ..], [x1, y1, ..]) = (prev.as_slice(), cur.as_slice()) {
            if (y1 > &p.lat) != (y0 > &p.lat) {
                let x_at = x1 + (p.lat - y1) * (x0 - x1) / (y0 - y1);
                if p.lng < x_at {
                    inside = !inside;
                }
            }
        }
        prev = cur;
    }
    inside
}

/// Whether a polygonal geometry covers `p`. Holes are honoured; points and
/// lines never contain anything.
pub fn geometry_contains(geometry: &Geometry, p: LatLng) -> bool {
    fn polygon_contains(rings: &[Vec<Vec<f64>>], p: LatLng) -> bool {
        rings.iter().filter(|ring| ring_crosses(ring, p)).count() % 2 == 1
    }
    match &geometry.value {
        Value::Polygon(rings) => polygon_contains(rings, p),
        Value::MultiPolygon(polys) => polys.iter().any(|rings| polygon_contains(rings, p)),
        Value::GeometryCollection(geoms) => geoms.iter().any(|g| geometry_contains(g, p)),
        _ => false,
    }
}

/// First non-empty string among `candidates` in the feature's properties.
pub fn feature_name<'a>(feature: &'a Feature, candidates: &[&str]) -> Option<&'a str> {
    candidates.iter().find_map(|key| {
        feature
            .property(key)
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    })
}

/// Locate a feature by name, ignoring case and surrounding whitespace.
pub fn find_feature_by_name<'a>(
    collection: &'a FeatureCollection,
    name: &str,
    candidates: &[&str],
) -> Option<&'a Feature> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    collection.features.iter().find(|feature| {
        candidates.iter().any(|key| {
            feature
                .property(key)
                .and_then(serde_json::Value::as_str)
                .is_some_and(|v| v.trim().to_lowercase() == wanted)
        })
    })
}
