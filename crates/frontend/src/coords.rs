use fra_shared::geo::LatLng;
use fra_shared::viewport::Viewport;
use geojson::{Geometry, Value};

pub const MAP_CONTAINER_ID: &str = "map-container";

/// Convert client (viewport) coordinates to container-relative pixel coordinates.
pub fn client_to_container(
    client_x: f64,
    client_y: f64,
    rect_left: f64,
    rect_top: f64,
) -> (f64, f64) {
    (client_x - rect_left, client_y - rect_top)
}

pub fn container_rect() -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(MAP_CONTAINER_ID)?;
    Some(element.get_bounding_client_rect())
}

/// Container size in CSS pixels, if the map is mounted and laid out.
pub fn container_size() -> Option<(f64, f64)> {
    let rect = container_rect()?;
    (rect.width() > 0.0 && rect.height() > 0.0).then(|| (rect.width(), rect.height()))
}

/// Client coordinates of a pointer event, relative to the map container.
pub fn container_point(client_x: f64, client_y: f64) -> Option<(f64, f64)> {
    let rect = container_rect()?;
    Some(client_to_container(client_x, client_y, rect.left(), rect.top()))
}

/// SVG path data for the lines and polygons of a geometry, projected
/// through `viewport`. Point geometries contribute nothing.
pub fn geometry_path(viewport: &Viewport, geometry: &Geometry) -> String {
    let mut d = String::new();
    push_value(&mut d, viewport, &geometry.value);
    d
}

fn push_value(d: &mut String, viewport: &Viewport, value: &Value) {
    match value {
        Value::LineString(line) => push_ring(d, viewport, line, false),
        Value::MultiLineString(lines) => {
            for line in lines {
                push_ring(d, viewport, line, false);
            }
        }
        Value::Polygon(rings) => {
            for ring in rings {
                push_ring(d, viewport, ring, true);
            }
        }
        Value::MultiPolygon(polys) => {
            for ring in polys.iter().flatten() {
                push_ring(d, viewport, ring, true);
            }
        }
        Value::GeometryCollection(geoms) => {
            for g in geoms {
                push_value(d, viewport, &g.value);
            }
        }
        Value::Point(_) | Value::MultiPoint(_) => {}
    }
}

fn push_ring(d: &mut String, viewport: &Viewport, ring: &[Vec<f64>], close: bool) {
    let mut first = true;
    for pos in ring {
        let [lng, lat, ..] = pos.as_slice() else {
            continue;
        };
        let (x, y) = viewport.to_screen(LatLng::new(*lat, *lng));
        let cmd = if first { 'M' } else { 'L' };
        // Writing to a String cannot fail.
        d.push_str(&format!("{cmd}{x:.1} {y:.1}"));
        first = false;
    }
    if close && !first {
        d.push('Z');
    }
}

/// Human-readable coordinate, e.g. `20.5937°N 78.9629°E`.
pub fn format_lat_lng(p: LatLng) -> String {
    let ns = if p.lat >= 0.0 { 'N' } else { 'S' };
    let ew = if p.lng >= 0.0 { 'E' } else { 'W' };
    format!("{:.4}°{ns} {:.4}°{ew}", p.lat.abs(), p.lng.abs())
}
