//! Freehand annotation shapes drawn on top of the map.
//!
//! A [`DrawingTools`] holds at most one in-progress session. Clicks feed
//! points into it; markers finish on the first point, rectangles and circles
//! on the second, polygons when explicitly finished.

use geojson::{Feature, Geometry, JsonObject, Value};

use crate::error::DrawError;
use crate::geo::{Bounds, LatLng};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Polygon,
    Rectangle,
    Circle,
    Marker,
}

impl DrawMode {
    pub const ALL: [DrawMode; 4] = [
        DrawMode::Polygon,
        DrawMode::Rectangle,
        DrawMode::Circle,
        DrawMode::Marker,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DrawMode::Polygon => "Polygon",
            DrawMode::Rectangle => "Rectangle",
            DrawMode::Circle => "Circle",
            DrawMode::Marker => "Marker",
        }
    }

    fn key(self) -> &'static str {
        match self {
            DrawMode::Polygon => "polygon",
            DrawMode::Rectangle => "rectangle",
            DrawMode::Circle => "circle",
            DrawMode::Marker => "marker",
        }
    }

    /// Points after which the shape completes on its own.
    fn auto_finish_at(self) -> Option<usize> {
        match self {
            DrawMode::Marker => Some(1),
            DrawMode::Rectangle | DrawMode::Circle => Some(2),
            DrawMode::Polygon => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Open ring of vertices; closed when exported.
    Polygon(Vec<LatLng>),
    Circle { center: LatLng, radius_m: f64 },
    Marker(LatLng),
}

impl Shape {
    fn from_points(mode: DrawMode, points: &[LatLng]) -> Result<Shape, DrawError> {
        let too_few = |needed| DrawError::TooFewPoints {
            shape: mode.key(),
            needed,
            got: points.len(),
        };
        match (mode, points) {
            (DrawMode::Marker, [p, ..]) => Ok(Shape::Marker(*p)),
            (DrawMode::Circle, [center, edge, ..]) => Ok(Shape::Circle {
                center: *center,
                radius_m: center.distance_to(*edge),
            }),
            (DrawMode::Rectangle, [a, b, ..]) => {
                let r = Bounds::from_corners(*a, *b);
                Ok(Shape::Polygon(vec![
                    LatLng::new(r.south, r.west),
                    LatLng::new(r.south, r.east),
                    LatLng::new(r.north, r.east),
                    LatLng::new(r.north, r.west),
                ]))
            }
            (DrawMode::Polygon, pts) if pts.len() >= 3 => Ok(Shape::Polygon(pts.to_vec())),
            (DrawMode::Marker, _) => Err(too_few(1)),
            (DrawMode::Circle | DrawMode::Rectangle, _) => Err(too_few(2)),
            (DrawMode::Polygon, _) => Err(too_few(3)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawnShape {
    pub id: u64,
    pub mode: DrawMode,
    pub shape: Shape,
}

impl DrawnShape {
    /// GeoJSON export. Circles become a point with a `radius` property in
    /// metres.
    pub fn to_feature(&self) -> Feature {
        let mut properties = JsonObject::new();
        properties.insert("id".to_string(), self.id.into());
        properties.insert("shape".to_string(), self.mode.key().into());

        let value = match &self.shape {
            Shape::Polygon(points) => {
                let mut ring: Vec<Vec<f64>> = points.iter().map(|p| vec![p.lng, p.lat]).collect();
                if let Some(first) = ring.first().cloned() {
                    ring.push(first);
                }
                Value::Polygon(vec![ring])
            }
            Shape::Circle { center, radius_m } => {
                properties.insert("radius".to_string(), (*radius_m).into());
                Value::Point(vec![center.lng, center.lat])
            }
            Shape::Marker(p) => Value::Point(vec![p.lng, p.lat]),
        };

        Feature {
            bbox: None,
            geometry: Some(Geometry::new(value)),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Session {
    mode: DrawMode,
    points: Vec<LatLng>,
}

#[derive(Debug, Default)]
pub struct DrawingTools {
    session: Option<Session>,
    shapes: Vec<DrawnShape>,
    next_id: u64,
}

impl DrawingTools {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin drawing, discarding any unfinished session.
    pub fn start(&mut self, mode: DrawMode) {
        self.session = Some(Session {
            mode,
            points: Vec::new(),
        });
    }

    pub fn cancel(&mut self) {
        self.session = None;
    }

    pub fn active_mode(&self) -> Option<DrawMode> {
        self.session.as_ref().map(|s| s.mode)
    }

    pub fn pending_points(&self) -> &[LatLng] {
        match &self.session {
            Some(s) => &s.points,
            None => &[],
        }
    }

    /// Feed a map click. Returns the id of the shape if this point
    /// completed it.
    pub fn add_point(&mut self, p: LatLng) -> Result<Option<u64>, DrawError> {
        let session = self.session.as_mut().ok_or(DrawError::NotDrawing)?;
        session.points.push(p);
        if session.mode.auto_finish_at() == Some(session.points.len()) {
            return self.finish().map(Some);
        }
        Ok(None)
    }

    /// Complete the current session. On error the session stays open.
    pub fn finish(&mut self) -> Result<u64, DrawError> {
        let session = self.session.as_ref().ok_or(DrawError::NotDrawing)?;
        let shape = Shape::from_points(session.mode, &session.points)?;
        let mode = session.mode;
        self.session = None;

        self.next_id += 1;
        let id = self.next_id;
        tracing::debug!(id, shape = mode.key(), "shape drawn");
        self.shapes.push(DrawnShape { id, mode, shape });
        Ok(id)
    }

    pub fn shapes(&self) -> &[DrawnShape] {
        &self.shapes
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.shapes.len();
        self.shapes.retain(|s| s.id != id);
        self.shapes.len() != before
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_finishes_on_first_click() {
        let mut tools = DrawingTools::new();
        tools.start(DrawMode::Marker);
        let id = tools.add_point(LatLng::new(23.0, 91.0)).unwrap();
        assert_eq!(id, Some(1));
        assert_eq!(tools.active_mode(), None);
        assert_eq!(tools.shapes()[0].shape, Shape::Marker(LatLng::new(23.0, 91.0)));
    }

    #[test]
    fn test_rectangle_from_two_corners() {
        let mut tools = DrawingTools::new();
        tools.start(DrawMode::Rectangle);
        assert_eq!(tools.add_point(LatLng::new(24.0, 92.0)).unwrap(), None);
        assert_eq!(tools.pending_points().len(), 1);
        tools.add_point(LatLng::new(23.0, 91.0)).unwrap();
        let Shape::Polygon(ring) = &tools.shapes()[0].shape else {
            panic!("expected polygon");
        };
        assert_eq!(ring.len(), 4);
        assert_eq!(ring[0], LatLng::new(23.0, 91.0));
    }

    #[test]
    fn test_circle_radius_in_metres() {
        let mut tools = DrawingTools::new();
        tools.start(DrawMode::Circle);
        tools.add_point(LatLng::new(20.0, 78.0)).unwrap();
        tools.add_point(LatLng::new(21.0, 78.0)).unwrap();
        let feature = tools.shapes()[0].to_feature();
        let radius = feature.property("radius").and_then(|v| v.as_f64()).unwrap();
        // One degree of latitude is about 111 km.
        assert!((radius - 111_195.0).abs() < 500.0, "{radius}");
        assert!(matches!(
            feature.geometry.unwrap().value,
            Value::Point(ref c) if c == &vec![78.0, 20.0]
        ));
    }

    #[test]
    fn test_polygon_needs_three_points() {
        let mut tools = DrawingTools::new();
        tools.start(DrawMode::Polygon);
        tools.add_point(LatLng::new(20.0, 78.0)).unwrap();
        tools.add_point(LatLng::new(21.0, 78.0)).unwrap();
        assert_eq!(
            tools.finish(),
            Err(DrawError::TooFewPoints {
                shape: "polygon",
                needed: 3,
                got: 2
            })
        );
        assert_eq!(tools.active_mode(), Some(DrawMode::Polygon));

        tools.add_point(LatLng::new(21.0, 79.0)).unwrap();
        let id = tools.finish().unwrap();
        let feature = tools.shapes()[0].to_feature();
        let Value::Polygon(rings) = feature.geometry.unwrap().value else {
            panic!("expected polygon");
        };
        assert_eq!(rings[0].len(), 4);
        assert_eq!(rings[0].first(), rings[0].last());
        assert_eq!(id, 1);
    }

    #[test]
    fn test_points_require_session() {
        let mut tools = DrawingTools::new();
        assert_eq!(tools.add_point(LatLng::new(0.0, 0.0)), Err(DrawError::NotDrawing));
        assert_eq!(tools.finish(), Err(DrawError::NotDrawing));
    }

    #[test]
    fn test_cancel_discards_points() {
        let mut tools = DrawingTools::new();
        tools.start(DrawMode::Polygon);
        tools.add_point(LatLng::new(20.0, 78.0)).unwrap();
        tools.cancel();
        assert!(tools.pending_points().is_empty());
        assert!(tools.shapes().is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let mut tools = DrawingTools::new();
        for lat in [20.0, 21.0, 22.0] {
            tools.start(DrawMode::Marker);
            tools.add_point(LatLng::new(lat, 78.0)).unwrap();
        }
        assert!(tools.remove(2));
        assert!(!tools.remove(2));
        let ids: Vec<u64> = tools.shapes().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);
        tools.clear();
        assert!(tools.shapes().is_empty());
    }
}
