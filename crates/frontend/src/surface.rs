//! [`MapSurface`] over the SVG map: a viewport plus the boundary layers the
//! navigator has attached, kept in stacking order.

use fra_shared::config::AtlasConfig;
use fra_shared::error::SurfaceError;
use fra_shared::geo::{self, Bounds, LatLng};
use fra_shared::layers::LayerHandle;
use fra_shared::render::{MapSurface, RenderedFeature, VectorLayer};
use fra_shared::viewport::Viewport;

/// Used until the container has been measured.
const INITIAL_SIZE: (f64, f64) = (1024.0, 768.0);

#[derive(Debug, Clone, PartialEq)]
pub struct SvgSurface {
    pub viewport: Viewport,
    layers: Vec<(LayerHandle, VectorLayer)>,
}

impl SvgSurface {
    pub fn new(config: &AtlasConfig) -> Self {
        let (w, h) = INITIAL_SIZE;
        SvgSurface {
            viewport: Viewport::new(config.default_center, config.default_zoom, w, h)
                .with_zoom_limits(config.min_zoom, config.max_zoom),
            layers: Vec::new(),
        }
    }

    /// Attached layers, bottom first.
    pub fn layers(&self) -> impl Iterator<Item = &VectorLayer> {
        self.layers.iter().map(|(_, layer)| layer)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Topmost feature under `at`, together with its layer.
    pub fn hit_test(&self, at: LatLng) -> Option<(&VectorLayer, &RenderedFeature)> {
        self.layers.iter().rev().find_map(|(_, layer)| {
            layer
                .features
                .iter()
                .find(|f| {
                    f.bounds.is_some_and(|b| b.contains(at))
                        && f.geometry.as_ref().is_some_and(|g| geo::geometry_contains(g, at))
                })
                .map(|f| (layer, f))
        })
    }
}

impl MapSurface for SvgSurface {
    fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.viewport.set_view(center, zoom);
    }

    fn fit_bounds(&mut self, bounds: Bounds, padding: f64) {
        self.viewport.fit_bounds(bounds, padding);
    }

    fn add_layer(&mut self, handle: LayerHandle, layer: VectorLayer) {
        tracing::debug!(%handle, kind = ?layer.kind, features = layer.features.len(), "layer added");
        let at = self
            .layers
            .iter()
            .position(|(_, l)| l.kind > layer.kind)
            .unwrap_or(self.layers.len());
        self.layers.insert(at, (handle, layer));
    }

    fn remove_layer(&mut self, handle: LayerHandle) -> Result<(), SurfaceError> {
        let idx = self
            .layers
            .iter()
            .position(|(h, _)| *h == handle)
            .ok_or(SurfaceError::NotAttached(handle))?;
        self.layers.remove(idx);
        tracing::debug!(%handle, "layer removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fra_shared::layers::LayerKind;
    use fra_shared::render::{ClickAction, LayerStyle};
    use geojson::{Geometry, Value};

    fn square_feature(label: &str, west: f64, south: f64, size: f64, click: bool) -> RenderedFeature {
        let ring = vec![
            vec![west, south],
            vec![west + size, south],
            vec![west + size, south + size],
            vec![west, south + size],
            vec![west, south],
        ];
        let bounds = Bounds::from_corners(
            LatLng::new(south, west),
            LatLng::new(south + size, west + size),
        );
        RenderedFeature {
            label: label.to_string(),
            geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
            bounds: Some(bounds),
            click: click.then(|| ClickAction::SelectState {
                name: label.to_string(),
                bounds: Some(bounds),
            }),
        }
    }

    fn layer(kind: LayerKind, features: Vec<RenderedFeature>) -> VectorLayer {
        VectorLayer {
            kind,
            style: LayerStyle::for_kind(kind),
            features,
        }
    }

    #[test]
    fn test_layers_stack_by_kind() {
        let mut s = SvgSurface::new(&AtlasConfig::default());
        s.add_layer(LayerHandle(3), layer(LayerKind::Search, vec![]));
        s.add_layer(LayerHandle(1), layer(LayerKind::States, vec![]));
        s.add_layer(LayerHandle(2), layer(LayerKind::Districts, vec![]));
        let kinds: Vec<LayerKind> = s.layers().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![LayerKind::States, LayerKind::Districts, LayerKind::Search]);
    }

    #[test]
    fn test_remove_unknown_handle_errors() {
        let mut s = SvgSurface::new(&AtlasConfig::default());
        s.add_layer(LayerHandle(1), layer(LayerKind::States, vec![]));
        assert_eq!(
            s.remove_layer(LayerHandle(9)),
            Err(SurfaceError::NotAttached(LayerHandle(9)))
        );
        assert_eq!(s.remove_layer(LayerHandle(1)), Ok(()));
        assert_eq!(s.layer_count(), 0);
    }

    #[test]
    fn test_hit_test_prefers_topmost_layer() {
        let mut s = SvgSurface::new(&AtlasConfig::default());
        s.add_layer(
            LayerHandle(1),
            layer(LayerKind::States, vec![square_feature("Odisha", 81.0, 17.5, 5.0, true)]),
        );
        s.add_layer(
            LayerHandle(2),
            layer(LayerKind::Districts, vec![square_feature("Cuttack", 85.5, 20.0, 1.0, true)]),
        );

        let (top, f) = s.hit_test(LatLng::new(20.5, 86.0)).unwrap();
        assert_eq!((top.kind, f.label.as_str()), (LayerKind::Districts, "Cuttack"));

        let (top, f) = s.hit_test(LatLng::new(18.0, 82.0)).unwrap();
        assert_eq!((top.kind, f.label.as_str()), (LayerKind::States, "Odisha"));

        assert!(s.hit_test(LatLng::new(28.0, 77.0)).is_none());
    }

    #[test]
    fn test_fit_and_set_view_move_viewport() {
        let cfg = AtlasConfig::default();
        let mut s = SvgSurface::new(&cfg);
        s.fit_bounds(
            Bounds::from_corners(LatLng::new(20.0, 85.0), LatLng::new(21.0, 86.0)),
            0.0,
        );
        assert!(s.viewport.zoom > cfg.default_zoom);
        s.set_view(cfg.default_center, cfg.default_zoom);
        assert_eq!(s.viewport.center, cfg.default_center);
        assert_eq!(s.viewport.zoom, cfg.default_zoom);
    }
}
