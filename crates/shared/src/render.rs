//! The seam between navigator commands and whatever draws the map.
//!
//! [`MapSurface`] is the only thing a renderer implements. [`apply_commands`]
//! turns [`MapCommand`]s into surface calls, building each [`VectorLayer`]
//! from the cached boundary documents at attach time.

use geojson::{Feature, Geometry};

use crate::cache::BoundaryCache;
use crate::error::{BoundaryError, SurfaceError};
use crate::geo::{self, Bounds, LatLng, DISTRICT_NAME_PROPERTIES, STATE_NAME_PROPERTIES};
use crate::layers::{LayerHandle, LayerKind, LayerOp, LayerSpec};
use crate::navigator::{MapCommand, NavEvent};
use crate::region::RegionKey;
use crate::source::FetchRequest;

pub const UNKNOWN_STATE: &str = "Unknown State";
pub const UNKNOWN_DISTRICT: &str = "Unknown District";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStyle {
    pub stroke: &'static str,
    pub weight: f64,
    pub fill: &'static str,
    pub fill_opacity: f64,
}

pub const STATES_STYLE: LayerStyle = LayerStyle {
    stroke: "#3388ff",
    weight: 2.0,
    fill: "#3388ff",
    fill_opacity: 0.0,
};

pub const DISTRICTS_STYLE: LayerStyle = LayerStyle {
    stroke: "#ff7733",
    weight: 1.5,
    fill: "#ff7733",
    fill_opacity: 0.0,
};

pub const SEARCH_STYLE: LayerStyle = LayerStyle {
    stroke: "#d6336c",
    weight: 3.0,
    fill: "#d6336c",
    fill_opacity: 0.15,
};

impl LayerStyle {
    pub fn for_kind(kind: LayerKind) -> LayerStyle {
        match kind {
            LayerKind::States => STATES_STYLE,
            LayerKind::Districts => DISTRICTS_STYLE,
            LayerKind::Search => SEARCH_STYLE,
        }
    }
}

/// What clicking a boundary feature does.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickAction {
    SelectState { name: String, bounds: Option<Bounds> },
    SelectDistrict { name: String, bounds: Option<Bounds> },
}

impl ClickAction {
    pub fn into_event(self) -> NavEvent {
        match self {
            ClickAction::SelectState { name, bounds } => NavEvent::StateClicked { name, bounds },
            ClickAction::SelectDistrict { name, bounds } => {
                NavEvent::DistrictClicked { name, bounds }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFeature {
    pub label: String,
    pub geometry: Option<Geometry>,
    pub bounds: Option<Bounds>,
    /// `None` for features without a usable name.
    pub click: Option<ClickAction>,
}

/// A boundary layer ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorLayer {
    pub kind: LayerKind,
    pub style: LayerStyle,
    pub features: Vec<RenderedFeature>,
}

impl VectorLayer {
    /// Build the layer for `spec` from cached documents. `None` when the
    /// backing document is not cached.
    pub fn build(spec: &LayerSpec, cache: &BoundaryCache) -> Option<VectorLayer> {
        let kind = spec.kind();
        let features: Vec<RenderedFeature> = match spec {
            LayerSpec::States => cache
                .states()?
                .features
                .iter()
                .map(|f| rendered(f, STATE_NAME_PROPERTIES, UNKNOWN_STATE, kind))
                .collect(),
            LayerSpec::Districts { state } => cache
                .districts(&RegionKey::new(state))?
                .features
                .iter()
                .map(|f| rendered(f, DISTRICT_NAME_PROPERTIES, UNKNOWN_DISTRICT, kind))
                .collect(),
            LayerSpec::Search { state, district } => {
                let doc = cache.districts(&RegionKey::new(state))?;
                let feature = geo::find_feature_by_name(&doc, district, DISTRICT_NAME_PROPERTIES)?;
                vec![rendered(feature, DISTRICT_NAME_PROPERTIES, UNKNOWN_DISTRICT, kind)]
            }
        };
        Some(VectorLayer {
            kind,
            style: LayerStyle::for_kind(kind),
            features,
        })
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.features
            .iter()
            .filter_map(|f| f.bounds)
            .reduce(|a, b| a.union(&b))
    }
}

fn rendered(feature: &Feature, candidates: &[&str], placeholder: &str, kind: LayerKind) -> RenderedFeature {
    let name = geo::feature_name(feature, candidates);
    let bounds = geo::feature_bounds(feature);
    let click = name.and_then(|n| {
        let name = n.to_string();
        match kind {
            LayerKind::States => Some(ClickAction::SelectState { name, bounds }),
            LayerKind::Districts => Some(ClickAction::SelectDistrict { name, bounds }),
            LayerKind::Search => None,
        }
    });
    RenderedFeature {
        label: name.unwrap_or(placeholder).to_string(),
        geometry: feature.geometry.clone(),
        bounds,
        click,
    }
}

/// Anything that can display boundary layers.
pub trait MapSurface {
    fn set_view(&mut self, center: LatLng, zoom: f64);
    fn fit_bounds(&mut self, bounds: Bounds, padding: f64);
    fn add_layer(&mut self, handle: LayerHandle, layer: VectorLayer);
    fn remove_layer(&mut self, handle: LayerHandle) -> Result<(), SurfaceError>;
}

/// Work left for the caller after the surface has been updated.
#[derive(Debug, Default, PartialEq)]
pub struct FollowUp {
    pub fetches: Vec<FetchRequest>,
    pub notices: Vec<BoundaryError>,
}

/// Execute commands against `surface` in order.
///
/// A failed removal is logged and skipped: the layer is already gone.
pub fn apply_commands<S: MapSurface>(
    surface: &mut S,
    commands: Vec<MapCommand>,
    cache: &BoundaryCache,
) -> FollowUp {
    let mut follow_up = FollowUp::default();
    for command in commands {
        match command {
            MapCommand::Layer(LayerOp::Detach { handle, .. }) => {
                if let Err(e) = surface.remove_layer(handle) {
                    tracing::warn!(error = %e, "layer removal failed");
                }
            }
            MapCommand::Layer(LayerOp::Attach { handle, spec }) => match VectorLayer::build(&spec, cache) {
                Some(layer) => surface.add_layer(handle, layer),
                None => tracing::warn!(%handle, ?spec, "no cached boundaries for layer"),
            },
            MapCommand::FitBounds { bounds, padding } => surface.fit_bounds(bounds, padding),
            MapCommand::SetView { center, zoom } => surface.set_view(center, zoom),
            MapCommand::Fetch(request) => follow_up.fetches.push(request),
            MapCommand::Notify(error) => follow_up.notices.push(error),
        }
    }
    follow_up
}
